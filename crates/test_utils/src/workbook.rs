//! In-memory xlsx workbooks
//!
//! Builds the smallest workbook the spreadsheet reader accepts: one
//! worksheet, inline strings, no styles. Every workbook starts with the two
//! report header rows, so data rows land at sheet row 3 like a real report.

use std::io::{Cursor, Write};

use domain_fund::{CellValue, FundField, SheetRow};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Fon Getirileri" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Title row of a monthly returns report
pub const REPORT_TITLE: &str = "Yatırım Fonları Getiri Raporu";

/// Builder for xlsx workbook bytes
///
/// ```rust,ignore
/// let bytes = WorkbookBuilder::report()
///     .sheet_row(&RowFixtures::dlz())
///     .build();
/// let rows = domain_fund::read_data_rows(&bytes)?;
/// ```
pub struct WorkbookBuilder {
    rows: Vec<Vec<CellValue>>,
}

impl WorkbookBuilder {
    /// Starts a sheet with the title row and the column header row
    pub fn report() -> Self {
        let headers = FundField::ALL
            .iter()
            .map(|field| CellValue::text(field.name()))
            .collect();
        Self {
            rows: vec![vec![CellValue::text(REPORT_TITLE)], headers],
        }
    }

    /// Appends a row below the previous one
    pub fn row(mut self, cells: Vec<CellValue>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Appends the cells of a sheet row; its index is not used
    pub fn sheet_row(self, row: &SheetRow) -> Self {
        self.row(row.cells.clone())
    }

    /// Serializes the workbook
    ///
    /// # Panics
    ///
    /// Panics if the in-memory archive cannot be written
    pub fn build(self) -> Vec<u8> {
        let sheet = sheet_xml(&self.rows);
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", sheet.as_str()),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            zip.start_file(name, options)
                .unwrap_or_else(|e| panic!("failed to start {}: {}", name, e));
            zip.write_all(content.as_bytes())
                .unwrap_or_else(|e| panic!("failed to write {}: {}", name, e));
        }
        zip.finish()
            .unwrap_or_else(|e| panic!("failed to finish workbook: {}", e))
            .into_inner()
    }
}

fn sheet_xml(rows: &[Vec<CellValue>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, cells) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (column, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letter(column), row_number);
            xml.push_str(&cell_xml(&reference, cell));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn cell_xml(reference: &str, cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(value) => format!(
            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            reference,
            escape(value)
        ),
        CellValue::Number(value) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value),
        CellValue::Integer(value) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value),
        CellValue::Bool(value) => {
            format!(r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*value))
        }
        CellValue::Error(value) => {
            format!(r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, escape(value))
        }
    }
}

fn column_letter(column: usize) -> char {
    // Reports never go past column Z
    char::from(b'A' + column as u8)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
