//! Query DSL rendering
//!
//! Translates a `FundQuery` into an Elasticsearch search body and defines
//! the index mapping that backs it.
//!
//! | Criterion | Clause | Context |
//! |---|---|---|
//! | match-all | `match_all` | must |
//! | exact | `term` | filter |
//! | text | `match` | must |
//! | contains | `wildcard`, case-insensitive | filter |
//! | exists | `exists` | filter |
//! | range | `range` with `gte` / `lte` | filter |

use serde_json::{json, Map, Value};

use domain_fund::{Criterion, FieldKind, FundField, FundQuery, SortOrder};

/// Fixed-point factor for return fields: four fractional digits
pub const RETURN_SCALING_FACTOR: u32 = 10_000;

/// Mapping used when the index is created
pub fn index_mapping() -> Value {
    let mut properties = Map::new();

    for field in FundField::ALL {
        let mapping = match field.kind() {
            FieldKind::Keyword => json!({ "type": "keyword" }),
            FieldKind::Text => json!({
                "type": "text",
                "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
            }),
            FieldKind::ScaledDecimal => json!({
                "type": "scaled_float",
                "scaling_factor": RETURN_SCALING_FACTOR
            }),
        };
        properties.insert(field.name().to_string(), mapping);
    }

    json!({ "mappings": { "properties": properties } })
}

/// Renders the full `_search` request body
pub fn render_query(query: &FundQuery) -> Value {
    let mut must = Vec::new();
    let mut filter = Vec::new();

    for criterion in query.criteria() {
        match criterion {
            Criterion::MatchAll => must.push(json!({ "match_all": {} })),
            Criterion::Exact { field, value } => {
                filter.push(json!({ "term": { field.name(): value } }))
            }
            Criterion::Text { field, value } => {
                must.push(json!({ "match": { field.name(): value } }))
            }
            Criterion::Contains { field, value } => filter.push(json!({
                "wildcard": {
                    field.name(): {
                        "value": format!("*{}*", escape_wildcard(value)),
                        "case_insensitive": true
                    }
                }
            })),
            Criterion::Exists { field } => {
                filter.push(json!({ "exists": { "field": field.name() } }))
            }
            Criterion::GreaterThanOrEqual { field, value } => filter.push(json!({
                "range": { field.name(): { "gte": value.to_string() } }
            })),
            Criterion::LessThanOrEqual { field, value } => filter.push(json!({
                "range": { field.name(): { "lte": value.to_string() } }
            })),
        }
    }

    let page = query.page();
    let mut body = json!({
        "query": { "bool": { "must": must, "filter": filter } },
        "from": page.offset(),
        "size": page.limit(),
        "track_total_hits": true
    });

    if let Some(sort) = query.sort() {
        body["sort"] = json!([render_sort(sort)]);
    }

    body
}

fn render_sort(sort: SortOrder) -> Value {
    let field = match sort.field.kind() {
        FieldKind::Text => format!("{}.keyword", sort.field.name()),
        _ => sort.field.name().to_string(),
    };

    json!({ field: { "order": sort.direction.as_str(), "missing": "_last" } })
}

/// Escapes wildcard metacharacters so user text matches literally
fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_wildcard() {
        assert_eq!(escape_wildcard("Hisse*"), "Hisse\\*");
        assert_eq!(escape_wildcard("a?b\\c"), "a\\?b\\\\c");
        assert_eq!(escape_wildcard("Şemsiye"), "Şemsiye");
    }

    #[test]
    fn test_mapping_covers_every_field() {
        let mapping = index_mapping();
        let properties = mapping["mappings"]["properties"].as_object().unwrap();

        assert_eq!(properties.len(), FundField::ALL.len());
        assert_eq!(properties["fundCode"]["type"], "keyword");
        assert_eq!(properties["fundName"]["fields"]["keyword"]["type"], "keyword");
        assert_eq!(properties["return5Year"]["scaling_factor"], 10_000);
    }
}
