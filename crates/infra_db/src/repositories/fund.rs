//! Fund repository implementation
//!
//! Row-level access to the `funds` table. Batches are upserted in one
//! transaction with a multi-row `INSERT ... ON CONFLICT (fund_code) DO UPDATE`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use core_kernel::FundCode;
use domain_fund::FundRecord;

use crate::error::DatabaseError;

/// Most rows sent in one INSERT statement; keeps binds far below the
/// PostgreSQL limit of 65535 parameters
const MAX_ROWS_PER_STATEMENT: usize = 1000;

const SELECT_COLUMNS: &str = r#"
    SELECT
        fund_code,
        fund_name,
        umbrella_type,
        return_1_month,
        return_3_month,
        return_6_month,
        return_ytd,
        return_1_year,
        return_3_year,
        return_5_year,
        created_at,
        updated_at
    FROM funds
"#;

/// Repository for the `funds` table
#[derive(Debug, Clone)]
pub struct FundRepository {
    pool: PgPool,
}

impl FundRepository {
    /// Creates a new FundRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts a batch of records in a single transaction
    ///
    /// An existing row with the same fund code is replaced in full and keeps
    /// its `created_at`.
    ///
    /// # Errors
    ///
    /// Any failure rolls the whole batch back.
    pub async fn upsert_batch(&self, records: &[FundRecord]) -> Result<u64, DatabaseError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let mut affected = 0;
        for chunk in records.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO funds (fund_code, fund_name, umbrella_type, \
                 return_1_month, return_3_month, return_6_month, return_ytd, \
                 return_1_year, return_3_year, return_5_year) ",
            );

            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.fund_code.as_str())
                    .push_bind(&record.fund_name)
                    .push_bind(&record.umbrella_type)
                    .push_bind(record.return_1_month)
                    .push_bind(record.return_3_month)
                    .push_bind(record.return_6_month)
                    .push_bind(record.return_ytd)
                    .push_bind(record.return_1_year)
                    .push_bind(record.return_3_year)
                    .push_bind(record.return_5_year);
            });

            builder.push(
                " ON CONFLICT (fund_code) DO UPDATE SET \
                 fund_name = EXCLUDED.fund_name, \
                 umbrella_type = EXCLUDED.umbrella_type, \
                 return_1_month = EXCLUDED.return_1_month, \
                 return_3_month = EXCLUDED.return_3_month, \
                 return_6_month = EXCLUDED.return_6_month, \
                 return_ytd = EXCLUDED.return_ytd, \
                 return_1_year = EXCLUDED.return_1_year, \
                 return_3_year = EXCLUDED.return_3_year, \
                 return_5_year = EXCLUDED.return_5_year, \
                 updated_at = now()",
            );

            let result = builder.build().execute(&mut *tx).await?;
            affected += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(records = records.len(), "Fund batch upserted");
        Ok(affected)
    }

    /// Loads every fund, ordered by fund code
    pub async fn find_all(&self) -> Result<Vec<FundRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, FundRow>(&format!("{} ORDER BY fund_code", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Loads one fund by code
    pub async fn find_by_code(&self, fund_code: &str) -> Result<FundRow, DatabaseError> {
        sqlx::query_as::<_, FundRow>(&format!("{} WHERE fund_code = $1", SELECT_COLUMNS))
            .bind(fund_code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Fund", fund_code))
    }

    /// Counts stored funds
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM funds")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Database row for a fund
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FundRow {
    pub fund_code: String,
    pub fund_name: String,
    pub umbrella_type: String,
    pub return_1_month: Option<Decimal>,
    pub return_3_month: Option<Decimal>,
    pub return_6_month: Option<Decimal>,
    pub return_ytd: Option<Decimal>,
    pub return_1_year: Option<Decimal>,
    pub return_3_year: Option<Decimal>,
    pub return_5_year: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FundRow> for FundRecord {
    type Error = DatabaseError;

    fn try_from(row: FundRow) -> Result<Self, Self::Error> {
        let fund_code = FundCode::parse(&row.fund_code)
            .map_err(|e| DatabaseError::InvalidRow(format!("fund_code '{}': {}", row.fund_code, e)))?;

        Ok(FundRecord {
            fund_code,
            fund_name: row.fund_name,
            umbrella_type: row.umbrella_type,
            return_1_month: row.return_1_month,
            return_3_month: row.return_3_month,
            return_6_month: row.return_6_month,
            return_ytd: row.return_ytd,
            return_1_year: row.return_1_year,
            return_3_year: row.return_3_year,
            return_5_year: row.return_5_year,
        })
    }
}
