//! CSV batch import for sock records.
//!
//! Four validation gates run in strict order, short-circuiting at the first
//! failure: emptiness, file extension, header set, row parsing. Rows are
//! persisted as new records in one transaction; nothing merges with
//! existing stock.

use crate::entities::sock;
use crate::errors::ServiceError;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Required upload extension and header names.
pub const CSV_EXTENSION: &str = ".csv";
pub const COLOR_HEADER: &str = "color";
pub const COTTON_PERCENTAGE_HEADER: &str = "cottonPercentage";
pub const AMOUNT_HEADER: &str = "amount";
const EXPECTED_HEADER_COUNT: usize = 3;

/// Service for bulk-importing sock records from uploaded CSV files
#[derive(Clone)]
pub struct SockImportService {
    db: Arc<DatabaseConnection>,
}

impl SockImportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Validates and imports one uploaded CSV payload. Returns the created
    /// records in input order; any failure aborts the whole batch.
    #[instrument(skip(self, payload), fields(file_name = file_name.unwrap_or("<unnamed>")))]
    pub async fn import_batch(
        &self,
        file_name: Option<&str>,
        payload: &[u8],
    ) -> Result<Vec<sock::Model>, ServiceError> {
        if payload.is_empty() {
            warn!("rejected empty upload");
            return Err(ServiceError::EmptyFile);
        }

        let name = file_name.unwrap_or_default();
        if !name.ends_with(CSV_EXTENSION) {
            warn!("rejected upload with wrong extension");
            return Err(ServiceError::WrongFormat(name.to_string()));
        }

        let rows = parse_rows(payload)?;

        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            created.push(row.insert(&txn).await?);
        }
        txn.commit().await?;

        info!(created = created.len(), "imported sock batch");
        Ok(created)
    }
}

/// Checks the header row and parses every data row, preserving input order.
fn parse_rows(payload: &[u8]) -> Result<Vec<sock::ActiveModel>, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(payload);

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::FileRead(e.to_string()))?
        .clone();
    let names: Vec<&str> = headers.iter().collect();

    if names.len() != EXPECTED_HEADER_COUNT
        || !names.contains(&COLOR_HEADER)
        || !names.contains(&COTTON_PERCENTAGE_HEADER)
        || !names.contains(&AMOUNT_HEADER)
    {
        warn!(headers = ?names, "rejected upload with wrong headers");
        return Err(ServiceError::WrongHeaders(names.join(", ")));
    }

    // Header set was just verified, so the positions exist.
    let color_idx = column_index(&names, COLOR_HEADER);
    let cotton_idx = column_index(&names, COTTON_PERCENTAGE_HEADER);
    let amount_idx = column_index(&names, AMOUNT_HEADER);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ServiceError::FileRead(e.to_string()))?;
        let color = field(&record, color_idx, COLOR_HEADER, line)?.to_string();
        let cotton_percentage = parse_int(&record, cotton_idx, COTTON_PERCENTAGE_HEADER, line)?;
        let amount = parse_int(&record, amount_idx, AMOUNT_HEADER, line)?;

        rows.push(sock::ActiveModel {
            id: NotSet,
            color: Set(color),
            cotton_percentage: Set(cotton_percentage),
            amount: Set(amount),
        });
    }
    Ok(rows)
}

fn column_index(names: &[&str], header: &str) -> usize {
    names.iter().position(|n| *n == header).unwrap_or_default()
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    header: &str,
    line: usize,
) -> Result<&'r str, ServiceError> {
    record.get(idx).ok_or_else(|| {
        ServiceError::FileRead(format!("missing `{}` field on data row {}", header, line + 1))
    })
}

fn parse_int(
    record: &csv::StringRecord,
    idx: usize,
    header: &str,
    line: usize,
) -> Result<i32, ServiceError> {
    let raw = field(record, idx, header, line)?;
    raw.parse::<i32>().map_err(|_| {
        ServiceError::FileRead(format!(
            "invalid integer `{}` for `{}` on data row {}",
            raw,
            header,
            line + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn accepts_headers_in_any_order() {
        let rows = parse_rows(b"amount,color,cottonPercentage\n100,red,70\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].color, ActiveValue::Set("red".to_string()));
        assert_eq!(rows[0].cotton_percentage, ActiveValue::Set(70));
        assert_eq!(rows[0].amount, ActiveValue::Set(100));
    }

    #[test]
    fn rejects_wrong_header_set() {
        assert!(matches!(
            parse_rows(b"a,b,c\n1,2,3\n"),
            Err(ServiceError::WrongHeaders(_))
        ));
        assert!(matches!(
            parse_rows(b"color,cottonPercentage\nred,70\n"),
            Err(ServiceError::WrongHeaders(_))
        ));
    }

    #[test]
    fn rejects_malformed_integer_rows() {
        let err = parse_rows(b"color,cottonPercentage,amount\nred,seventy,100\n").unwrap_err();
        assert!(matches!(err, ServiceError::FileRead(_)));
    }

    #[test]
    fn preserves_input_order() {
        let rows = parse_rows(b"color,cottonPercentage,amount\nred,70,100\nblue,80,50\n").unwrap();
        assert_eq!(rows[0].color, ActiveValue::Set("red".to_string()));
        assert_eq!(rows[1].color, ActiveValue::Set("blue".to_string()));
    }
}
