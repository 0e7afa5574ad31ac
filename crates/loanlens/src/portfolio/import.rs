use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{BorrowerId, BorrowerRecord, InvalidRecord, RiskLevel};

/// Errors raised while loading a borrower book export.
#[derive(Debug, thiserror::Error)]
pub enum BorrowerImportError {
    #[error("failed to read borrower book: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid borrower book CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown risk level '{value}'")]
    UnknownRiskLevel { row: usize, value: String },
    #[error("row {row}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: {source}")]
    Record { row: usize, source: InvalidRecord },
    #[error("row {row}: duplicate borrower id '{id}'")]
    DuplicateId { row: usize, id: String },
}

/// Loads borrower records from a CSV export with the columns
/// `Borrower ID, Name, Email, Loan Amount, Loan Term, Credit Score,
/// Risk Level, Last Analyzed`.
pub struct BorrowerBookImporter;

impl BorrowerBookImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BorrowerRecord>, BorrowerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BorrowerRecord>, BorrowerImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();
        let mut seen: HashSet<BorrowerId> = HashSet::new();

        for (index, row) in csv_reader.deserialize::<BookRow>().enumerate() {
            // data rows start on line 2, after the header
            let row_number = index + 2;
            let record = row?.into_record(row_number)?;
            record
                .validate()
                .map_err(|source| BorrowerImportError::Record {
                    row: row_number,
                    source,
                })?;
            if !seen.insert(record.id.clone()) {
                return Err(BorrowerImportError::DuplicateId {
                    row: row_number,
                    id: record.id.0.clone(),
                });
            }
            records.push(record);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct BookRow {
    #[serde(rename = "Borrower ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Loan Amount")]
    loan_amount: u32,
    #[serde(rename = "Loan Term")]
    loan_term_months: u16,
    #[serde(rename = "Credit Score")]
    credit_score: u8,
    #[serde(rename = "Risk Level")]
    risk_level: String,
    #[serde(rename = "Last Analyzed")]
    last_analyzed: String,
}

impl BookRow {
    fn into_record(self, row: usize) -> Result<BorrowerRecord, BorrowerImportError> {
        let risk_level = RiskLevel::parse(&self.risk_level).ok_or_else(|| {
            BorrowerImportError::UnknownRiskLevel {
                row,
                value: self.risk_level.clone(),
            }
        })?;
        let last_analyzed = NaiveDate::parse_from_str(self.last_analyzed.trim(), "%Y-%m-%d")
            .map_err(|_| BorrowerImportError::InvalidDate {
                row,
                value: self.last_analyzed.clone(),
            })?;

        Ok(BorrowerRecord {
            id: BorrowerId(self.id),
            name: self.name,
            email: self.email,
            loan_amount: self.loan_amount,
            loan_term_months: self.loan_term_months,
            credit_score: self.credit_score,
            risk_level,
            last_analyzed,
        })
    }
}
