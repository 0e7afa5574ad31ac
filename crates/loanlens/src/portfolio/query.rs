//! The borrower-list query pipeline: text filter, risk filter, stable sort.
//!
//! `query` is a pure function of its inputs. Malformed query parameters are
//! rejected up front by [`QuerySpec::from_params`], so a constructed
//! [`QuerySpec`] is always valid and the pipeline itself cannot fail; an
//! empty result is a normal outcome, not an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{BorrowerRecord, RiskLevel};

/// Which borrower attribute a query orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Email,
    LoanAmount,
    LoanTerm,
    CreditScore,
    RiskLevel,
    LastAnalyzed,
}

impl SortField {
    pub const fn label(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::LoanAmount => "loan_amount",
            SortField::LoanTerm => "loan_term",
            SortField::CreditScore => "credit_score",
            SortField::RiskLevel => "risk_level",
            SortField::LastAnalyzed => "last_analyzed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "loan_amount" => Some(SortField::LoanAmount),
            "loan_term" => Some(SortField::LoanTerm),
            "credit_score" => Some(SortField::CreditScore),
            "risk_level" => Some(SortField::RiskLevel),
            "last_analyzed" => Some(SortField::LastAnalyzed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A sort field paired with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFilter {
    All,
    Only(RiskLevel),
}

/// The parameters of one portfolio query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Case-insensitive substring matched against name and email; empty
    /// matches every record.
    pub search: String,
    pub risk: RiskFilter,
    /// `None` preserves the filtered order.
    pub sort: Option<SortKey>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            risk: RiskFilter::All,
            sort: None,
        }
    }
}

impl QuerySpec {
    /// Build a spec from the raw string parameters supplied by the listing
    /// screen or the CLI, rejecting anything outside the enumerated sets
    /// before any filtering or sorting work happens.
    ///
    /// A direction without a sort field is accepted and ignored; the listing
    /// screen only exposes a direction together with a column.
    pub fn from_params(
        search: Option<&str>,
        risk: Option<&str>,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, QueryError> {
        let risk = match risk.map(str::trim) {
            None | Some("") | Some("all") => RiskFilter::All,
            Some(value) => match RiskLevel::parse(value) {
                Some(level) => RiskFilter::Only(level),
                None => return Err(QueryError::UnknownRiskFilter(value.to_string())),
            },
        };

        let field = match sort.map(str::trim) {
            None | Some("") | Some("none") => None,
            Some(value) => match SortField::parse(value) {
                Some(field) => Some(field),
                None => return Err(QueryError::UnknownSortField(value.to_string())),
            },
        };

        let direction = match direction.map(str::trim) {
            None | Some("") | Some("asc") | Some("ascending") => SortDirection::Ascending,
            Some("desc") | Some("descending") => SortDirection::Descending,
            Some(value) => return Err(QueryError::UnknownSortDirection(value.to_string())),
        };

        Ok(Self {
            search: search.unwrap_or_default().to_string(),
            risk,
            sort: field.map(|field| SortKey { field, direction }),
        })
    }
}

/// Spec violations, rejected before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unknown sort field '{0}'")]
    UnknownSortField(String),
    #[error("unknown sort direction '{0}' (expected 'asc' or 'desc')")]
    UnknownSortDirection(String),
    #[error("unknown risk filter '{0}' (expected 'all', 'low', 'medium', or 'high')")]
    UnknownRiskFilter(String),
}

/// Produce the ordered view of `records` matching `spec`.
///
/// The input is never mutated; the output is a fresh list and a subset of the
/// input. Ties under the sort key keep their filtered order (`sort_by` is
/// stable), and descending order reverses the comparator rather than the
/// result so ties stay put there too.
pub fn query(records: &[BorrowerRecord], spec: &QuerySpec) -> Vec<BorrowerRecord> {
    let needle = spec.search.to_lowercase();
    let mut rows: Vec<BorrowerRecord> = records
        .iter()
        .filter(|record| matches_search(record, &needle) && matches_risk(record, spec.risk))
        .cloned()
        .collect();

    if let Some(key) = spec.sort {
        rows.sort_by(|a, b| {
            let ordering = compare_by(a, b, key.field);
            match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

fn matches_search(record: &BorrowerRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.name.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
}

fn matches_risk(record: &BorrowerRecord, filter: RiskFilter) -> bool {
    match filter {
        RiskFilter::All => true,
        RiskFilter::Only(level) => record.risk_level == level,
    }
}

fn compare_by(a: &BorrowerRecord, b: &BorrowerRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortField::LoanAmount => a.loan_amount.cmp(&b.loan_amount),
        SortField::LoanTerm => a.loan_term_months.cmp(&b.loan_term_months),
        SortField::CreditScore => a.credit_score.cmp(&b.credit_score),
        SortField::RiskLevel => a.risk_level.label().cmp(b.risk_level.label()),
        SortField::LastAnalyzed => a.last_analyzed.cmp(&b.last_analyzed),
    }
}
