use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for borrowers in the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BorrowerId(pub String);

/// Closed three-valued default-risk classification.
///
/// The enum is the canonical representation; the free-text form shown in
/// views ("Low Risk", ...) is derived via [`RiskLevel::display_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// One borrower's loan-and-risk snapshot as shown in the portfolio listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub id: BorrowerId,
    pub name: String,
    pub email: String,
    /// Loan principal in whole currency units.
    pub loan_amount: u32,
    pub loan_term_months: u16,
    /// 0-100 scale.
    pub credit_score: u8,
    pub risk_level: RiskLevel,
    pub last_analyzed: NaiveDate,
}

impl BorrowerRecord {
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.credit_score > 100 {
            return Err(InvalidRecord::CreditScoreOutOfRange(self.credit_score));
        }
        if self.loan_amount == 0 {
            return Err(InvalidRecord::NonPositiveLoanAmount);
        }
        if self.loan_term_months == 0 {
            return Err(InvalidRecord::NonPositiveLoanTerm);
        }
        Ok(())
    }
}

/// Invariant violations for a borrower record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("credit score {0} outside the 0-100 range")]
    CreditScoreOutOfRange(u8),
    #[error("loan amount must be positive")]
    NonPositiveLoanAmount,
    #[error("loan term must be at least one month")]
    NonPositiveLoanTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Retired,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "Salaried",
            EmploymentType::SelfEmployed => "Self-employed",
            EmploymentType::Retired => "Retired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidenceType {
    Own,
    Rent,
}

impl ResidenceType {
    pub const fn label(self) -> &'static str {
        match self {
            ResidenceType::Own => "Owner",
            ResidenceType::Rent => "Rented",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CustomerTier {
    pub const fn label(self) -> &'static str {
        match self {
            CustomerTier::Tier1 => "Tier 1",
            CustomerTier::Tier2 => "Tier 2",
            CustomerTier::Tier3 => "Tier 3",
        }
    }
}

/// Intake payload captured by the lender input form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub name: String,
    pub email: String,
    pub loan_amount: u32,
    pub loan_term_months: u16,
    /// Flat annual rate as a percentage.
    pub rate_of_interest: f32,
    /// Monthly installment; derived from principal, rate, and term when absent.
    #[serde(default)]
    pub emi: Option<f64>,
    pub customer_age: u8,
    pub gender: Gender,
    pub employment_type: EmploymentType,
    pub residence_type: ResidenceType,
    pub num_loans: u8,
    pub secured_loans: u8,
    pub unsecured_loans: u8,
    pub new_loans_last_3_months: u8,
    pub tier: CustomerTier,
}

/// Per-borrower attributes beyond the listing row, captured at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProfile {
    pub emi: f64,
    pub rate_of_interest: f32,
    pub customer_age: u8,
    pub gender: Gender,
    pub employment_type: EmploymentType,
    pub residence_type: ResidenceType,
    pub num_loans: u8,
    pub secured_loans: u8,
    pub unsecured_loans: u8,
    pub new_loans_last_3_months: u8,
    pub tier: CustomerTier,
    pub created_at: DateTime<Utc>,
}
