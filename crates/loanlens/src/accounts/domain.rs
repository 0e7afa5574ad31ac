use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Which side of the marketplace an account acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Borrower,
    Lender,
}

impl AccountRole {
    pub const fn label(self) -> &'static str {
        match self {
            AccountRole::Borrower => "borrower",
            AccountRole::Lender => "lender",
        }
    }
}

/// Signup payload captured by the registration screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: AccountRole,
}

/// Login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Stored account. Holds a password digest, never the raw password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (trimmed, lowercased) at registration.
    pub email: String,
    pub phone_number: String,
    pub role: AccountRole,
    pub password_digest: String,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role,
        }
    }
}

/// Public projection of an account; the digest never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: AccountRole,
}
