use super::domain::Account;

/// Storage abstraction for registered accounts.
///
/// Emails are the lookup key; implementations must treat them
/// case-insensitively (the service hands them over already normalized).
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: Account) -> Result<Account, AccountRepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;
}

/// Error enumeration for account storage failures.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepositoryError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}
