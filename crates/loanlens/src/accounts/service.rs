use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::domain::{Account, AccountId, AccountView, Credentials, Registration};
use super::repository::{AccountRepository, AccountRepositoryError};

/// Validation errors for a signup submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("first and last name are required")]
    MissingName,
    #[error("'{0}' is not a usable email address")]
    InvalidEmail(String),
    #[error("password must be at least {minimum} characters")]
    WeakPassword { minimum: usize },
    #[error("phone number must contain at least {minimum} digits")]
    InvalidPhoneNumber { minimum: usize },
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Repository(#[from] AccountRepositoryError),
    #[error("invalid email or password")]
    InvalidCredentials,
}

const MINIMUM_PASSWORD_CHARS: usize = 8;
const MINIMUM_PHONE_DIGITS: usize = 7;

/// Service composing registration validation and the account store.
pub struct AccountService<R> {
    repository: Arc<R>,
}

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("acct-{id:06}"))
}

impl<R> AccountService<R>
where
    R: AccountRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and store a new account, returning its public view.
    pub fn register(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<AccountView, AccountServiceError> {
        validate_registration(&registration)?;

        let account = Account {
            id: next_account_id(),
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            email: normalize_email(&registration.email),
            phone_number: registration.phone_number.trim().to_string(),
            role: registration.role,
            password_digest: digest_password(&registration.password),
            registered_at: now,
        };

        let stored = self.repository.insert(account)?;
        Ok(stored.view())
    }

    /// Check credentials against the stored digest. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub fn login(&self, credentials: &Credentials) -> Result<AccountView, AccountServiceError> {
        let account = self
            .repository
            .fetch_by_email(&normalize_email(&credentials.email))?
            .ok_or(AccountServiceError::InvalidCredentials)?;

        if account.password_digest != digest_password(&credentials.password) {
            return Err(AccountServiceError::InvalidCredentials);
        }

        Ok(account.view())
    }
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// Placeholder for a real KDF; swap in a password hasher before exposing this
// to untrusted traffic.
fn digest_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn validate_registration(registration: &Registration) -> Result<(), RegistrationError> {
    if registration.first_name.trim().is_empty() || registration.last_name.trim().is_empty() {
        return Err(RegistrationError::MissingName);
    }
    if !is_plausible_email(registration.email.trim()) {
        return Err(RegistrationError::InvalidEmail(registration.email.clone()));
    }
    if registration.password.chars().count() < MINIMUM_PASSWORD_CHARS {
        return Err(RegistrationError::WeakPassword {
            minimum: MINIMUM_PASSWORD_CHARS,
        });
    }
    let digits = registration
        .phone_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .count();
    if digits < MINIMUM_PHONE_DIGITS {
        return Err(RegistrationError::InvalidPhoneNumber {
            minimum: MINIMUM_PHONE_DIGITS,
        });
    }
    Ok(())
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use super::super::domain::AccountRole;
    use super::*;

    #[derive(Default, Clone)]
    struct MemoryAccounts {
        accounts: Arc<Mutex<BTreeMap<String, Account>>>,
    }

    impl AccountRepository for MemoryAccounts {
        fn insert(&self, account: Account) -> Result<Account, AccountRepositoryError> {
            let mut guard = self.accounts.lock().expect("account mutex poisoned");
            if guard.contains_key(&account.email) {
                return Err(AccountRepositoryError::DuplicateEmail);
            }
            guard.insert(account.email.clone(), account.clone());
            Ok(account)
        }

        fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
            let guard = self.accounts.lock().expect("account mutex poisoned");
            Ok(guard.get(email).cloned())
        }
    }

    fn registration() -> Registration {
        Registration {
            first_name: "Priya".to_string(),
            last_name: "Sharma".to_string(),
            email: "priya.s@example.com".to_string(),
            password: "correct horse".to_string(),
            phone_number: "555-010-4477".to_string(),
            role: AccountRole::Lender,
        }
    }

    fn service() -> AccountService<MemoryAccounts> {
        AccountService::new(Arc::new(MemoryAccounts::default()))
    }

    #[test]
    fn register_then_login_roundtrip() {
        let service = service();
        let view = service
            .register(registration(), Utc::now())
            .expect("registration succeeds");
        assert_eq!(view.role, AccountRole::Lender);
        assert!(view.id.0.starts_with("acct-"));

        let logged_in = service
            .login(&Credentials {
                email: "priya.s@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .expect("login succeeds");
        assert_eq!(logged_in.id, view.id);
    }

    #[test]
    fn emails_are_normalized_for_storage_and_login() {
        let service = service();
        let mut signup = registration();
        signup.email = "  Priya.S@Example.COM ".to_string();
        let view = service
            .register(signup, Utc::now())
            .expect("registration succeeds");
        assert_eq!(view.email, "priya.s@example.com");

        service
            .login(&Credentials {
                email: "PRIYA.S@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .expect("case-insensitive login succeeds");
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let service = service();
        service
            .register(registration(), Utc::now())
            .expect("first registration succeeds");

        match service.register(registration(), Utc::now()) {
            Err(AccountServiceError::Repository(AccountRepositoryError::DuplicateEmail)) => {}
            other => panic!("expected duplicate email error, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let service = service();

        let mut unnamed = registration();
        unnamed.first_name = "  ".to_string();
        assert!(matches!(
            service.register(unnamed, Utc::now()),
            Err(AccountServiceError::Registration(
                RegistrationError::MissingName
            ))
        ));

        let mut bad_email = registration();
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            service.register(bad_email, Utc::now()),
            Err(AccountServiceError::Registration(
                RegistrationError::InvalidEmail(_)
            ))
        ));

        let mut weak = registration();
        weak.password = "short".to_string();
        assert!(matches!(
            service.register(weak, Utc::now()),
            Err(AccountServiceError::Registration(
                RegistrationError::WeakPassword { .. }
            ))
        ));

        let mut bad_phone = registration();
        bad_phone.phone_number = "1234".to_string();
        assert!(matches!(
            service.register(bad_phone, Utc::now()),
            Err(AccountServiceError::Registration(
                RegistrationError::InvalidPhoneNumber { .. }
            ))
        ));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let service = service();
        service
            .register(registration(), Utc::now())
            .expect("registration succeeds");

        let wrong_password = service.login(&Credentials {
            email: "priya.s@example.com".to_string(),
            password: "wrong horse".to_string(),
        });
        assert!(matches!(
            wrong_password,
            Err(AccountServiceError::InvalidCredentials)
        ));

        let unknown_email = service.login(&Credentials {
            email: "nobody@example.com".to_string(),
            password: "correct horse".to_string(),
        });
        assert!(matches!(
            unknown_email,
            Err(AccountServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn stored_digest_is_not_the_raw_password() {
        let repository = Arc::new(MemoryAccounts::default());
        let service = AccountService::new(repository.clone());
        service
            .register(registration(), Utc::now())
            .expect("registration succeeds");

        let stored = repository
            .fetch_by_email("priya.s@example.com")
            .expect("fetch succeeds")
            .expect("account present");
        assert_ne!(stored.password_digest, "correct horse");
        assert_eq!(stored.password_digest.len(), 64);
    }
}
