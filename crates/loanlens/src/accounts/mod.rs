//! Account registration and login for the signup and login screens.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Account, AccountId, AccountRole, AccountView, Credentials, Registration};
pub use repository::{AccountRepository, AccountRepositoryError};
pub use router::accounts_router;
pub use service::{AccountService, AccountServiceError, RegistrationError};
