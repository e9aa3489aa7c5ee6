mod jwt;
pub use jwt::TokenClaims;
mod error;
pub use error::{CredentialError, CredentialResult};
mod store;
pub use store::{
    CREDENTIALS_TTL_DAYS, CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore,
};
mod session;
pub use session::Session;
