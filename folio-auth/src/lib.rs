//! Credentials for auth-enabled collections.
//!
//! Users log in with an email and password. Only an Argon2id PHC string is
//! ever stored on the document; the plaintext lives in [`Credentials`], which
//! is zeroized on drop.

mod credentials;
mod error;
mod password;

pub use credentials::{Credentials, DEV_EMAIL, DEV_PASSWORD, EMAIL_FIELD, user_document};
pub use error::{AuthError, AuthResult};
pub use password::{HashParams, hash_password, verify_password};
