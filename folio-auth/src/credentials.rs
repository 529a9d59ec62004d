use crate::error::{AuthError, AuthResult};
use crate::password::{HashParams, hash_password};
use folio_model::PASSWORD_HASH_FIELD;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Login field on auth-enabled documents.
pub const EMAIL_FIELD: &str = "email";

/// Well-known local development login.
pub const DEV_EMAIL: &str = "dev@payloadcms.com";
pub const DEV_PASSWORD: &str = "test";

/// An email / password pair. The password is wiped from memory on drop.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The development login seeded into an empty users collection.
    pub fn development() -> Self {
        Self::new(DEV_EMAIL, DEV_PASSWORD)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Builds the credential fields of a user document. The returned object
/// holds `email` and `password_hash`; callers may merge further fields in.
pub fn user_document(
    credentials: &Credentials,
    params: &HashParams,
) -> AuthResult<serde_json::Value> {
    let email = credentials.email.trim();
    if email.is_empty() {
        return Err(AuthError::InvalidCredentials("email is empty".into()));
    }
    if credentials.password.is_empty() {
        return Err(AuthError::InvalidCredentials("password is empty".into()));
    }

    let hash = hash_password(&credentials.password, params)?;
    let mut data = serde_json::Map::new();
    data.insert(EMAIL_FIELD.into(), email.into());
    data.insert(PASSWORD_HASH_FIELD.into(), hash.into());
    Ok(serde_json::Value::Object(data))
}
