//! Auth
//!
//! Credential collaborator: salted password hashing, opaque session tokens,
//! and the registration/login flows that enforce the unique-email invariant.
//! All failures cross the boundary as error values, never panics.

use std::fmt;

use chrono::Utc;
use rand::{RngCore, rngs::OsRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    store::{JsonStore, StoreError},
    users::{NewUser, User},
};

/// Session token identifier prefix.
pub const TOKEN_PREFIX: &str = "bk";

/// Number of random secret bytes encoded in a token.
pub const TOKEN_SECRET_BYTES: usize = 16;

/// Number of random salt bytes in a password hash.
const SALT_BYTES: usize = 16;

/// Errors from the credential flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required registration field was empty.
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    /// Another user already registered with this email.
    #[error("a user already exists with this email")]
    EmailTaken,

    /// Email/password pair did not match a stored user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Store failure while reading or writing the user collection.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from token parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not have the `bk_v1_<uuid>.<secret>` shape.
    #[error("session token format is invalid")]
    InvalidFormat,

    /// Token names a version this build does not understand.
    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    /// Secret segment is not valid hex of the expected length.
    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Salted one-way password representation: `"<salt_hex>$<digest_hex>"`.
///
/// Serializes as a plain string so user records stay flat JSON.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password under a fresh random salt.
    #[must_use]
    pub fn new(password: &str) -> Self {
        let mut salt = [0_u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt);

        Self(format!(
            "{}${}",
            encode_hex(&salt),
            digest_hex(&salt, password)
        ))
    }

    /// Wrap an already-hashed representation loaded from the store.
    #[must_use]
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    /// Check a plaintext candidate against this hash.
    ///
    /// A stored value that does not have the expected shape verifies as
    /// false rather than erroring.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt_hex, digest)) = self.0.split_once('$') else {
            return false;
        };

        let Some(salt) = decode_hex(salt_hex) else {
            return false;
        };

        digest == digest_hex(&salt, password)
    }

    /// The stored string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// Issue, verify, and revoke opaque session tokens.
///
/// The registry is in-memory and session-scoped to the surrounding process;
/// tokens do not survive a restart.
#[derive(Debug, Default)]
pub struct CredentialService {
    issued: FxHashMap<String, String>,
}

impl CredentialService {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh opaque token bound to `user_id`.
    pub fn issue_token(&mut self, user_id: &str) -> String {
        let mut secret = [0_u8; TOKEN_SECRET_BYTES];
        OsRng.fill_bytes(&mut secret);

        let token = format!(
            "{TOKEN_PREFIX}_v1_{}.{}",
            Uuid::new_v4().simple(),
            encode_hex(&secret)
        );

        self.issued.insert(token.clone(), user_id.to_string());
        debug!(user_id, "session token issued");

        token
    }

    /// Resolve a presented token to the user it was issued for.
    ///
    /// Returns `None` for malformed tokens and for well-formed tokens that
    /// were never issued or have been revoked.
    #[must_use]
    pub fn verify_token(&self, token: &str) -> Option<&str> {
        parse_token(token).ok()?;

        self.issued.get(token).map(String::as_str)
    }

    /// Revoke a token; silent no-op when it was never issued.
    pub fn revoke_token(&mut self, token: &str) {
        self.issued.remove(token);
    }
}

/// Check that a presented token has the expected shape.
///
/// # Errors
///
/// Returns a [`TokenError`] naming the first malformed segment.
pub fn parse_token(token: &str) -> Result<(), TokenError> {
    let (prefix_and_id, secret_hex) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(TokenError::InvalidFormat)?;
    let version = id_parts.next().ok_or(TokenError::InvalidFormat)?;
    let token_uuid = id_parts.next().ok_or(TokenError::InvalidFormat)?;

    if prefix != TOKEN_PREFIX {
        return Err(TokenError::InvalidFormat);
    }

    if version != "v1" {
        return Err(TokenError::UnsupportedVersion);
    }

    if Uuid::try_parse(token_uuid).is_err() {
        return Err(TokenError::InvalidFormat);
    }

    let secret = decode_hex(secret_hex).ok_or(TokenError::InvalidSecretEncoding)?;

    if secret.len() != TOKEN_SECRET_BYTES {
        return Err(TokenError::InvalidSecretEncoding);
    }

    Ok(())
}

/// Outcome of a successful registration or login: the user record plus the
/// token issued for it.
#[derive(Debug)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: User,

    /// Opaque session token bound to the user.
    pub token: String,
}

/// Register a new user, enforcing the unique-email invariant, and issue a
/// session token.
///
/// # Errors
///
/// - [`AuthError::MissingField`]: a required field was empty.
/// - [`AuthError::EmailTaken`]: another user holds this email.
/// - [`AuthError::Store`]: the user collection could not be read or written.
pub fn register(
    store: &JsonStore,
    credentials: &mut CredentialService,
    new_user: NewUser,
) -> Result<AuthSession, AuthError> {
    validate_required(&new_user)?;

    let mut users = store.users()?;

    if users.iter().any(|user| user.email == new_user.email) {
        return Err(AuthError::EmailTaken);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: new_user.email,
        password: PasswordHash::new(&new_user.password),
        name: new_user.name,
        contact_number: new_user.contact_number,
        shipping_address: new_user.shipping_address,
        created_at: Utc::now(),
    };

    users.push(user.clone());
    store.save_users(&users)?;

    let token = credentials.issue_token(&user.id);
    info!(user_id = %user.id, "user registered");

    Ok(AuthSession { user, token })
}

/// Verify an email/password pair and issue a session token.
///
/// # Errors
///
/// - [`AuthError::InvalidCredentials`]: no such user, or the password does
///   not match; the two cases are indistinguishable to the caller.
/// - [`AuthError::Store`]: the user collection could not be read.
pub fn login(
    store: &JsonStore,
    credentials: &mut CredentialService,
    email: &str,
    password: &str,
) -> Result<AuthSession, AuthError> {
    let user = store
        .user_by_email(email)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !user.password.verify(password) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = credentials.issue_token(&user.id);
    info!(user_id = %user.id, "user logged in");

    Ok(AuthSession { user, token })
}

fn validate_required(new_user: &NewUser) -> Result<(), AuthError> {
    let fields = [
        ("email", new_user.email.as_str()),
        ("password", new_user.password.as_str()),
        ("name", new_user.name.as_str()),
        ("contactNumber", new_user.contact_number.as_str()),
        ("street", new_user.shipping_address.street.as_str()),
        ("city", new_user.shipping_address.city.as_str()),
        ("state", new_user.shipping_address.state.as_str()),
        ("zipCode", new_user.shipping_address.zip_code.as_str()),
        ("country", new_user.shipping_address.country.as_str()),
    ];

    for (name, value) in fields {
        if value.is_empty() {
            return Err(AuthError::MissingField(name));
        }
    }

    Ok(())
}

fn digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(salt);
    hasher.update(password.as_bytes());

    encode_hex(&hasher.finalize())
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = decode_hex_nibble(pair[0])?;
            let lo = decode_hex_nibble(pair[1])?;

            Some((hi << 4) | lo)
        })
        .collect()
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}
