//! Users
//!
//! Customer records as persisted in the user collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordHash;

/// Structured postal address captured at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street line.
    pub street: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Postal code.
    pub zip_code: String,

    /// Country.
    pub country: String,
}

/// A registered customer.
///
/// `password` only ever holds the salted hash representation produced by
/// [`PasswordHash`]; plaintext never reaches this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque string id.
    pub id: String,

    /// Email, unique across all users at creation time.
    pub email: String,

    /// Salted one-way password hash.
    pub password: PasswordHash,

    /// Display name.
    pub name: String,

    /// Contact phone number.
    pub contact_number: String,

    /// Default shipping address.
    pub shipping_address: ShippingAddress,

    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

/// Registration input before an id, hash, and timestamp are assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Requested email.
    pub email: String,

    /// Plaintext password; hashed during registration and then discarded.
    pub password: String,

    /// Display name.
    pub name: String,

    /// Contact phone number.
    pub contact_number: String,

    /// Shipping address.
    pub shipping_address: ShippingAddress,
}
