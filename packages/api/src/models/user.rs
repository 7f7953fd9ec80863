//! # User, profile and address payloads
//!
//! ## [`Profile`]
//!
//! What `GET /users/me/` returns. Only `username`, `email` and `phone_number`
//! are editable; `id`, `is_active` and `created_at` are informational and
//! optional so older servers still deserialize.
//!
//! ## [`ProfileUpdate`]
//!
//! The body of `PUT /users/me/`. An empty phone number is sent as `null`.
//!
//! ## [`Registration`]
//!
//! The body of `POST /users/`. Same phone-number rule as [`ProfileUpdate`].
//!
//! ## [`Address`] / [`AddressDraft`]
//!
//! A stored address and the create/update payload for one. Ordering is
//! whatever the server returns.

use serde::{Deserialize, Serialize};

/// Response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The current user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// Phone number for an input field (absent becomes empty).
    pub fn phone_display(&self) -> &str {
        self.phone_number.as_deref().unwrap_or_default()
    }
}

/// Editable subset of [`Profile`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// New-account payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

/// A stored postal address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Editable copy of this address.
    pub fn to_draft(&self) -> AddressDraft {
        AddressDraft {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            is_default: self.is_default,
        }
    }
}

/// Create/update payload for an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressDraft {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Treat blank optional text as absent.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
