//! # Form state and field validation
//!
//! Each form keeps its raw field values plus the inline errors currently
//! shown under them. Setters are called on every keystroke and return
//! `false` when the keystroke was rejected, in which case the field keeps its
//! previous value. `validate` runs the submit-time checks and produces the
//! request payload or an [`ApiError::Validation`] listing every problem.
//!
//! | Field | Keystroke rule | Inline / submit error |
//! |-------|----------------|-----------------------|
//! | email | any | `Please enter a valid email address` |
//! | phone number | digits only | `Phone number must contain only digits` |
//! | postal code | digits only | `Postal code must be exactly 5 digits` |
//! | city, state, country | letters and spaces only | `<Field> is required`, `<Field> must contain only letters and spaces` |

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ApiError;
use crate::models::{non_empty, Address, AddressDraft, Profile, ProfileUpdate, Registration};

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Phone number must contain only digits";
pub const INVALID_POSTAL_CODE: &str = "Postal code must be exactly 5 digits";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
    })
}

fn letters_regex() -> &'static Regex {
    static LETTERS: OnceLock<Regex> = OnceLock::new();
    LETTERS.get_or_init(|| Regex::new(r"^[a-zA-Z\s]*$").expect("letters pattern"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Empty counts as digits-only; emptiness is checked separately.
pub fn is_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

pub fn is_letters_and_spaces(value: &str) -> bool {
    letters_regex().is_match(value)
}

pub fn is_postal_code(value: &str) -> bool {
    value.len() == 5 && is_digits(value)
}

fn required(label: &str) -> String {
    format!("{label} is required")
}

fn letters_only(label: &str) -> String {
    format!("{label} must contain only letters and spaces")
}

fn finish<T>(errors: Vec<String>, payload: impl FnOnce() -> T) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(payload())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Check the login form before anything is sent.
pub fn validate_login(username: &str, password: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if username.trim().is_empty() {
        errors.push(required("Username"));
    }
    if password.is_empty() {
        errors.push(required("Password"));
    }
    finish(errors, || ())
}

/// Personal-information form on the profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub email_error: Option<String>,
    pub phone_error: Option<String>,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            phone_number: profile.phone_display().to_string(),
            ..Default::default()
        }
    }

    pub fn set_username(&mut self, value: &str) {
        self.username = value.to_string();
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
        self.email_error = (!is_valid_email(value)).then(|| INVALID_EMAIL.to_string());
    }

    pub fn set_phone_number(&mut self, value: &str) -> bool {
        if !is_digits(value) {
            self.phone_error = Some(INVALID_PHONE.to_string());
            return false;
        }
        self.phone_number = value.to_string();
        self.phone_error = None;
        true
    }

    /// Submit stays disabled while the email is invalid.
    pub fn can_submit(&self) -> bool {
        self.email_error.is_none()
    }

    pub fn validate(&self) -> Result<ProfileUpdate, ApiError> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(required("Username"));
        }
        if !is_valid_email(&self.email) {
            errors.push(INVALID_EMAIL.to_string());
        }
        if !is_digits(&self.phone_number) {
            errors.push(INVALID_PHONE.to_string());
        }
        finish(errors, || ProfileUpdate {
            username: self.username.trim().to_string(),
            email: self.email.clone(),
            phone_number: non_empty(&self.phone_number),
        })
    }
}

/// The editable fields of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressField {
    Street,
    City,
    State,
    PostalCode,
    Country,
}

impl AddressField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::City => "City",
            Self::State => "State",
            Self::PostalCode => "Postal code",
            Self::Country => "Country",
        }
    }
}

/// Add/edit address dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressForm {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    errors: BTreeMap<AddressField, String>,
}

impl AddressForm {
    pub fn from_address(address: &Address) -> Self {
        let draft = address.to_draft();
        Self {
            street: draft.street,
            city: draft.city,
            state: draft.state,
            postal_code: draft.postal_code,
            country: draft.country,
            is_default: draft.is_default,
            errors: BTreeMap::new(),
        }
    }

    pub fn error(&self, field: AddressField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn set_street(&mut self, value: &str) {
        self.street = value.to_string();
        self.errors.remove(&AddressField::Street);
    }

    /// City, state or country. Rejects anything but letters and spaces.
    pub fn set_letters(&mut self, field: AddressField, value: &str) -> bool {
        if !is_letters_and_spaces(value) {
            return false;
        }
        let slot = match field {
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::Country => &mut self.country,
            AddressField::Street | AddressField::PostalCode => return false,
        };
        *slot = value.to_string();
        self.errors.remove(&field);
        true
    }

    pub fn set_postal_code(&mut self, value: &str) -> bool {
        if !is_digits(value) {
            return false;
        }
        self.postal_code = value.to_string();
        if value.is_empty() || is_postal_code(value) {
            self.errors.remove(&AddressField::PostalCode);
        } else {
            self.errors
                .insert(AddressField::PostalCode, INVALID_POSTAL_CODE.to_string());
        }
        true
    }

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    /// Save stays disabled while the postal code is malformed or a failed
    /// save left a city, state or country error in place.
    pub fn can_save(&self) -> bool {
        let postal = self.postal_code.trim();
        let letters_ok = [AddressField::City, AddressField::State, AddressField::Country]
            .iter()
            .all(|field| !self.errors.contains_key(field));
        letters_ok && (postal.is_empty() || is_postal_code(postal))
    }

    /// Submit-time checks. Errors are also kept for display next to the
    /// offending fields.
    pub fn validate(&mut self) -> Result<AddressDraft, ApiError> {
        self.errors.clear();

        if self.street.trim().is_empty() {
            self.errors
                .insert(AddressField::Street, required(AddressField::Street.label()));
        }

        for (field, value) in [
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::Country, &self.country),
        ] {
            let value = value.trim();
            if value.is_empty() {
                self.errors.insert(field, required(field.label()));
            } else if !is_letters_and_spaces(value) {
                self.errors.insert(field, letters_only(field.label()));
            }
        }

        if !is_postal_code(self.postal_code.trim()) {
            self.errors
                .insert(AddressField::PostalCode, INVALID_POSTAL_CODE.to_string());
        }

        let errors: Vec<String> = self.errors.values().cloned().collect();
        finish(errors, || AddressDraft {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            is_default: self.is_default,
        })
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub phone_error: Option<String>,
}

impl RegistrationForm {
    pub fn set_phone_number(&mut self, value: &str) -> bool {
        if !is_digits(value) {
            self.phone_error = Some(INVALID_PHONE.to_string());
            return false;
        }
        self.phone_number = value.to_string();
        self.phone_error = None;
        true
    }

    pub fn validate(&self) -> Result<Registration, ApiError> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(required("Username"));
        }
        if self.email.trim().is_empty() {
            errors.push(required("Email"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(INVALID_EMAIL.to_string());
        }
        if self.password.is_empty() {
            errors.push(required("Password"));
        }
        if !is_digits(&self.phone_number) {
            errors.push(INVALID_PHONE.to_string());
        }
        finish(errors, || Registration {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone_number: non_empty(&self.phone_number),
        })
    }
}
