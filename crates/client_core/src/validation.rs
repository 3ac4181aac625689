//! Field rules for the registration form.
//!
//! Every rule looks at the whole [`FormValues`] record, so the error map is
//! always recomputed from scratch rather than patched per field.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use shared::domain::Position;

use crate::types::{FormField, FormValues};

pub const NAME_MIN_LEN: usize = 2;

pub const NAME_REQUIRED: &str = "Name is required";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const INVALID_PHONE: &str = "Invalid phone number, should start with +380 and have 9 digits";
pub const POSITION_REQUIRED: &str = "Position is required";
pub const PHOTO_REQUIRED: &str = "Photo is required";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// `\d` is Unicode-aware in `regex`; the national format is ASCII digits only.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+380[0-9]{9}$").expect("phone pattern compiles"));

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= NAME_MIN_LEN
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn is_valid_position(position: &str) -> bool {
    position.parse::<Position>().is_ok()
}

pub fn validate_field(field: FormField, values: &FormValues) -> Option<&'static str> {
    let valid = match field {
        FormField::Name => is_valid_name(&values.name),
        FormField::Email => is_valid_email(&values.email),
        FormField::Phone => is_valid_phone(&values.phone),
        FormField::Position => is_valid_position(&values.position),
        FormField::Photo => values.photo.is_some(),
    };
    if valid {
        return None;
    }
    Some(match field {
        FormField::Name => NAME_REQUIRED,
        FormField::Email => INVALID_EMAIL,
        FormField::Phone => INVALID_PHONE,
        FormField::Position => POSITION_REQUIRED,
        FormField::Photo => PHOTO_REQUIRED,
    })
}

pub fn validate(values: &FormValues) -> FieldErrors {
    let errors = FormField::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, values).map(|message| (field, message)))
        .collect();
    FieldErrors { errors }
}

/// Error message per invalid field. A field absent from the map is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
