use std::{collections::BTreeMap, fmt, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

use crate::models::booking::{GuestContact, StayDates};

/// Field name to message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern is valid")
    });
    re.is_match(email.trim())
}

pub fn validate_dates(dates: &StayDates, guest_count: u32) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if dates.check_in.is_none() {
        errors.insert("check_in", "Check-in date is required");
    }
    match (dates.check_in, dates.check_out) {
        (_, None) => errors.insert("check_out", "Check-out date is required"),
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            errors.insert("check_out", "Check-out must be after check-in")
        }
        _ => {}
    }
    if guest_count < 1 {
        errors.insert("guest_count", "At least one guest is required");
    }

    errors.into_result()
}

pub fn validate_contact(contact: &GuestContact) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if contact.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }
    if contact.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(&contact.email) {
        errors.insert("email", "Enter a valid email address");
    }
    if contact.phone.trim().is_empty() {
        errors.insert("phone", "Phone number is required");
    }

    errors.into_result()
}
