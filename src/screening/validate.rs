//! Field validation rules.
//!
//! Every rule trims the input first and rejects an empty result. The
//! functions are pure: the same arguments always give the same verdict.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

use super::countries;
use super::fields::{FieldKey, Rule};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern compiles"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

// Same local-part set as the generic pattern minus `+`; the domain must be
// lowercase.
static GMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%-]+@gmail\.com$").expect("gmail pattern compiles"));

const MAX_YEARS: f64 = 50.0;

/// Validate `raw` for `field`.
///
/// `country_code` is only consulted for [`FieldKey::Phone`], where `raw` is
/// the dial code already combined with the local number.
pub fn validate(
    field: FieldKey,
    raw: &str,
    country_code: Option<&str>,
) -> Result<(), ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    match field.spec().rule {
        Rule::PersonName => validate_name(value),
        Rule::Email => validate_email(value),
        Rule::Phone => validate_phone(value, country_code),
        Rule::YearsOfExperience => validate_experience(value),
        Rule::TechStack => validate_tech_stack(value),
        Rule::NonEmpty => Ok(()),
    }
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 2 {
        return Err(ValidationError::LengthInvalid(
            "Name must be at least 2 characters long".to_string(),
        ));
    }
    if !NAME_RE.is_match(value) {
        return Err(ValidationError::FormatInvalid(
            "Name should only contain letters and spaces".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::FormatInvalid(
            "Please enter a valid email address".to_string(),
        ));
    }

    let is_gmail = value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case("gmail.com"));
    if is_gmail && !GMAIL_RE.is_match(value) {
        return Err(ValidationError::FormatInvalid(
            "Please enter a valid Gmail address (e.g., example@gmail.com)".to_string(),
        ));
    }
    Ok(())
}

fn validate_phone(value: &str, country_code: Option<&str>) -> Result<(), ValidationError> {
    let code = country_code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ValidationError::LookupFailed("Please select a country code".to_string()))?;

    let country = countries::lookup(code)
        .ok_or_else(|| ValidationError::LookupFailed("Invalid country code".to_string()))?;

    // Everything but digits is dropped after the dial code is removed.
    let digits = value
        .replacen(country.dial_code, "", 1)
        .chars()
        .filter(char::is_ascii_digit)
        .count();
    if digits != country.length {
        return Err(ValidationError::LengthInvalid(format!(
            "Phone number should be {} digits for {}",
            country.length, country.name
        )));
    }
    Ok(())
}

fn validate_experience(value: &str) -> Result<(), ValidationError> {
    let years: f64 = value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| {
            ValidationError::FormatInvalid(
                "Please enter a valid number for years of experience".to_string(),
            )
        })?;

    if !(0.0..=MAX_YEARS).contains(&years) {
        return Err(ValidationError::RangeInvalid(
            "Please enter a reasonable number of years (0-50)".to_string(),
        ));
    }
    Ok(())
}

fn validate_tech_stack(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 2 {
        return Err(ValidationError::LengthInvalid(
            "Please provide at least one technology".to_string(),
        ));
    }
    Ok(())
}
