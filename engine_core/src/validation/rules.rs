//! Reusable validation rules

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

lazy_static! {
    /// At least one visible character and no control characters.
    static ref FIELD_NAME_REGEX: Regex = Regex::new(r"^[^\p{Cc}]*\S[^\p{Cc}]*$").unwrap();
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// The human-readable message of `error`, falling back to its code.
pub fn error_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

pub fn validate_field_name(field: &str) -> Result<(), ValidationError> {
    if field.is_empty() {
        return Err(invalid("empty", "Field name cannot be empty"));
    }

    if field.len() > 255 {
        return Err(invalid("too_long", "Field name is too long"));
    }

    if !FIELD_NAME_REGEX.is_match(field) {
        return Err(invalid("invalid_characters", "Field name contains invalid characters"));
    }

    Ok(())
}

/// Every entry of `fields` that `allowed` does not list.
pub fn disallowed_fields<'a, I>(fields: I, allowed: &[String]) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    fields
        .into_iter()
        .filter(|field| !allowed.iter().any(|a| a == field))
        .collect()
}

pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    if !weight.is_finite() {
        return Err(invalid("not_finite", "Weight must be a finite number"));
    }

    if weight < 0.0 {
        return Err(invalid("negative", "Weight must not be negative"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_field_name() {
        assert!(validate_field_name("price").is_ok());
        assert!(validate_field_name("customer.name").is_ok());
        assert!(validate_field_name("unit price").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name("   ").is_err());
        assert!(validate_field_name("bad\nname").is_err());
        assert!(validate_field_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_errors_carry_code_and_message() {
        let error = validate_field_name("").unwrap_err();
        assert_eq!(error.code, "empty");
        assert_eq!(error_message(&error), "Field name cannot be empty");

        let error = validate_weight(-2.0).unwrap_err();
        assert_eq!(error.code, "negative");
        assert_eq!(error_message(&error), "Weight must not be negative");
    }

    #[test]
    fn test_disallowed_fields() {
        let allowed = vec!["price".to_string(), "qty".to_string()];
        assert_eq!(disallowed_fields(vec!["price", "cost", "qty"], &allowed), vec!["cost"]);
        assert!(disallowed_fields(Vec::<&str>::new(), &allowed).is_empty());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(2.5).is_ok());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }
}
