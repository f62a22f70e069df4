//! Client-side field validation and input coercion
//!
//! Only required-field and pattern checks happen here; the backend stays
//! the authority on everything else (uniqueness is checked remotely).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::resource::{FieldKind, FieldSpec};

/// Per-field error messages keyed by record key.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email regex pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Optional leading +, then 7-15 digits allowing spaces and dashes
    Regex::new(r"^\+?[0-9][0-9 \-]{6,14}$").expect("Phone regex pattern is valid")
});

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._\-]{3,32}$").expect("Username regex pattern is valid")
});

/// Validate one raw input value against its field spec.
///
/// Returns the inline error message, or `None` when valid. Empty optional
/// fields are always valid.
pub fn validate_value(spec: &FieldSpec, raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return spec
            .required
            .then(|| format!("{} is required", spec.label));
    }

    match spec.kind {
        FieldKind::Email if !EMAIL_PATTERN.is_match(value) => {
            Some("Enter a valid email address".to_string())
        }
        FieldKind::Phone if !PHONE_PATTERN.is_match(value) => {
            Some("Enter a valid phone number".to_string())
        }
        FieldKind::Username if !USERNAME_PATTERN.is_match(value) => Some(
            "3-32 characters: letters, digits, '.', '_' or '-'".to_string(),
        ),
        FieldKind::Number if value.parse::<f64>().is_err() => {
            Some(format!("{} must be a number", spec.label))
        }
        FieldKind::Select(options) if !options.contains(&value) => {
            Some(format!("Choose one of: {}", options.join(", ")))
        }
        _ => None,
    }
}

/// Validate every field; `value_of` returns the raw input for a key.
pub fn validate_fields<'a, F>(specs: &[FieldSpec], value_of: F) -> FieldErrors
where
    F: Fn(&str) -> &'a str,
{
    specs
        .iter()
        .filter_map(|spec| {
            validate_value(spec, value_of(spec.key)).map(|msg| (spec.key.to_string(), msg))
        })
        .collect()
}

/// Convert raw form input into the JSON value sent to the backend.
///
/// Empty input becomes `null`; numbers and booleans are typed when they parse,
/// otherwise the trimmed text is sent as-is and the server decides.
pub fn parse_input(spec: &FieldSpec, raw: &str) -> Value {
    let value = raw.trim();
    if value.is_empty() {
        return Value::Null;
    }
    match spec.kind {
        FieldKind::Number => value
            .parse::<i64>()
            .map(Value::from)
            .ok()
            .or_else(|| {
                value
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            })
            .unwrap_or_else(|| Value::String(value.to_string())),
        FieldKind::Bool => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" => Value::Bool(false),
            _ => Value::String(value.to_string()),
        },
        _ => Value::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;

    fn spec(key: &str) -> FieldSpec {
        *Resource::Users
            .fields()
            .iter()
            .chain(Resource::Farmers.fields())
            .chain(Resource::Advisors.fields())
            .find(|f| f.key == key)
            .unwrap()
    }

    #[test]
    fn test_required_field_message() {
        let username = spec("Username");
        assert_eq!(
            validate_value(&username, "  ").as_deref(),
            Some("Username is required")
        );
    }

    #[test]
    fn test_optional_empty_is_valid() {
        let phone = Resource::Users
            .fields()
            .iter()
            .find(|f| f.key == "Phone")
            .unwrap();
        assert!(!phone.required);
        assert_eq!(validate_value(phone, ""), None);
    }

    #[test]
    fn test_email_pattern() {
        let email = spec("Email");
        assert_eq!(validate_value(&email, "ana@farm.org"), None);
        assert!(validate_value(&email, "ana@farm").is_some());
        assert!(validate_value(&email, "a na@farm.org").is_some());
    }

    #[test]
    fn test_phone_pattern() {
        let phone = spec("Phone");
        assert_eq!(validate_value(&phone, "+254 700-123456"), None);
        assert!(validate_value(&phone, "12ab").is_some());
        assert!(validate_value(&phone, "123").is_some());
    }

    #[test]
    fn test_username_pattern() {
        let username = spec("Username");
        assert_eq!(validate_value(&username, "ana.m_01"), None);
        assert!(validate_value(&username, "an").is_some());
        assert!(validate_value(&username, "ana m").is_some());
    }

    #[test]
    fn test_number_and_select() {
        let size = spec("FarmSizeHa");
        assert_eq!(validate_value(&size, "2.5"), None);
        assert!(validate_value(&size, "two").is_some());

        let status = spec("Status");
        assert_eq!(validate_value(&status, "Active"), None);
        assert_eq!(
            validate_value(&status, "Retired").as_deref(),
            Some("Choose one of: Active, Inactive")
        );
    }

    #[test]
    fn test_validate_fields_collects_all_errors() {
        let errors = validate_fields(Resource::Users.fields(), |key| match key {
            "Username" => "ok_user",
            "Email" => "bad",
            _ => "",
        });
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Email", "FullName"]);
    }

    #[test]
    fn test_parse_input_types() {
        assert_eq!(parse_input(&spec("FarmSizeHa"), "3"), Value::from(3));
        assert_eq!(parse_input(&spec("FarmSizeHa"), "2.5"), Value::from(2.5));
        assert_eq!(parse_input(&spec("FullName"), "  Ana "), Value::from("Ana"));
        assert_eq!(parse_input(&spec("FullName"), ""), Value::Null);

        let active = spec("IsActive");
        assert_eq!(parse_input(&active, "true"), Value::Bool(true));
        assert_eq!(parse_input(&active, "No"), Value::Bool(false));
    }
}
