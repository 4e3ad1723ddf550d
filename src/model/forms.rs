//! Form validation and autosave records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const REQUIRED: &str = "This field is required";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const SHORT_PASSWORD: &str = "Password must be at least 8 characters";
pub const MISSING_NAME: &str = "Please enter your full name";
pub const MISSING_MESSAGE: &str = "Please enter your message";

const MIN_PASSWORD_CHARS: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Blur-time check of one field; `None` when the value passes
pub fn validate_field(input_type: &str, required: bool, value: &str) -> Option<&'static str> {
    let value = value.trim();
    if required && value.is_empty() {
        return Some(REQUIRED);
    }
    if input_type == "email" && !value.is_empty() && !is_valid_email(value) {
        return Some(INVALID_EMAIL);
    }
    if input_type == "password" && !value.is_empty() && value.chars().count() < MIN_PASSWORD_CHARS
    {
        return Some(SHORT_PASSWORD);
    }
    None
}

/// Which submit flow a form follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Contact,
    Settings,
}

impl FormKind {
    pub fn from_card_key(key: &str) -> Option<FormKind> {
        match key {
            "login-form" => Some(FormKind::Login),
            "contact-form" => Some(FormKind::Contact),
            "settings-form" => Some(FormKind::Settings),
            _ => None,
        }
    }

    /// Label the submit control shows while the submission runs
    pub fn busy_label(&self) -> Option<&'static str> {
        match self {
            FormKind::Login => Some("Signing in..."),
            FormKind::Contact => Some("Sending..."),
            FormKind::Settings => None,
        }
    }

    /// Label restored when the submission finishes
    pub fn idle_label(&self) -> &'static str {
        match self {
            FormKind::Login => "Sign in",
            FormKind::Contact => "Send message",
            FormKind::Settings => "Save settings",
        }
    }

    pub fn success_toast(&self) -> Option<&'static str> {
        match self {
            FormKind::Login => Some("✓ Successfully signed in! (Demo)"),
            FormKind::Contact => Some("Message sent successfully!"),
            FormKind::Settings => None,
        }
    }

    /// Submit-time check over the values keyed by field id
    pub fn validate(&self, values: &BTreeMap<String, String>) -> Result<(), &'static str> {
        let get = |id: &str| values.get(id).map(String::as_str).unwrap_or("");
        match self {
            FormKind::Login => {
                let email = get("email");
                if email.is_empty() || !is_valid_email(email) {
                    return Err(INVALID_EMAIL);
                }
                if get("password").chars().count() < MIN_PASSWORD_CHARS {
                    return Err(SHORT_PASSWORD);
                }
                Ok(())
            }
            FormKind::Contact => {
                if get("firstName").is_empty() || get("lastName").is_empty() {
                    return Err(MISSING_NAME);
                }
                let email = get("contactEmail");
                if email.is_empty() || !is_valid_email(email) {
                    return Err(INVALID_EMAIL);
                }
                if get("message").is_empty() {
                    return Err(MISSING_MESSAGE);
                }
                Ok(())
            }
            FormKind::Settings => Ok(()),
        }
    }
}

/// Stored under `autosave_<form title>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveRecord {
    pub data: BTreeMap<String, String>,
    /// Milliseconds since the epoch
    pub timestamp: i64,
}

pub fn autosave_key(form_title: &str) -> String {
    let name = if form_title.is_empty() {
        "form"
    } else {
        form_title
    };
    format!("autosave_{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn test_validate_field_order() {
        assert_eq!(validate_field("email", true, "  "), Some(REQUIRED));
        assert_eq!(validate_field("email", false, "nope"), Some(INVALID_EMAIL));
        assert_eq!(validate_field("email", false, ""), None);
        assert_eq!(validate_field("password", true, "short"), Some(SHORT_PASSWORD));
        assert_eq!(validate_field("password", true, "longenough"), None);
        assert_eq!(validate_field("text", false, ""), None);
    }

    #[test]
    fn test_login_submit_checks_email_then_password() {
        let login = FormKind::Login;
        assert_eq!(login.validate(&values(&[])), Err(INVALID_EMAIL));
        assert_eq!(
            login.validate(&values(&[("email", "a@b.co"), ("password", "123")])),
            Err(SHORT_PASSWORD)
        );
        assert_eq!(
            login.validate(&values(&[("email", "a@b.co"), ("password", "12345678")])),
            Ok(())
        );
    }

    #[test]
    fn test_contact_submit_checks_in_order() {
        let contact = FormKind::Contact;
        assert_eq!(contact.validate(&values(&[("firstName", "Ada")])), Err(MISSING_NAME));
        assert_eq!(
            contact.validate(&values(&[("firstName", "Ada"), ("lastName", "L")])),
            Err(INVALID_EMAIL)
        );
        assert_eq!(
            contact.validate(&values(&[
                ("firstName", "Ada"),
                ("lastName", "L"),
                ("contactEmail", "ada@x.io")
            ])),
            Err(MISSING_MESSAGE)
        );
    }

    #[test]
    fn test_autosave_record_json_shape() {
        let record = AutosaveRecord {
            data: values(&[("email", "a@b.co")]),
            timestamp: 1700000000000,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"data":{"email":"a@b.co"},"timestamp":1700000000000}"#
        );
        assert_eq!(autosave_key("Sign in"), "autosave_Sign in");
        assert_eq!(autosave_key(""), "autosave_form");
    }
}
