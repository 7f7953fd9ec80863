//! # Error taxonomy for every API call
//!
//! Failures are classified once, where the HTTP response (or its absence) is
//! first seen, into an [`ApiError`]. Views never inspect raw bodies; they ask
//! the error for a message via [`ApiError::user_message`], passing the
//! category text to use when the server gave no usable explanation.
//!
//! | Variant | Produced when | Shown as |
//! |---------|---------------|----------|
//! | `Validation` | local field checks fail, or `detail` is a list/object | `Validation error: <issues>` |
//! | `Server` | `detail` is a string | the string, verbatim |
//! | `Rejected` | error status without a usable `detail` | the caller's category message |
//! | `Transport` | no response (connect failure, timeout) | connectivity message |
//! | `Unexpected` | a success body that does not decode, or anything else | the caller's category message |

use serde_json::Value;

/// Message shown for transport-level failures.
pub const CONNECTIVITY_MESSAGE: &str = "No response from server. Check your network connection.";

/// A failed API call, classified at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Server error: {status}")]
    Rejected { status: u16 },
    #[error("No response from server. Check your network connection.")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Classify an error response from its status code and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let Ok(json) = serde_json::from_str::<Value>(body) else {
            return Self::Rejected { status };
        };
        match json.get("detail") {
            Some(Value::String(message)) => Self::Server {
                status,
                message: message.clone(),
            },
            Some(Value::Array(items)) => Self::Validation(items.iter().map(issue_text).collect()),
            Some(Value::Object(_)) => Self::Validation(vec![]),
            _ => Self::Rejected { status },
        }
    }

    /// Status code of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Rejected { status } => Some(*status),
            _ => None,
        }
    }

    /// The server refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The server refused an upload because the filename is taken.
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Self::Server { status: 400, message } if message.contains("already exists"))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Text to show the user. `category` replaces errors that carry no
    /// server-supplied explanation.
    pub fn user_message(&self, category: &str) -> String {
        match self {
            Self::Validation(issues) if issues.is_empty() => {
                "Validation error: Please check your information".to_string()
            }
            Self::Validation(_) | Self::Server { .. } | Self::Transport(_) => self.to_string(),
            Self::Rejected { .. } | Self::Unexpected(_) => category.to_string(),
        }
    }
}

fn issue_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("msg") {
            Some(Value::String(msg)) => msg.clone(),
            _ => "Validation error".to_string(),
        },
        other => other.to_string(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Unexpected(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Rejected {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_is_shown_verbatim() {
        let err = ApiError::from_response(400, r#"{"detail": "Email already registered"}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                message: "Email already registered".to_string()
            }
        );
        assert_eq!(err.user_message("Invalid profile data"), "Email already registered");
    }

    #[test]
    fn test_list_detail_becomes_validation_issues() {
        let body = r#"{"detail": [
            {"loc": ["body", "postal_code"], "msg": "Postal code must be exactly 5 digits", "type": "value_error"},
            {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"}
        ]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(
            err.user_message("unused"),
            "Validation error: Postal code must be exactly 5 digits, value is not a valid email address"
        );
    }

    #[test]
    fn test_object_detail_uses_generic_validation_text() {
        let err = ApiError::from_response(422, r#"{"detail": {"field": "bad"}}"#);
        assert_eq!(err.user_message("unused"), "Validation error: Please check your information");
    }

    #[test]
    fn test_missing_detail_uses_category_message() {
        for body in [r#"{"error": "nope"}"#, "<html>502</html>", ""] {
            let err = ApiError::from_response(502, body);
            assert_eq!(err, ApiError::Rejected { status: 502 });
            assert_eq!(err.user_message("Failed to fetch files"), "Failed to fetch files");
        }
        assert_eq!(ApiError::Rejected { status: 502 }.to_string(), "Server error: 502");
    }

    #[test]
    fn test_transport_message() {
        let err = ApiError::Transport("connection refused".into());
        assert!(err.is_transport());
        assert_eq!(err.user_message("ignored"), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn test_duplicate_and_unauthorized_flags() {
        let dup = ApiError::from_response(
            400,
            r#"{"detail": "A file with the name 'a.txt' already exists. Please rename your file and try again."}"#,
        );
        assert!(dup.is_duplicate_name());
        assert!(!dup.is_unauthorized());

        let other_400 = ApiError::from_response(400, r#"{"detail": "Unsupported file type"}"#);
        assert!(!other_400.is_duplicate_name());

        let unauthorized = ApiError::from_response(401, r#"{"detail": "Could not validate credentials"}"#);
        assert!(unauthorized.is_unauthorized());
        assert!(ApiError::Rejected { status: 401 }.is_unauthorized());
    }
}
