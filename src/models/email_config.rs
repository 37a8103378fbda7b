use lettre::Address;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// SMTP settings for a single organization, keyed by `organization_code`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub use_tls: bool,
    pub use_ssl: bool,
    pub from_email: String,
    pub organization_name: String,
    pub organization_code: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .field("use_ssl", &self.use_ssl)
            .field("from_email", &self.from_email)
            .field("organization_name", &self.organization_name)
            .field("organization_code", &self.organization_code)
            .finish()
    }
}

/// Unvalidated create/update payload.
///
/// Built from a raw JSON object so that a missing, mistyped or out-of-range
/// value is reported by field name, never by quoting the submitted value.
#[derive(Default, Clone)]
pub struct EmailConfigRequest {
    pub smtp_server: Option<String>,
    pub smtp_port: Option<i64>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub use_tls: Option<bool>,
    pub use_ssl: Option<bool>,
    pub from_email: Option<String>,
    pub organization_name: Option<String>,
    pub organization_code: Option<String>,
}

impl std::fmt::Debug for EmailConfigRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfigRequest")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "<redacted>"))
            .field("use_tls", &self.use_tls)
            .field("use_ssl", &self.use_ssl)
            .field("from_email", &self.from_email)
            .field("organization_name", &self.organization_name)
            .field("organization_code", &self.organization_code)
            .finish()
    }
}

/// JSON `null` counts as absent. Unknown keys are ignored.
impl TryFrom<Map<String, Value>> for EmailConfigRequest {
    type Error = AppError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            smtp_server: string_field(&mut fields, "smtp_server")?,
            smtp_port: integer_field(&mut fields, "smtp_port")?,
            smtp_username: string_field(&mut fields, "smtp_username")?,
            smtp_password: string_field(&mut fields, "smtp_password")?,
            use_tls: bool_field(&mut fields, "use_tls")?,
            use_ssl: bool_field(&mut fields, "use_ssl")?,
            from_email: string_field(&mut fields, "from_email")?,
            organization_name: string_field(&mut fields, "organization_name")?,
            organization_code: string_field(&mut fields, "organization_code")?,
        })
    }
}

impl EmailConfigRequest {
    /// Check every field constraint and that the payload belongs to `code`.
    pub fn validate(self, code: &str) -> Result<EmailConfig, AppError> {
        let smtp_server = required_text("smtp_server", self.smtp_server)?;

        let smtp_port = self
            .smtp_port
            .ok_or_else(|| missing("smtp_port"))?;
        let smtp_port = u16::try_from(smtp_port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                AppError::Validation("smtp_port must be between 1 and 65535".to_string())
            })?;

        let smtp_username = required_text("smtp_username", self.smtp_username)?;

        // Passwords may legitimately contain only whitespace.
        let smtp_password = self
            .smtp_password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| missing("smtp_password"))?;

        let use_tls = self.use_tls.unwrap_or(true);
        let use_ssl = self.use_ssl.unwrap_or(false);
        if use_tls && use_ssl {
            return Err(AppError::Validation(
                "use_ssl cannot be combined with use_tls".to_string(),
            ));
        }

        let from_email = required_text("from_email", self.from_email)?;
        if from_email.parse::<Address>().is_err() {
            return Err(AppError::Validation(
                "from_email must be a valid email address".to_string(),
            ));
        }

        let organization_name = required_text("organization_name", self.organization_name)?;
        let organization_code = required_text("organization_code", self.organization_code)?;
        if organization_code != code {
            return Err(AppError::Validation(
                "organization_code does not match the organization in the path".to_string(),
            ));
        }

        Ok(EmailConfig {
            smtp_server,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_ssl,
            from_email,
            organization_name,
            organization_code,
        })
    }
}

fn take(fields: &mut Map<String, Value>, field: &str) -> Option<Value> {
    fields.remove(field).filter(|value| !value.is_null())
}

fn wrong_type(field: &str, expected: &str) -> AppError {
    AppError::Validation(format!("{field} must be {expected}"))
}

fn string_field(fields: &mut Map<String, Value>, field: &str) -> Result<Option<String>, AppError> {
    match take(fields, field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn integer_field(fields: &mut Map<String, Value>, field: &str) -> Result<Option<i64>, AppError> {
    match take(fields, field) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| wrong_type(field, "an integer")),
        Some(_) => Err(wrong_type(field, "an integer")),
    }
}

fn bool_field(fields: &mut Map<String, Value>, field: &str) -> Result<Option<bool>, AppError> {
    match take(fields, field) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(value)),
        Some(_) => Err(wrong_type(field, "a boolean")),
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{field} is required"))
}

fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(field))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request() -> EmailConfigRequest {
        EmailConfigRequest {
            smtp_server: Some("smtp.gmail.com".to_string()),
            smtp_port: Some(587),
            smtp_username: Some("mailer@example.com".to_string()),
            smtp_password: Some("app-password".to_string()),
            use_tls: Some(true),
            use_ssl: Some(false),
            from_email: Some("noreply@example.com".to_string()),
            organization_name: Some("Example Org".to_string()),
            organization_code: Some("400418".to_string()),
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let config = request().validate("400418").unwrap();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.organization_code, "400418");
    }

    #[test]
    fn tls_defaults_when_omitted() {
        let req = EmailConfigRequest {
            use_tls: None,
            use_ssl: None,
            ..request()
        };
        let config = req.validate("400418").unwrap();
        assert!(config.use_tls);
        assert!(!config.use_ssl);
    }

    #[test]
    fn rejects_missing_field_by_name() {
        let req = EmailConfigRequest {
            smtp_server: None,
            ..request()
        };
        assert_eq!(message(req.validate("400418").unwrap_err()), "smtp_server is required");

        let req = EmailConfigRequest {
            organization_name: Some("   ".to_string()),
            ..request()
        };
        assert!(message(req.validate("400418").unwrap_err()).contains("organization_name"));
    }

    #[test]
    fn rejects_out_of_range_ports() {
        for port in [0, -1, 65536] {
            let req = EmailConfigRequest {
                smtp_port: Some(port),
                ..request()
            };
            assert!(message(req.validate("400418").unwrap_err()).contains("smtp_port"));
        }
    }

    #[test]
    fn rejects_malformed_sender() {
        let req = EmailConfigRequest {
            from_email: Some("not-an-address".to_string()),
            ..request()
        };
        assert!(message(req.validate("400418").unwrap_err()).contains("from_email"));
    }

    #[test]
    fn rejects_tls_and_ssl_together() {
        let req = EmailConfigRequest {
            use_ssl: Some(true),
            ..request()
        };
        assert!(message(req.validate("400418").unwrap_err()).contains("use_ssl"));

        let req = EmailConfigRequest {
            use_tls: Some(false),
            use_ssl: Some(true),
            ..request()
        };
        assert!(req.validate("400418").is_ok());
    }

    #[test]
    fn rejects_code_mismatch() {
        let err = request().validate("999999").unwrap_err();
        assert!(message(err).contains("organization_code"));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = request().validate("400418").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("app-password"));
        assert!(debug.contains("<redacted>"));
    }

    fn from_json(value: Value) -> Result<EmailConfigRequest, AppError> {
        match value {
            Value::Object(fields) => EmailConfigRequest::try_from(fields),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn json_object_converts_into_request() {
        let req = from_json(json!({
            "smtp_server": "smtp.gmail.com",
            "smtp_port": 587,
            "smtp_username": "mailer@example.com",
            "smtp_password": "app-password",
            "use_ssl": null,
            "from_email": "noreply@example.com",
            "organization_name": "Example Org",
            "organization_code": "400418",
            "notes": "ignored"
        }))
        .unwrap();
        assert_eq!(req.smtp_port, Some(587));
        assert_eq!(req.use_ssl, None);
        assert!(req.validate("400418").is_ok());
    }

    #[test]
    fn mistyped_fields_are_named() {
        let cases = [
            (json!({ "smtp_port": "587" }), "smtp_port must be an integer"),
            (json!({ "smtp_port": 587.5 }), "smtp_port must be an integer"),
            (json!({ "use_tls": "yes" }), "use_tls must be a boolean"),
            (json!({ "smtp_server": ["a"] }), "smtp_server must be a string"),
        ];
        for (value, expected) in cases {
            assert_eq!(message(from_json(value).unwrap_err()), expected);
        }
    }

    #[test]
    fn mistyped_password_is_not_echoed() {
        let msg = message(from_json(json!({ "smtp_password": 987654321 })).unwrap_err());
        assert!(msg.contains("smtp_password"));
        assert!(!msg.contains("987654321"));
    }

    #[test]
    fn request_debug_hides_password() {
        let debug = format!("{:?}", request());
        assert!(!debug.contains("app-password"));
        assert!(debug.contains("<redacted>"));
    }
}
