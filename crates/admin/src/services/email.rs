//! SMTP test delivery.
//!
//! Builds a transient transport from the submitted settings, checks the
//! connection and sends one fixed message. Nothing is cached between calls.

use std::time::Duration;

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        Error as SmtpError,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use marom_core::SmtpSettings;

/// Subject line of the test message.
pub const TEST_SUBJECT: &str = "Test Email from Marom Admin";

/// Port on which the server expects implicit TLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// HTML body of the test message.
#[derive(Template)]
#[template(path = "email/smtp_test.html")]
struct SmtpTestEmailHtml<'a> {
    brand: &'a str,
    host: &'a str,
    port: u16,
}

/// Plain text body of the test message.
#[derive(Template)]
#[template(path = "email/smtp_test.txt")]
struct SmtpTestEmailText<'a> {
    brand: &'a str,
    host: &'a str,
    port: u16,
}

/// Errors that can occur when sending the test email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// A required field was absent or blank.
    #[error("Missing required SMTP configuration fields.")]
    MissingFields,

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// The server did not accept the connection.
    #[error("Could not connect to SMTP server {host}:{port}")]
    Unreachable { host: String, port: u16 },

    /// SMTP transport error.
    #[error("{0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl EmailError {
    /// Whether the request itself was at fault (as opposed to the server).
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidAddress(_))
    }
}

/// Body of `POST /api/test-smtp`.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpTestRequest {
    pub host: Option<String>,
    #[serde(deserialize_with = "lenient_port")]
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
}

impl std::fmt::Debug for SmtpTestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTestRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .finish()
    }
}

impl SmtpTestRequest {
    /// Request built from saved settings and a recipient.
    #[must_use]
    pub fn from_settings(settings: &SmtpSettings, to_email: &str) -> Self {
        Self {
            host: Some(settings.host.clone()),
            port: Some(settings.port),
            user: Some(settings.user.clone()),
            pass: Some(settings.pass.clone()),
            from_email: Some(settings.from_email.clone()),
            to_email: Some(to_email.to_string()),
        }
    }

    /// Check that every field is present.
    ///
    /// # Errors
    ///
    /// [`EmailError::MissingFields`] when any field is absent or blank,
    /// [`EmailError::InvalidAddress`] when an address is malformed.
    pub fn validate(&self) -> Result<ValidatedSmtp<'_>, EmailError> {
        fn present(value: Option<&String>) -> Result<&str, EmailError> {
            value
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or(EmailError::MissingFields)
        }

        let host = present(self.host.as_ref())?;
        let port = self.port.filter(|p| *p != 0).ok_or(EmailError::MissingFields)?;
        let user = present(self.user.as_ref())?;
        let pass = self.pass.as_deref().filter(|p| !p.is_empty()).ok_or(EmailError::MissingFields)?;
        let from = present(self.from_email.as_ref())?;
        let to = present(self.to_email.as_ref())?;

        Ok(ValidatedSmtp {
            host,
            port,
            user,
            pass,
            from: mailbox(from)?,
            to: mailbox(to)?,
        })
    }
}

/// A complete SMTP test request.
pub struct ValidatedSmtp<'a> {
    pub host: &'a str,
    pub port: u16,
    user: &'a str,
    pass: &'a str,
    pub from: Mailbox,
    pub to: Mailbox,
}

impl std::fmt::Debug for ValidatedSmtp<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedSmtp")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// TLS mode used for a port: implicit TLS on 465, opportunistic STARTTLS
/// elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    Implicit,
    StartTls,
}

impl TlsMode {
    #[must_use]
    pub const fn for_port(port: u16) -> Self {
        if port == IMPLICIT_TLS_PORT {
            Self::Implicit
        } else {
            Self::StartTls
        }
    }
}

/// Send the test message described by `request`.
///
/// # Errors
///
/// Returns an [`EmailError`] for incomplete input, unreachable servers,
/// authentication failures and rejected messages.
#[tracing::instrument(skip(request), fields(host = tracing::field::Empty, port = tracing::field::Empty))]
pub async fn send_test_email(request: &SmtpTestRequest) -> Result<(), EmailError> {
    let smtp = request.validate()?;
    let span = tracing::Span::current();
    span.record("host", smtp.host);
    span.record("port", smtp.port);

    let tls_parameters = TlsParameters::builder(smtp.host.to_string())
        .dangerous_accept_invalid_certs(true)
        .build()?;
    let tls = match TlsMode::for_port(smtp.port) {
        TlsMode::Implicit => Tls::Wrapper(tls_parameters),
        TlsMode::StartTls => Tls::Opportunistic(tls_parameters),
    };

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp.host)
        .port(smtp.port)
        .tls(tls)
        .credentials(Credentials::new(smtp.user.to_string(), smtp.pass.to_string()))
        .timeout(Some(SMTP_TIMEOUT))
        .build();

    if !mailer.test_connection().await? {
        return Err(EmailError::Unreachable {
            host: smtp.host.to_string(),
            port: smtp.port,
        });
    }

    let message = build_message(&smtp)?;
    mailer.send(message).await?;

    tracing::info!(to = %smtp.to, "Test email sent successfully");
    Ok(())
}

/// Build the multipart test message.
fn build_message(smtp: &ValidatedSmtp<'_>) -> Result<Message, EmailError> {
    let html = SmtpTestEmailHtml {
        brand: "Marom",
        host: smtp.host,
        port: smtp.port,
    }
    .render()?;
    let text = SmtpTestEmailText {
        brand: "Marom",
        host: smtp.host,
        port: smtp.port,
    }
    .render()?;

    Ok(Message::builder()
        .from(smtp.from.clone())
        .to(smtp.to.clone())
        .subject(TEST_SUBJECT)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html),
                ),
        )?)
}

fn mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

/// Accept the port as a number or numeric string; anything else is absent.
fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> SmtpTestRequest {
        serde_json::from_value(serde_json::json!({
            "host": "smtp.example.com",
            "port": "587",
            "user": "mailer",
            "pass": "hunter22",
            "fromEmail": "shop@marom.co",
            "toEmail": "owner@marom.co"
        }))
        .unwrap()
    }

    #[test]
    fn test_port_accepts_string_or_number() {
        assert_eq!(complete().port, Some(587));
        let request: SmtpTestRequest =
            serde_json::from_value(serde_json::json!({ "port": 465 })).unwrap();
        assert_eq!(request.port, Some(465));
        let request: SmtpTestRequest =
            serde_json::from_value(serde_json::json!({ "port": "" })).unwrap();
        assert_eq!(request.port, None);
    }

    #[test]
    fn test_validate_complete_request() {
        let request = complete();
        let smtp = request.validate().unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.to.email.to_string(), "owner@marom.co");
    }

    #[test]
    fn test_validate_missing_fields() {
        for field in ["host", "port", "user", "pass", "fromEmail", "toEmail"] {
            let mut value = serde_json::json!({
                "host": "smtp.example.com",
                "port": 587,
                "user": "mailer",
                "pass": "hunter22",
                "fromEmail": "shop@marom.co",
                "toEmail": "owner@marom.co"
            });
            value.as_object_mut().unwrap().remove(field);
            let request: SmtpTestRequest = serde_json::from_value(value).unwrap();
            let err = request.validate().unwrap_err();
            assert!(matches!(err, EmailError::MissingFields), "{field}");
            assert_eq!(err.to_string(), "Missing required SMTP configuration fields.");
        }
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut request = complete();
        request.to_email = Some("not an address".to_string());
        assert!(matches!(
            request.validate(),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_validate_accepts_display_name() {
        let mut request = complete();
        request.from_email = Some("Marom <shop@marom.co>".to_string());
        let smtp = request.validate().unwrap();
        assert_eq!(smtp.from.name.as_deref(), Some("Marom"));
        assert_eq!(smtp.from.email.to_string(), "shop@marom.co");

        let message = build_message(&smtp).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: Marom <shop@marom.co>"));
    }

    #[test]
    fn test_tls_mode_for_port() {
        assert_eq!(TlsMode::for_port(465), TlsMode::Implicit);
        assert_eq!(TlsMode::for_port(587), TlsMode::StartTls);
        assert_eq!(TlsMode::for_port(25), TlsMode::StartTls);
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", complete());
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_message_has_fixed_subject() {
        let request = complete();
        let smtp = request.validate().unwrap();
        let message = build_message(&smtp).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Test Email from Marom Admin"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("text/plain"));
    }

    #[tokio::test]
    async fn test_send_fails_without_server() {
        let mut request = complete();
        request.host = Some("127.0.0.1".to_string());
        request.port = Some(1);
        let err = send_test_email(&request).await.unwrap_err();
        assert!(!err.is_invalid_request());
    }

    #[tokio::test]
    async fn test_send_rejects_incomplete_before_connecting() {
        let err = send_test_email(&SmtpTestRequest::default()).await.unwrap_err();
        assert!(err.is_invalid_request());
    }
}
