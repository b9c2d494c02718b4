//! Settings documents stored as JSON strings in the `content_blocks` table.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Outgoing mail server settings.
///
/// `pass` is stored in plain text by the storefront, so it only gets
/// redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "port_number")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    #[serde(default)]
    pub from_email: String,
}

impl SmtpSettings {
    /// `content_blocks.section_key` of this document.
    pub const SECTION_KEY: &'static str = "smtp_config";
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            user: String::new(),
            pass: String::new(),
            from_email: String::new(),
        }
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .finish()
    }
}

const fn default_port() -> u16 {
    587
}

/// Accept a port as a JSON number or a numeric string (HTML forms send text).
///
/// # Errors
///
/// Fails when the value is neither, or is out of range.
pub fn port_number<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(n) => Ok(n),
        Port::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {s}"))),
    }
}

/// Storefront colour palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandSettings {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
    pub accent: String,
}

impl BrandSettings {
    /// `content_blocks.section_key` of this document.
    pub const SECTION_KEY: &'static str = "global_brand_settings";
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            primary: "#015030".to_owned(),
            secondary: "#FDB723".to_owned(),
            background: "#FDFBF7".to_owned(),
            text: "#1F2937".to_owned(),
            accent: "#E5E7EB".to_owned(),
        }
    }
}
