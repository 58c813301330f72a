use std::env;

use aviator_core::errors::Locale;
use aviator_core::reservation::{TenantId, DEFAULT_TENANT_ID};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parses `text` or `json`. Anything else falls back to text.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table holding every entity (default: "aviator")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub aws_region: String,
    /// Endpoint override, e.g. DynamoDB Local (default: none)
    pub aws_endpoint_url: Option<String>,
    /// Club whose reservations are managed (default: the single-club tenant)
    pub tenant_id: String,
    /// Language of error messages (default: "en")
    pub language: String,
    /// Log line format (default: text)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "aviator")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Endpoint override (optional)
    /// - `AVIATOR_TENANT_ID` - Tenant id (default: "01HR9ZZNRFCKMAYNW3RY561QCP")
    /// - `AVIATOR_LANGUAGE` - `en` or `fr` (default: "en")
    /// - `LOG_FORMAT` - `text` or `json` (default: "text")
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("DYNAMODB_TABLE_NAME").unwrap_or_else(|_| "aviator".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            aws_endpoint_url: env::var("AWS_ENDPOINT_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            tenant_id: env::var("AVIATOR_TENANT_ID")
                .unwrap_or_else(|_| DEFAULT_TENANT_ID.to_string()),
            language: env::var("AVIATOR_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// The configured tenant.
    pub fn tenant(&self) -> TenantId {
        TenantId::new(self.tenant_id.clone())
    }

    /// The configured error message language.
    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.language)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }

    #[test]
    fn test_tenant_and_locale() {
        let config = Config {
            table_name: "aviator-test".to_string(),
            aws_region: "eu-central-2".to_string(),
            aws_endpoint_url: Some("http://localhost:8000".to_string()),
            tenant_id: "club-2".to_string(),
            language: "fr-CH".to_string(),
            log_format: LogFormat::Json,
        };

        assert_eq!(config.tenant(), TenantId::new("club-2"));
        assert_eq!(config.locale(), Locale::Fr);
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("DYNAMODB_TABLE_NAME");
        env::remove_var("AWS_REGION");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AVIATOR_TENANT_ID");
        env::remove_var("AVIATOR_LANGUAGE");
        env::remove_var("LOG_FORMAT");

        let config = Config::from_env();

        assert_eq!(config.table_name, "aviator");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.aws_endpoint_url, None);
        assert_eq!(config.tenant_id, DEFAULT_TENANT_ID);
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.log_format, LogFormat::Text);
    }
}
