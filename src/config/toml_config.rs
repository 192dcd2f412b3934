use crate::adapters::webhook::DEFAULT_TIMEOUT_SECONDS;
use crate::domain::ports::ConfigProvider;
use crate::domain::rut::Strictness;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

pub const MAX_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub form: FormConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    pub business_unit: Option<String>,
    pub strictness: Option<Strictness>,
}

impl IntakeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntakeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| IntakeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for IntakeConfig {
    fn webhook_url(&self) -> &str {
        &self.webhook.url
    }

    fn business_unit(&self) -> &str {
        self.form.business_unit.as_deref().unwrap_or_default()
    }

    fn timeout_seconds(&self) -> u64 {
        self.webhook.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn strictness(&self) -> Strictness {
        self.form.strictness.unwrap_or_default()
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.webhook
            .headers
            .as_ref()
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

impl Validate for IntakeConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("webhook.url", &self.webhook.url)?;

        if let Some(timeout) = self.webhook.timeout_seconds {
            validation::validate_range("webhook.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        if let Some(headers) = &self.webhook.headers {
            for (name, value) in headers {
                validation::validate_header("webhook.headers", name, value)?;
            }
        }

        let business_unit =
            validation::validate_required_field("form.business_unit", &self.form.business_unit)?;
        validation::validate_non_empty_string("form.business_unit", business_unit)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[webhook]
url = "https://hooks.example.com/crm"
timeout_seconds = 10

[webhook.headers]
x-api-key = "abc"

[form]
business_unit = "retail"
strictness = "standard"
"#;

        let config = IntakeConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.webhook_url(), "https://hooks.example.com/crm");
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.business_unit(), "retail");
        assert_eq!(config.strictness(), Strictness::Standard);
        assert_eq!(
            config.headers(),
            vec![("x-api-key".to_string(), "abc".to_string())]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = IntakeConfig::from_toml_str("[webhook]\nurl = \"https://h.cl/x\"\n").unwrap();
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.strictness(), Strictness::Strict);
        assert!(config.headers().is_empty());
        assert!(matches!(
            config.validate(),
            Err(IntakeError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RUT_INTAKE_TEST_TOKEN", "tok-123");

        let toml_content = r#"
[webhook]
url = "https://hooks.example.com/crm"

[webhook.headers]
authorization = "Bearer ${RUT_INTAKE_TEST_TOKEN}"
x-missing = "${RUT_INTAKE_TEST_UNSET}"

[form]
business_unit = "retail"
"#;

        let config = IntakeConfig::from_toml_str(toml_content).unwrap();
        let headers = config.webhook.headers.clone().unwrap();
        assert_eq!(headers["authorization"], "Bearer tok-123");
        assert_eq!(headers["x-missing"], "${RUT_INTAKE_TEST_UNSET}");

        std::env::remove_var("RUT_INTAKE_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = IntakeConfig::from_toml_str(
            "[webhook]\nurl = \"not-a-url\"\n[form]\nbusiness_unit = \"x\"\n",
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout = IntakeConfig::from_toml_str(
            "[webhook]\nurl = \"https://h.cl\"\ntimeout_seconds = 0\n[form]\nbusiness_unit = \"x\"\n",
        )
        .unwrap();
        assert!(bad_timeout.validate().is_err());

        assert!(IntakeConfig::from_toml_str("[form]\nstrictness = \"loose\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[webhook]
url = "https://hooks.example.com/crm"

[form]
business_unit = "file-unit"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = IntakeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.business_unit(), "file-unit");
    }
}
