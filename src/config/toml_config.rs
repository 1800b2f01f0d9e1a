use crate::adapters::sparql::{user_agent, DEFAULT_ENDPOINT};
use crate::config::{
    DEFAULT_CONTACT, DEFAULT_COUNTRY_COLUMN, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_PLACE_COLUMN,
};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input")]
    pub path: String,
    #[serde(default = "default_place_column")]
    pub place_column: String,
    #[serde(default = "default_country_column")]
    pub country_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_contact")]
    pub contact: String,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

fn default_input() -> String {
    DEFAULT_INPUT.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_place_column() -> String {
    DEFAULT_PLACE_COLUMN.to_string()
}

fn default_country_column() -> String {
    DEFAULT_COUNTRY_COLUMN.to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_contact() -> String {
    DEFAULT_CONTACT.to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input(),
            place_column: default_place_column(),
            country_column: default_country_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            contact: default_contact(),
            timeout_seconds: None,
            concurrent_requests: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONTACT_EMAIL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            EtlError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("lookup.endpoint", &self.lookup.endpoint)?;
        validation::validate_non_empty_string("lookup.contact", &self.lookup.contact)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_non_empty_string("input.place_column", &self.input.place_column)?;
        validation::validate_non_empty_string(
            "input.country_column",
            &self.input.country_column,
        )?;
        validation::validate_delimiter("input.delimiter", self.input.delimiter)?;

        if let Some(concurrent) = self.lookup.concurrent_requests {
            validation::validate_positive_number("lookup.concurrent_requests", concurrent, 1)?;
        }
        if let Some(timeout) = self.lookup.timeout_seconds {
            validation::validate_range("lookup.timeout_seconds", timeout, 1, 3600)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["json", "compact"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Supported formats: json, compact".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.lookup.endpoint
    }

    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn place_column(&self) -> &str {
        &self.input.place_column
    }

    fn country_column(&self) -> &str {
        &self.input.country_column
    }

    fn delimiter(&self) -> u8 {
        self.input.delimiter as u8
    }

    fn user_agent(&self) -> String {
        user_agent(&self.lookup.contact)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.lookup.timeout_seconds
    }

    fn concurrent_requests(&self) -> usize {
        self.lookup.concurrent_requests.unwrap_or(1)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
