pub mod cli;
pub mod toml_config;

use crate::adapters::sparql::{user_agent, DEFAULT_ENDPOINT};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT: &str = "ports.csv";
pub const DEFAULT_OUTPUT: &str = "output_wikidata_ids.csv";
pub const DEFAULT_PLACE_COLUMN: &str = "Cleaned Port";
pub const DEFAULT_COUNTRY_COLUMN: &str = "Country";
pub const DEFAULT_CONTACT: &str = "maintainer@example.org";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "wikidata-enrich")]
#[command(about = "Add Wikidata identifiers to a table of places and countries")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: String,

    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = DEFAULT_PLACE_COLUMN)]
    pub place_column: String,

    #[arg(long, default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_column: String,

    #[arg(long, default_value = ",")]
    pub delimiter: char,

    #[arg(long, default_value = DEFAULT_CONTACT, help = "Operator contact sent in the User-Agent")]
    pub contact: String,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value = "1")]
    pub concurrent_requests: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn place_column(&self) -> &str {
        &self.place_column
    }

    fn country_column(&self) -> &str {
        &self.country_column
    }

    fn delimiter(&self) -> u8 {
        // validate() 已確認是 ASCII
        self.delimiter as u8
    }

    fn user_agent(&self) -> String {
        user_agent(&self.contact)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output", &self.output)?;
        validation::validate_non_empty_string("place_column", &self.place_column)?;
        validation::validate_non_empty_string("country_column", &self.country_column)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_non_empty_string("contact", &self.contact)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}
