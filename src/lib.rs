pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::SparqlClient;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::LookupPipeline,
};
pub use domain::model::{InputRecord, LookupResult, OutputRecord, QueryMode, Resolution};
pub use utils::error::{EtlError, LookupError, Result};
