//! SPARQL client for the Wikidata query service.
//!
//! Two query variants are built from the same template: the strict one
//! requires the entity to be an instance of city (`wd:Q515`) or of any
//! transitive subclass, the relaxed one drops that constraint.

use crate::domain::model::{LookupResult, QueryMode};
use crate::domain::ports::{ConfigProvider, EntityLookup};
use crate::utils::error::{EtlError, LookupError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const CLIENT_TAG: &str = concat!("wikidata-enrich/", env!("CARGO_PKG_VERSION"));
pub const CITY_CLASS: &str = "wd:Q515";

const SPARQL_JSON: &str = "application/sparql-results+json";
// 錯誤訊息中保留的回應內容長度
const MAX_ERROR_BODY: usize = 200;

/// Wikimedia 要求 User-Agent 帶有可聯絡的資訊
pub fn user_agent(contact: &str) -> String {
    format!("{} ({})", CLIENT_TAG, contact)
}

#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
pub struct Binding {
    pub item: Term,
}

#[derive(Debug, Deserialize)]
pub struct Term {
    pub value: String,
}

/// 跳脫字串常值中的反斜線與雙引號
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn build_query(place: &str, country: &str, mode: QueryMode) -> String {
    let place = escape_literal(place.trim());
    let country = escape_literal(country.trim());

    let type_constraint = match mode {
        QueryMode::Strict => format!("\n      ?item wdt:P31/wdt:P279* {}.", CITY_CLASS),
        QueryMode::Relaxed => String::new(),
    };

    format!(
        r#"
    SELECT DISTINCT ?item WHERE {{
      ?item ?label "{place}"@en.
      ?item wdt:P17 ?country.
      ?country ?label "{country}"@en.{type_constraint}
      SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
    }}
    "#
    )
}

/// 取出 URI 最後一段，例如 `http://www.wikidata.org/entity/Q84` -> `Q84`
pub fn identifier_from_uri(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or("")
}

/// 多筆結果時取第一筆
pub fn extract_identifier(response: &SparqlResponse) -> LookupResult {
    response
        .results
        .bindings
        .first()
        .map(|binding| LookupResult::found(identifier_from_uri(&binding.item.value)))
        .unwrap_or_default()
}

pub fn parse_response(body: &str) -> std::result::Result<LookupResult, LookupError> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    Ok(extract_identifier(&response))
}

#[derive(Debug, Clone)]
pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| EtlError::ConfigValidationError {
                field: "lookup".to_string(),
                message: format!("Cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.endpoint(),
            &config.user_agent(),
            config.timeout_seconds(),
        )
    }
}

#[async_trait]
impl EntityLookup for SparqlClient {
    async fn lookup(
        &self,
        place: &str,
        country: &str,
        mode: QueryMode,
    ) -> std::result::Result<LookupResult, LookupError> {
        let query = build_query(place, country, mode);
        tracing::debug!("🔎 {} query for {}, {}", mode, place, country);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .header(ACCEPT, SPARQL_JSON)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("SPARQL response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_response(&body)
    }
}
