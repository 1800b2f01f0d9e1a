pub use crate::app::pipelines::lookup_pipeline::{resolve_place, LookupPipeline};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sparql::{build_query, SparqlClient};
    use crate::config::toml_config::TomlConfig;
    use crate::core::{InputRecord, OutputRecord, Pipeline, Storage};
    use crate::domain::model::QueryMode;
    use crate::utils::error::{EtlError, Result};
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| EtlError::InputError {
                    path: path.to_string(),
                    message: "File not found".to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn test_config(endpoint: &str, concurrent_requests: usize) -> TomlConfig {
        let toml_content = format!(
            r#"
[input]
path = "ports.csv"

[output]
path = "enriched.csv"

[lookup]
endpoint = "{}"
contact = "tests@example.org"
concurrent_requests = {}
"#,
            endpoint, concurrent_requests
        );
        TomlConfig::from_toml_str(&toml_content).unwrap()
    }

    fn test_pipeline(
        storage: MockStorage,
        endpoint: &str,
        concurrent_requests: usize,
    ) -> LookupPipeline<MockStorage, TomlConfig, SparqlClient> {
        LookupPipeline::new(storage, test_config(endpoint, concurrent_requests)).unwrap()
    }

    fn sparql_body(ids: &[&str]) -> serde_json::Value {
        let bindings: Vec<_> = ids
            .iter()
            .map(|id| {
                let uri = format!("http://www.wikidata.org/entity/{}", id);
                serde_json::json!({"item": {"type": "uri", "value": uri}})
            })
            .collect();
        serde_json::json!({"head": {"vars": ["item"]}, "results": {"bindings": bindings}})
    }

    fn mock_query<'a>(
        server: &'a MockServer,
        place: &str,
        country: &str,
        mode: QueryMode,
        ids: &[&str],
    ) -> httpmock::Mock<'a> {
        let query = build_query(place, country, mode);
        let body = sparql_body(ids);
        server.mock(|when, then| {
            when.method(GET)
                .path("/sparql")
                .query_param("query", query.as_str());
            then.status(200)
                .header("Content-Type", "application/sparql-results+json")
                .json_body(body);
        })
    }

    fn mock_server_error<'a>(
        server: &'a MockServer,
        place: &str,
        country: &str,
        mode: QueryMode,
    ) -> httpmock::Mock<'a> {
        let query = build_query(place, country, mode);
        server.mock(|when, then| {
            when.method(GET)
                .path("/sparql")
                .query_param("query", query.as_str());
            then.status(500).body("Internal Server Error");
        })
    }

    #[tokio::test]
    async fn test_pipeline_strict_and_not_found_rows() {
        let server = MockServer::start();
        let london = ("London", "United Kingdom");
        let springfield = ("Springfield", "USA");
        let london_strict = mock_query(&server, london.0, london.1, QueryMode::Strict, &["Q84"]);
        let london_relaxed = mock_query(&server, london.0, london.1, QueryMode::Relaxed, &["Q1"]);
        let springfield_strict =
            mock_query(&server, springfield.0, springfield.1, QueryMode::Strict, &[]);
        let springfield_relaxed =
            mock_query(&server, springfield.0, springfield.1, QueryMode::Relaxed, &[]);

        let storage = MockStorage::with_file(
            "ports.csv",
            b"Cleaned Port,Country\nLondon,United Kingdom\n Springfield , USA \n",
        );
        let pipeline = test_pipeline(storage.clone(), &server.url("/sparql"), 1);

        let places = pipeline.extract().await.unwrap();
        let result = pipeline.transform(places).await.unwrap();

        london_strict.assert();
        london_relaxed.assert_hits(0);
        springfield_strict.assert();
        springfield_relaxed.assert();

        assert_eq!(
            result.records,
            vec![
                OutputRecord {
                    place: "London".to_string(),
                    country: "United Kingdom".to_string(),
                    identifier: "Q84".to_string(),
                },
                OutputRecord {
                    place: "Springfield".to_string(),
                    country: "USA".to_string(),
                    identifier: String::new(),
                },
            ]
        );
        assert_eq!(result.summary.strict_matches, 1);
        assert_eq!(result.summary.not_found, 1);

        let output_path = pipeline.load(result).await.unwrap();
        assert_eq!(output_path, "enriched.csv");

        let written = storage.get_file("enriched.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "City,Country,WikidataID\nLondon,United Kingdom,Q84\nSpringfield,USA,\n"
        );
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_isolated_to_one_row() {
        let server = MockServer::start();
        mock_query(&server, "Oslo", "Norway", QueryMode::Strict, &["Q585"]);
        mock_query(&server, "Lima", "Peru", QueryMode::Strict, &["Q2868"]);
        let broken = mock_server_error(&server, "Bergen", "Norway", QueryMode::Strict);

        let storage = MockStorage::with_file(
            "ports.csv",
            b"Cleaned Port,Country\nOslo,Norway\nBergen,Norway\nLima,Peru\n",
        );
        let pipeline = test_pipeline(storage, &server.url("/sparql"), 1);

        let places = pipeline.extract().await.unwrap();
        let result = pipeline.transform(places).await.unwrap();

        broken.assert();
        let ids: Vec<&str> = result
            .records
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["Q585", "", "Q2868"]);
        assert_eq!(result.summary.failed, 1);
        assert_eq!(result.summary.strict_matches, 2);
    }

    #[tokio::test]
    async fn test_pipeline_concurrent_requests_keep_input_order() {
        let server = MockServer::start();
        let places = [
            ("Tokyo", "Japan", "Q1490"),
            ("Osaka", "Japan", "Q35765"),
            ("Kyoto", "Japan", "Q34600"),
            ("Nagoya", "Japan", "Q11751"),
            ("Sapporo", "Japan", "Q37951"),
        ];

        let mut csv = String::from("Cleaned Port,Country\n");
        for (place, country, id) in &places {
            mock_query(&server, place, country, QueryMode::Strict, &[*id]);
            csv.push_str(&format!("{},{}\n", place, country));
        }

        let storage = MockStorage::with_file("ports.csv", csv.as_bytes());
        let pipeline = test_pipeline(storage, &server.url("/sparql"), 3);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.records.len(), places.len());
        for (record, (place, _, id)) in result.records.iter().zip(places.iter()) {
            assert_eq!(record.place, *place);
            assert_eq!(record.identifier, *id);
        }
    }

    #[tokio::test]
    async fn test_pipeline_concurrent_failure_and_fallback_stay_isolated() {
        let server = MockServer::start();
        mock_query(&server, "Tokyo", "Japan", QueryMode::Strict, &["Q1490"]);
        let osaka_strict = mock_server_error(&server, "Osaka", "Japan", QueryMode::Strict);
        let osaka_relaxed =
            mock_query(&server, "Osaka", "Japan", QueryMode::Relaxed, &["Q35765"]);
        mock_query(&server, "Kyoto", "Japan", QueryMode::Strict, &[]);
        let kyoto_relaxed =
            mock_query(&server, "Kyoto", "Japan", QueryMode::Relaxed, &["Q34600"]);
        mock_query(&server, "Nagoya", "Japan", QueryMode::Strict, &["Q11751"]);
        mock_query(&server, "Sapporo", "Japan", QueryMode::Strict, &[]);
        mock_query(&server, "Sapporo", "Japan", QueryMode::Relaxed, &[]);

        let storage = MockStorage::with_file(
            "ports.csv",
            b"Cleaned Port,Country\nTokyo,Japan\nOsaka,Japan\nKyoto,Japan\n\
              Nagoya,Japan\nSapporo,Japan\n",
        );
        let pipeline = test_pipeline(storage.clone(), &server.url("/sparql"), 3);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();

        osaka_strict.assert();
        // strict 失敗時不做 fallback
        osaka_relaxed.assert_hits(0);
        kyoto_relaxed.assert();

        let places: Vec<&str> = result.records.iter().map(|r| r.place.as_str()).collect();
        assert_eq!(places, vec!["Tokyo", "Osaka", "Kyoto", "Nagoya", "Sapporo"]);
        let ids: Vec<&str> = result
            .records
            .iter()
            .map(|r| r.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["Q1490", "", "Q34600", "Q11751", ""]);

        assert_eq!(result.summary.strict_matches, 2);
        assert_eq!(result.summary.relaxed_matches, 1);
        assert_eq!(result.summary.not_found, 1);
        assert_eq!(result.summary.failed, 1);

        pipeline.load(result).await.unwrap();
        let written = storage.get_file("enriched.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "City,Country,WikidataID\nTokyo,Japan,Q1490\nOsaka,Japan,\nKyoto,Japan,Q34600\n\
             Nagoya,Japan,Q11751\nSapporo,Japan,\n"
        );
    }

    #[tokio::test]
    async fn test_pipeline_extract_requires_columns() {
        let storage = MockStorage::with_file("ports.csv", b"City,Country\nParis,France\n");
        let pipeline = test_pipeline(storage, "http://localhost:9/sparql", 1);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::MissingColumnError { .. }));
    }

    #[tokio::test]
    async fn test_pipeline_empty_input_writes_header_only() {
        let storage = MockStorage::with_file("ports.csv", b"Cleaned Port,Country\n");
        let pipeline = test_pipeline(storage.clone(), "http://localhost:9/sparql", 1);

        let places: Vec<InputRecord> = pipeline.extract().await.unwrap();
        assert!(places.is_empty());

        let result = pipeline.transform(places).await.unwrap();
        pipeline.load(result).await.unwrap();

        let written = storage.get_file("enriched.csv").await.unwrap();
        assert_eq!(written, b"City,Country,WikidataID\n");
    }
}
