use crate::adapters::sparql::SparqlClient;
use crate::adapters::table::{read_places, write_enriched};
use crate::core::{
    ConfigProvider, EntityLookup, InputRecord, OutputRecord, Pipeline, Storage, TransformResult,
};
use crate::domain::model::{LookupSummary, Resolution};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};

/// 先用 strict 查詢，沒有結果才改用 relaxed 查詢。
///
/// 查詢失敗 (網路、HTTP 狀態、回應格式) 只影響這一列，不會再做 fallback。
pub async fn resolve_place<L: EntityLookup + ?Sized>(
    lookup: &L,
    record: &InputRecord,
) -> Resolution {
    let strict = match lookup.query_strict(&record.place, &record.country).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                "⚠️ Error processing {}, {}: {}",
                record.place,
                record.country,
                e
            );
            return Resolution::Failed(e.to_string());
        }
    };

    if strict.is_match() {
        return Resolution::Strict(strict.identifier);
    }

    tracing::debug!(
        "No strict match for {}, {}; trying relaxed query",
        record.place,
        record.country
    );

    match lookup.query_relaxed(&record.place, &record.country).await {
        Ok(relaxed) if relaxed.is_match() => Resolution::Relaxed(relaxed.identifier),
        Ok(_) => Resolution::NotFound,
        Err(e) => {
            tracing::warn!(
                "⚠️ Error processing {}, {}: {}",
                record.place,
                record.country,
                e
            );
            Resolution::Failed(e.to_string())
        }
    }
}

/// 讀取地點表格、查詢 Wikidata ID、寫出結果
pub struct LookupPipeline<S: Storage, C: ConfigProvider, L: EntityLookup = SparqlClient> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) lookup: L,
}

impl<S: Storage, C: ConfigProvider> LookupPipeline<S, C, SparqlClient> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let lookup = SparqlClient::from_config(&config)?;
        Ok(Self::with_lookup(storage, config, lookup))
    }
}

impl<S: Storage, C: ConfigProvider, L: EntityLookup> LookupPipeline<S, C, L> {
    pub fn with_lookup(storage: S, config: C, lookup: L) -> Self {
        Self {
            storage,
            config,
            lookup,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: EntityLookup> Pipeline for LookupPipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<InputRecord>> {
        let path = self.config.input_path();
        tracing::info!("📥 Reading places from: {}", path);

        let data = self.storage.read_file(path).await?;
        let records = read_places(
            &data,
            path,
            self.config.place_column(),
            self.config.country_column(),
            self.config.delimiter(),
        )?;

        tracing::info!("📊 Extracted {} records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult> {
        let total = data.len();
        // 1 代表逐列執行；buffered 會保持輸入順序
        let concurrency = self.config.concurrent_requests().max(1);
        tracing::info!(
            "🔧 Resolving {} places against {} (concurrency {})",
            total,
            self.config.endpoint(),
            concurrency
        );

        let lookup = &self.lookup;
        let rows = stream::iter(data.into_iter().enumerate());
        let resolved: Vec<(OutputRecord, Resolution)> = rows
            .map(move |(index, record)| async move {
                let resolution = resolve_place(lookup, &record).await;
                tracing::debug!(
                    "[{}/{}] {}, {} -> {:?}",
                    index + 1,
                    total,
                    record.place,
                    record.country,
                    resolution
                );
                (OutputRecord::from_resolution(record, &resolution), resolution)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut summary = LookupSummary::default();
        let records: Vec<OutputRecord> = resolved
            .into_iter()
            .map(|(record, resolution)| {
                summary.record(&resolution);
                record
            })
            .collect();

        tracing::info!(
            "✅ Resolved {} records: {} strict, {} relaxed, {} not found, {} failed",
            summary.total(),
            summary.strict_matches,
            summary.relaxed_matches,
            summary.not_found,
            summary.failed
        );

        Ok(TransformResult { records, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let path = self.config.output_path();
        let data = write_enriched(&result.records, path, self.config.delimiter())?;

        tracing::debug!("Writing {} bytes to storage", data.len());
        self.storage.write_file(path, &data).await?;

        tracing::info!("💾 Results saved to {}", path);
        Ok(path.to_string())
    }
}
