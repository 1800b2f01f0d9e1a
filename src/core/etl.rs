use crate::core::Pipeline;
use crate::domain::model::LookupSummary;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub summary: LookupSummary,
    pub elapsed: Duration,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 讀取或寫出失敗會中止；單列查詢失敗只會反映在 summary
    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        tracing::info!("🚀 Starting enrichment run");

        let places = self.pipeline.extract().await?;

        let result = self.pipeline.transform(places).await?;
        let summary = result.summary.clone();

        let output_path = self.pipeline.load(result).await?;

        let elapsed = start.elapsed();
        tracing::info!("⏱️ Run finished in {:?}", elapsed);

        Ok(RunReport {
            output_path,
            summary,
            elapsed,
        })
    }
}
