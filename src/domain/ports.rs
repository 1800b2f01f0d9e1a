use crate::domain::model::{InputRecord, LookupResult, QueryMode, TransformResult};
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn place_column(&self) -> &str;
    fn country_column(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn user_agent(&self) -> String;
    fn timeout_seconds(&self) -> Option<u64>;
    fn concurrent_requests(&self) -> usize;
}

/// 知識庫查詢介面，一次呼叫對應一次遠端請求
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn lookup(
        &self,
        place: &str,
        country: &str,
        mode: QueryMode,
    ) -> std::result::Result<LookupResult, LookupError>;

    async fn query_strict(
        &self,
        place: &str,
        country: &str,
    ) -> std::result::Result<LookupResult, LookupError> {
        self.lookup(place, country, QueryMode::Strict).await
    }

    async fn query_relaxed(
        &self,
        place: &str,
        country: &str,
    ) -> std::result::Result<LookupResult, LookupError> {
        self.lookup(place, country, QueryMode::Relaxed).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InputRecord>>;
    async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
