use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::PathBuf;

/// 本機檔案存取，相對路徑以 `base_path` 為基準
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tokio::fs::read(&full_path)
            .await
            .map_err(|e| EtlError::InputError {
                path: full_path.display().to_string(),
                message: e.to_string(),
            })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let output_error = |e: std::io::Error| EtlError::OutputError {
            path: full_path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(output_error)?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(output_error)?;
        Ok(())
    }
}
