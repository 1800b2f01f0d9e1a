use serde::{Deserialize, Serialize};

/// 輸入表格中的一列 (欄位已去除前後空白)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub place: String,
    pub country: String,
}

impl InputRecord {
    pub fn new(place: &str, country: &str) -> Self {
        Self {
            place: place.trim().to_string(),
            country: country.trim().to_string(),
        }
    }
}

/// 單次查詢的結果，空字串代表沒有找到
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub identifier: String,
}

impl LookupResult {
    pub fn found(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        !self.identifier.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// 必須是 city 或其子類別
    Strict,
    /// 只比對名稱與國家
    Relaxed,
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::Strict => write!(f, "strict"),
            QueryMode::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// 每一列的解析結果，區分「沒找到」與「查詢失敗」
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Strict(String),
    Relaxed(String),
    NotFound,
    Failed(String),
}

impl Resolution {
    pub fn identifier(&self) -> &str {
        match self {
            Resolution::Strict(id) | Resolution::Relaxed(id) => id,
            Resolution::NotFound | Resolution::Failed(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub place: String,
    pub country: String,
    pub identifier: String,
}

impl OutputRecord {
    pub fn from_resolution(input: InputRecord, resolution: &Resolution) -> Self {
        Self {
            place: input.place,
            country: input.country,
            identifier: resolution.identifier().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupSummary {
    pub strict_matches: usize,
    pub relaxed_matches: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl LookupSummary {
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Strict(_) => self.strict_matches += 1,
            Resolution::Relaxed(_) => self.relaxed_matches += 1,
            Resolution::NotFound => self.not_found += 1,
            Resolution::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.strict_matches + self.relaxed_matches + self.not_found + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<OutputRecord>,
    pub summary: LookupSummary,
}
