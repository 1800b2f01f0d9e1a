use thiserror::Error;

/// 單次查詢的錯誤，只在 pipeline 內部處理，不會往外傳遞
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 會中止整個執行的錯誤；單列查詢失敗用 [`LookupError`] 表示，不在此列
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Cannot read input '{path}': {message}")]
    InputError { path: String, message: String },

    #[error("Input is missing required column '{column}'")]
    MissingColumnError { column: String },

    #[error("Cannot write output '{path}': {message}")]
    OutputError { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InputError { .. } | EtlError::MissingColumnError { .. } => {
                ErrorCategory::Input
            }
            EtlError::OutputError { .. } => ErrorCategory::Output,
            EtlError::IoError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::InputError { path, .. } => {
                format!("Check that '{}' exists and is readable", path)
            }
            EtlError::MissingColumnError { column } => format!(
                "Add a '{}' column to the input header or pass the correct column name",
                column
            ),
            EtlError::OutputError { path, .. } => {
                format!("Check write permissions for '{}'", path)
            }
            EtlError::IoError(_) => {
                "Check the configuration file path and permissions".to_string()
            }
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Output => format!("Output problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    /// 行程結束碼；能走到這裡的錯誤都會中止執行
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
