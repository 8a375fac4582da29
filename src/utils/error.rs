use thiserror::Error;

/// 讀取試算表失敗，整個執行中止
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read workbook '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Workbook is not a valid ODS archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed content.xml: {0}")]
    Xml(String),

    #[error("CSV sheet could not be read: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported workbook format '{path}' (expected .ods or .csv)")]
    UnsupportedFormat { path: String },

    #[error("Sheet '{sheet}' expands to more than {limit} cells")]
    TooLarge { sheet: String, limit: usize },
}

/// 單一工作表層級的錯誤：跳過該工作表，其餘照常處理
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },
}

/// 儲存格轉型失敗，永遠不會越過 normalizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("empty cell")]
    Empty,

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("'{0}' is negative")]
    Negative(String),

    #[error("'{0}' is above the {1} quota limit")]
    OutOfRange(String, u64),

    #[error("'{0}' is not a dd/mm/yy date")]
    NotADate(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No chart slices to render")]
    NothingToRender,

    #[error("Chart values must add up to a positive total (got {0})")]
    NonPositiveTotal(f64),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chart rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Config parse error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl ReportError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Load(_) => 1,
            ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. } => 1,
            ReportError::Render(_) => 0,
            ReportError::IoError(_)
            | ReportError::CsvError(_)
            | ReportError::SerializationError(_) => 2,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::Load(LoadError::Io { .. }) => {
                "Check that the workbook path exists and is readable"
            }
            ReportError::Load(LoadError::UnsupportedFormat { .. }) => {
                "Save the workbook as .ods or export a sheet as .csv"
            }
            ReportError::Load(LoadError::TooLarge { .. }) => {
                "Clear formatting or values filled down to the end of the sheet"
            }
            ReportError::Load(_) => "Re-save the workbook with LibreOffice and try again",
            ReportError::InvalidConfigValueError { .. }
            | ReportError::ConfigValidationError { .. } => {
                "Fix the reported setting in the command line or TOML file"
            }
            ReportError::Render(_) => "The numeric report is still valid; check the chart path",
            ReportError::IoError(_) | ReportError::CsvError(_) => {
                "Check that the output directory is writable"
            }
            ReportError::SerializationError(_) => "Try the text output format",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_errors_abort_with_code_one() {
        let err = ReportError::from(LoadError::UnsupportedFormat {
            path: "carteira.xlsx".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("carteira.xlsx"));
    }

    #[test]
    fn test_render_errors_are_not_fatal() {
        let err = ReportError::from(RenderError::NothingToRender);
        assert_eq!(err.exit_code(), 0);
    }
}
