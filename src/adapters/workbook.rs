use crate::adapters::{csv_sheet, ods};
use crate::domain::model::RawSheet;
use crate::domain::ports::{SheetSource, Storage};
use crate::utils::error::LoadError;
use std::path::Path;

/// Reads a workbook through [`Storage`], choosing the decoder by extension.
pub struct WorkbookReader<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> WorkbookReader<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

impl<S: Storage> SheetSource for WorkbookReader<S> {
    fn load_sheets(&self) -> Result<Vec<RawSheet>, LoadError> {
        let path = Path::new(&self.path);
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let unsupported = || LoadError::UnsupportedFormat {
            path: self.path.clone(),
        };
        if !matches!(extension.as_deref(), Some("ods") | Some("csv")) {
            return Err(unsupported());
        }

        tracing::debug!("Reading workbook {}", self.path);
        let bytes = self
            .storage
            .read_file(&self.path)
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;

        match extension.as_deref() {
            Some("ods") => ods::read_ods(&bytes),
            Some("csv") => {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("Sheet1");
                Ok(vec![csv_sheet::read_csv(name, &bytes)?])
            }
            _ => Err(unsupported()),
        }
    }
}
