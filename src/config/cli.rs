use crate::core::Storage;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> std::io::Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::read(full_path)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> std::io::Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)
    }
}
