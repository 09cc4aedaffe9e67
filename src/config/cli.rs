use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_list_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.write_file("a.json", b"{}").await.unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let names = storage.list_files().await.unwrap();
        assert_eq!(names, vec!["a.json".to_string()]);
        assert_eq!(storage.read_file("a.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_write_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("out");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write_file("intervals.csv", b"time\n").await.unwrap();
        assert!(base.join("intervals.csv").exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let storage = LocalStorage::new("/nonexistent/activities".to_string());
        assert!(storage.list_files().await.is_err());
    }
}
