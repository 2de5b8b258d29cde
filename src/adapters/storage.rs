use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

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
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 每次覆寫同一個快取檔
        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        tokio_test::assert_ok!(storage.write_file("cache/today.pdf", b"first").await);
        tokio_test::assert_ok!(storage.write_file("cache/today.pdf", b"second").await);

        let data = tokio::fs::read(dir.path().join("cache/today.pdf")).await.unwrap();
        assert_eq!(data, b"second");
    }

    #[tokio::test]
    async fn test_write_into_file_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("blocker"), b"x").unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.write_file("blocker/today.pdf", b"pdf").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::BotError::IoError(_)));
    }
}
