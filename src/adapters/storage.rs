use crate::domain::model::OutputTarget;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SyncError};
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SyncError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SyncError::FileReadError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    async fn write_file(&self, target: &OutputTarget, data: &[u8]) -> Result<()> {
        let write_error = |source: std::io::Error| SyncError::FileWriteError {
            destination: target.to_string(),
            source,
        };

        match target {
            OutputTarget::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(data).await.map_err(write_error)?;
                stdout.flush().await.map_err(write_error)?;
            }
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
                }
                tokio::fs::write(path, data).await.map_err(write_error)?;
            }
        }

        Ok(())
    }
}
