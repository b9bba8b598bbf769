use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use lambda_http::tracing;
use tokio::{fs, io::AsyncWriteExt};

use super::{entry_name, title_from_name, EntryStore, StorageError, StorageResult};

/// Entries as `<title>.md` files in one directory.
pub struct FsEntryStore {
    root: PathBuf,
}

impl FsEntryStore {
    pub async fn new<P: AsRef<Path>>(root: P) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        tracing::info!("Serving entries from {}", root.display());

        Ok(Self { root })
    }

    fn entry_path(&self, title: &str) -> PathBuf {
        self.root.join(entry_name(title))
    }
}

#[async_trait]
impl EntryStore for FsEntryStore {
    fn backend_tag(&self) -> &'static str {
        "fs"
    }

    async fn list_entries(&self) -> StorageResult<Vec<String>> {
        let mut dir = fs::read_dir(&self.root).await?;
        let mut titles = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(title) = name.to_str().and_then(title_from_name) {
                titles.push(title.to_string());
            }
        }
        titles.sort();

        Ok(titles)
    }

    async fn get_entry(&self, title: &str) -> StorageResult<Option<String>> {
        match fs::read(self.entry_path(title)).await {
            Ok(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_entry(&self, title: &str, content: &str) -> StorageResult<()> {
        let opened = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.entry_path(title))
            .await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::Conflict(title.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
