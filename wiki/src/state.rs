use std::{env, fmt::Display, str::FromStr, sync::Arc};

use aws_config::{BehaviorVersion, Region};
use lambda_http::{tracing, Error};

use crate::{
    constants::{DEFAULT_ENTRIES_DIR, DEFAULT_S3_PREFIX},
    storage::{EntryStore, FsEntryStore, S3EntryStore},
};

pub struct AppState {
    pub entries: Arc<dyn EntryStore>,
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, Error>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::from(format!("Invalid {} value: {}", key, e))),
        Err(_) => Ok(default),
    }
}

impl AppState {
    pub async fn new() -> Result<Self, Error> {
        let backend: String = env_or("WIKI_STORAGE", "fs".to_string())?;

        let entries: Arc<dyn EntryStore> = match backend.as_str() {
            "fs" => {
                let dir: String = env_or("WIKI_ENTRIES_DIR", DEFAULT_ENTRIES_DIR.to_string())?;
                Arc::new(FsEntryStore::new(dir).await?)
            }
            "s3" => {
                let bucket = env::var("WIKI_BUCKET").map_err(|e| format!("WIKI_BUCKET: {}", e))?;
                let prefix: String = env_or("WIKI_PREFIX", DEFAULT_S3_PREFIX.to_string())?;
                let region: String = env_or("AWS_REGION", "us-east-1".to_string())?;
                let config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .load()
                    .await;
                Arc::new(S3EntryStore::new(&config, bucket, prefix))
            }
            other => return Err(format!("Unknown WIKI_STORAGE backend: {}", other).into()),
        };
        tracing::info!("Using {} entry storage", entries.backend_tag());

        Ok(Self { entries })
    }

    /// Fresh, empty entry directory, removed when the guard drops.
    #[cfg(test)]
    pub async fn test() -> Result<(Self, tempfile::TempDir), Error> {
        let dir = tempfile::Builder::new().prefix("wiki-test-").tempdir()?;
        let entries = Arc::new(FsEntryStore::new(dir.path()).await?);

        Ok((Self { entries }, dir))
    }
}
