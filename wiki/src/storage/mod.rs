use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError as S3SdkError,
    operation::{
        get_object::GetObjectError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
    primitives::ByteStreamError,
};

use crate::constants::ENTRY_SUFFIX;

pub mod fs;
pub mod s3;

pub use fs::FsEntryStore;
pub use s3::S3EntryStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Entry already exists: {0}")]
    Conflict(String),
    #[error("Filesystem error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Entry is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("S3 Error: GetObject: {0}")]
    S3GetError(#[from] S3SdkError<GetObjectError>),
    #[error("S3 Error: PutObject: {0}")]
    S3PutError(#[from] S3SdkError<PutObjectError>),
    #[error("S3 Error: ListObjectsV2: {0}")]
    S3ListError(#[from] S3SdkError<ListObjectsV2Error>),
    #[error("S3 Error: reading object body: {0}")]
    S3BodyError(#[from] ByteStreamError),
}

impl StorageError {
    /// HTTP status returned by S3, when there was one.
    pub fn inner_status(&self) -> Option<u16> {
        match self {
            StorageError::S3GetError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StorageError::S3PutError(e) => e.raw_response().map(|r| r.status().as_u16()),
            StorageError::S3ListError(e) => e.raw_response().map(|r| r.status().as_u16()),
            _ => None,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Wiki pages keyed by title, one `<title>.md` object each.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Short name of the backend, shown by the health check.
    fn backend_tag(&self) -> &'static str;

    /// All titles, sorted.
    async fn list_entries(&self) -> StorageResult<Vec<String>>;

    async fn get_entry(&self, title: &str) -> StorageResult<Option<String>>;

    /// Stores a new entry. Fails with `Conflict` when the title is taken and
    /// never touches the existing content.
    async fn create_entry(&self, title: &str, content: &str) -> StorageResult<()>;
}

/// `Foo.md` -> `Foo`, ignoring anything that is not an entry.
fn title_from_name(name: &str) -> Option<&str> {
    name.strip_suffix(ENTRY_SUFFIX)
        .filter(|title| !title.is_empty() && !title.starts_with('.'))
}

fn entry_name(title: &str) -> String {
    format!("{}{}", title, ENTRY_SUFFIX)
}
