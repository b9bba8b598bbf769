use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{primitives::ByteStream, Client};
use lambda_http::tracing;

use crate::constants::ENTRY_CONTENT_TYPE;

use super::{entry_name, title_from_name, EntryStore, StorageError, StorageResult};

/// Entries as `<prefix><title>.md` objects in one bucket.
pub struct S3EntryStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3EntryStore {
    pub fn new(config: &SdkConfig, bucket: String, prefix: String) -> Self {
        Self {
            client: Client::new(config),
            bucket,
            prefix,
        }
    }

    fn key(&self, title: &str) -> String {
        format!("{}{}", self.prefix, entry_name(title))
    }

    /// Titles directly under the prefix; nested keys are not entries.
    fn title_from_key<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
            .filter(|name| !name.contains('/'))
            .and_then(title_from_name)
    }
}

#[async_trait]
impl EntryStore for S3EntryStore {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn list_entries(&self) -> StorageResult<Vec<String>> {
        let mut titles = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(token.take())
                .send()
                .await?;

            titles.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .filter_map(|key| self.title_from_key(key))
                    .map(str::to_string),
            );

            match resp.next_continuation_token() {
                Some(next) if resp.is_truncated().unwrap_or(false) => {
                    token = Some(next.to_string())
                }
                _ => break,
            }
        }
        titles.sort();

        Ok(titles)
    }

    async fn get_entry(&self, title: &str) -> StorageResult<Option<String>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(title))
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = resp.body.collect().await?.into_bytes();

        Ok(Some(String::from_utf8(bytes.to_vec())?))
    }

    async fn create_entry(&self, title: &str, content: &str) -> StorageResult<()> {
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key(title))
            .if_none_match("*")
            .content_type(ENTRY_CONTENT_TYPE)
            .body(ByteStream::from(content.as_bytes().to_vec()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            // 412 from a conditional write: the key exists.
            Err(e) if e.raw_response().is_some_and(|r| r.status().as_u16() == 412) => {
                tracing::warn!("Entry {} already exists in bucket {}", title, self.bucket);
                Err(StorageError::Conflict(title.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
