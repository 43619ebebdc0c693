use super::{sort_newest_first, CreationStore};
use crate::models::{Creation, StoreConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, Client as S3Client};
use base64::Engine as _;
use chrono::Utc;
use uuid::Uuid;

const ROOT_PREFIX: &str = "creations";

/// Creations stored as one JSON object each in an S3-compatible bucket,
/// keyed `creations/{owner}/{id}.json` with the owner base64url-encoded.
pub struct ObjectCreationStore {
    client: S3Client,
    bucket: String,
}

impl ObjectCreationStore {
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "inkboard-store",
        );

        // S3-compatible providers accept any region when an endpoint is set.
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new("us-east-1"))
            .endpoint_url(config.endpoint.clone())
            .load()
            .await;

        // Path-style addressing keeps the bucket out of the hostname.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: S3Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }

    async fn put(&self, creation: &Creation) -> Result<()> {
        let body = serde_json::to_vec(creation)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(creation_key(&creation.owner, creation.id))
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| {
                Error::Persistence(format!(
                    "Failed to write creation {}: {}",
                    creation.id,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Creation>> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Ok(None);
                }
                return Err(Error::Persistence(format!(
                    "Failed to read {}: {}",
                    key,
                    DisplayErrorContext(&service_error)
                )));
            }
        };

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Persistence(format!("Failed to read body of {}: {}", key, e)))?;

        serde_json::from_slice(&bytes.to_vec())
            .map(Some)
            .map_err(|e| Error::Persistence(format!("Corrupt creation record {}: {}", key, e)))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = continuation.take() {
                request = request.continuation_token(token);
            }

            let output = request.send().await.map_err(|e| {
                Error::Persistence(format!(
                    "Failed to list {}: {}",
                    prefix,
                    DisplayErrorContext(&e)
                ))
            })?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| key.ends_with(".json"))
                    .map(str::to_string),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated() == Some(true) => {
                    continuation = Some(token.to_string())
                }
                _ => break,
            }
        }

        Ok(keys)
    }
}

fn owner_prefix(owner: &str) -> String {
    format!(
        "{}/{}/",
        ROOT_PREFIX,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(owner)
    )
}

fn creation_key(owner: &str, id: Uuid) -> String {
    format!("{}{}.json", owner_prefix(owner), id)
}

#[async_trait]
impl CreationStore for ObjectCreationStore {
    async fn insert(&self, creation: &Creation) -> Result<()> {
        self.put(creation).await
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: &str) -> Result<Option<Creation>> {
        Ok(self
            .read(&creation_key(owner, id))
            .await?
            .filter(|creation| creation.owner == owner))
    }

    // Read-modify-write of a single object; the last concurrent writer wins.
    async fn update_journal(&self, id: Uuid, owner: &str, text: &str) -> Result<bool> {
        let Some(mut creation) = self.find_by_id_and_owner(id, owner).await? else {
            return Ok(false);
        };

        creation.journal_entry = Some(text.to_string());
        creation.updated_at = Utc::now();
        self.put(&creation).await?;
        Ok(true)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Creation>> {
        let mut creations = Vec::new();
        for key in self.list_keys(&owner_prefix(owner)).await? {
            match self.read(&key).await? {
                Some(creation) if creation.owner == owner => creations.push(creation),
                Some(_) => tracing::warn!("Skipping {}: owner does not match its prefix", key),
                None => tracing::debug!("{} disappeared while listing", key),
            }
        }

        sort_newest_first(&mut creations);
        Ok(creations)
    }
}
