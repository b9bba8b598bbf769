use std::{env, fmt::Display, str::FromStr, sync::Arc};

use aws_config::{BehaviorVersion, Region};
use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use lambda_http::{tracing, Error};

use crate::store::{CommerceStore, DynamoStore, MemoryStore};

/// base64 of "commerce-test-secret", only used by `AppState::test`.
const TEST_JWT_SECRET: &str = "Y29tbWVyY2UtdGVzdC1zZWNyZXQ=";

pub struct AppState {
    pub store: Arc<dyn CommerceStore>,
    pub jwt: (EncodingKey, DecodingKey, Header),
    pub token_ttl: TimeDelta,
    pub scrypt_params: scrypt::Params,
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

fn jwt_keys(secret: &str) -> Result<(EncodingKey, DecodingKey, Header), Error> {
    Ok((
        EncodingKey::from_base64_secret(secret)?,
        DecodingKey::from_base64_secret(secret)?,
        Header::new(Algorithm::HS256),
    ))
}

impl AppState {
    pub async fn new() -> Result<Self, Error> {
        let secret = env::var("JWT_SECRET").map_err(|e| format!("JWT_SECRET: {}", e))?;
        let backend: String = env_or("COMMERCE_STORE", "dynamodb".to_string())?;
        let log_n: u8 = env_or("SCRYPT_LOG_N", 15)?;
        let ttl_hours: i64 = env_or("TOKEN_TTL_HOURS", 5)?;

        let store: Arc<dyn CommerceStore> = match backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "dynamodb" => {
                let region: String = env_or("AWS_REGION", "us-east-1".to_string())?;
                let mut loader =
                    aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
                if let Ok(endpoint) = env::var("DYNAMODB_ENDPOINT") {
                    loader = loader.endpoint_url(endpoint);
                }
                Arc::new(DynamoStore::new(&loader.load().await))
            }
            other => return Err(format!("Unknown COMMERCE_STORE backend: {}", other).into()),
        };
        tracing::info!("Using {} store", store.backend_tag());

        Ok(Self {
            store,
            jwt: jwt_keys(&secret)?,
            token_ttl: TimeDelta::hours(ttl_hours),
            scrypt_params: scrypt::Params::new(log_n, 8, 1, scrypt::Params::RECOMMENDED_LEN)?,
        })
    }

    /// In-memory state with cheap password hashing.
    pub async fn test() -> Result<Self, Error> {
        Ok(Self {
            store: Arc::new(MemoryStore::new()),
            jwt: jwt_keys(TEST_JWT_SECRET)?,
            token_ttl: TimeDelta::hours(1),
            scrypt_params: scrypt::Params::new(4, 8, 1, scrypt::Params::RECOMMENDED_LEN)?,
        })
    }
}
