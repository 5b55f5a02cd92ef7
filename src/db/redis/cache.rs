use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached external API responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// TMDB title search results, keyed by the (lowercased) query.
    MovieSearch(String),
    /// TMDB movie details, keyed by TMDB id.
    MovieDetails(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieSearch(query) => write!(f, "tmdb:search:{}", query.to_lowercase()),
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache over Redis.
///
/// Reads are synchronous with the caller; writes are handed to a background
/// task over a channel so a slow Redis write never delays an API response.
/// The writer task drains the channel and exits when the last `Cache` clone
/// is dropped.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

impl Cache {
    pub fn new(redis_client: Client) -> Self {
        let (write_tx, mut write_rx) = mpsc::unbounded_channel::<CacheWrite>();

        let client = redis_client.clone();
        tokio::spawn(async move {
            while let Some(msg) = write_rx.recv().await {
                if let Err(e) = Self::write_to_redis(&client, msg).await {
                    tracing::error!(error = %e, "Cache write failed");
                }
            }
        });

        Self {
            redis_client,
            write_tx,
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value, or `None` on a miss.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores a value without waiting for the write. Failures
    /// are logged by the writer task; callers cannot observe them, which is
    /// fine for a cache.
    pub fn put_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWrite {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(msg).is_err() {
            tracing::error!("Cache writer task is gone, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_is_lowercased() {
        let key = CacheKey::MovieSearch("The MATRIX".to_string());
        assert_eq!(key.to_string(), "tmdb:search:the matrix");
    }

    #[test]
    fn test_details_key() {
        let key = CacheKey::MovieDetails(27205);
        assert_eq!(key.to_string(), "tmdb:movie:27205");
    }

    #[test]
    fn test_distinct_queries_get_distinct_keys() {
        let a = CacheKey::MovieSearch("inception".to_string());
        let b = CacheKey::MovieSearch("interstellar".to_string());
        assert_ne!(a.to_string(), b.to_string());
    }
}
