use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::TmdbId;

/// Keys for the upstream-response cache
///
/// Every cacheable upstream read gets its own namespace so TTLs can differ
/// per key kind and entries never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Title autocomplete results for one query string
    TitleSearch(String),
    /// The full catalog join
    Catalog,
    /// Poster URL for one metadata id
    Poster(TmdbId),
    /// Plot overview for one metadata id
    Overview(TmdbId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::TitleSearch(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Catalog => write!(f, "catalog"),
            CacheKey::Poster(tmdb_id) => write!(f, "poster:{}", tmdb_id),
            CacheKey::Overview(tmdb_id) => write!(f, "overview:{}", tmdb_id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
///
/// Reads are awaited inline; writes are handed to a background task so a slow
/// Redis round trip never sits between an upstream response and the client.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new cache and spawns its background writer task
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Background task draining the write channel into Redis
    ///
    /// On shutdown, remaining queued messages are flushed before exiting.
    async fn writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }
                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` when the key is absent. A present key is deserialized
    /// into the requested type; a payload that no longer matches the type is
    /// an internal error rather than a silent miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

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

    /// Stores a value in the cache without blocking the caller
    ///
    /// Serialization happens inline; the Redis write is queued to the
    /// background writer. There is no confirmation that the write landed.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_title_search() {
        let key = CacheKey::TitleSearch("Toy Story".to_string());
        assert_eq!(format!("{}", key), "search:toy story");
    }

    #[test]
    fn test_cache_key_display_title_search_lowercases() {
        let key = CacheKey::TitleSearch("GOLDENEYE".to_string());
        assert_eq!(format!("{}", key), "search:goldeneye");
    }

    #[test]
    fn test_cache_key_display_catalog() {
        assert_eq!(format!("{}", CacheKey::Catalog), "catalog");
    }

    #[test]
    fn test_cache_key_display_poster() {
        let key = CacheKey::Poster(862);
        assert_eq!(format!("{}", key), "poster:862");
    }

    #[test]
    fn test_cache_key_display_overview() {
        let key = CacheKey::Overview(862);
        assert_eq!(format!("{}", key), "overview:862");
    }

    #[test]
    fn test_cache_keys_do_not_collide() {
        let poster = format!("{}", CacheKey::Poster(1));
        let overview = format!("{}", CacheKey::Overview(1));
        assert_ne!(poster, overview);
    }
}
