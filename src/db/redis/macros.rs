/// Read-through caching for upstream calls.
///
/// Checks the cache for `$key`; on a hit the cached value is returned as-is,
/// on a miss `$block` is awaited, its result queued for a background cache
/// write with the given TTL, and returned.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`]
/// * `$key`: the [`crate::db::CacheKey`] to read and write
/// * `$ttl`: time-to-live in seconds for the cached value
/// * `$block`: async block producing the value on a cache miss
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Poster(tmdb_id), POSTER_CACHE_TTL, async move {
///     fetch_poster(tmdb_id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
