/// Read-through caching for an async computation.
///
/// Looks the key up in the cache first; on a miss, runs the block, stores
/// the result in the background, and returns it. The block must evaluate to
/// an `AppResult` of a serde-serializable value.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_TTL, async move {
///     self.fetch_details(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.put_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
