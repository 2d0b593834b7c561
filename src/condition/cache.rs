//! Compiled pattern cache for the `is_match` predicate

use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

/// Maximum number of cached patterns
const PATTERN_CACHE_CAPACITY: usize = 256;

/// Global pattern cache with fast hashing (ahash).
/// Invalid patterns are cached as `None` so they are only compiled once.
/// Patterns can come from target attributes, so the cache is flushed once
/// it reaches `PATTERN_CACHE_CAPACITY` entries.
static PATTERN_CACHE: Lazy<RwLock<AHashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(PATTERN_CACHE_CAPACITY)));

/// Get or compile a pattern, returning `None` if it is not a valid regex
#[inline]
pub fn get_or_compile(pattern: &str) -> Option<Regex> {
    // Fast path: check read lock first
    {
        let cache = PATTERN_CACHE.read();
        if let Some(compiled) = cache.get(pattern) {
            return compiled.clone();
        }
    }

    // Slow path: compile and cache
    let compiled = Regex::new(pattern).ok();

    {
        let mut cache = PATTERN_CACHE.write();
        if cache.len() >= PATTERN_CACHE_CAPACITY && !cache.contains_key(pattern) {
            log::debug!("pattern cache full ({} entries), flushing", cache.len());
            cache.clear();
        }
        cache.insert(pattern.to_string(), compiled.clone());
    }

    compiled
}

/// Test `haystack` against `pattern`, anywhere in the string
#[inline]
pub fn is_match(pattern: &str, haystack: &str) -> bool {
    get_or_compile(pattern).is_some_and(|re| re.is_match(haystack))
}

/// Clear the pattern cache (useful for testing)
pub fn clear_pattern_cache() {
    let mut cache = PATTERN_CACHE.write();
    cache.clear();
}

/// Number of cached patterns, valid or not
pub fn pattern_cache_size() -> usize {
    let cache = PATTERN_CACHE.read();
    cache.len()
}
