/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::cache::build_cache_key;
use crate::{
    Cache, CacheError, CacheResult, Codec, DeleteOptions, GetOptions, JsonCodec, KeyValueStore,
    RemoteCacheConfig, SetOptions, SyncRedisStore,
};

/// Cache over a remote key-value store
///
/// Every logical key is stored under `prefix + key`; values go through the codec.
/// The cache holds no mutable state, share it between threads behind an `Arc`.
pub struct RemoteCache<C = JsonCodec> {
    store: Arc<dyn KeyValueStore>,
    codec: C,
    prefix: String,
}

impl RemoteCache<JsonCodec> {
    /// Builds a pooled redis store from the configuration. No connection is opened
    /// unless `eager_connect` is set.
    pub fn new(config: &RemoteCacheConfig) -> CacheResult<Self> {
        Self::with_codec(config, JsonCodec)
    }
}

impl<C: Codec> RemoteCache<C> {
    pub fn with_codec(config: &RemoteCacheConfig, codec: C) -> CacheResult<Self> {
        let store = SyncRedisStore::new(config)?;
        let cache = Self::with_store(Arc::new(store), &config.prefix, codec);

        if config.eager_connect {
            cache.ping()?;
        }
        Ok(cache)
    }

    /// Uses a store supplied by the caller; no dial or pool option applies to it.
    pub fn with_store(store: Arc<dyn KeyValueStore>, prefix: &str, codec: C) -> Self {
        Self {
            store,
            codec,
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn effective_key(&self, key: &str) -> String {
        build_cache_key(&self.prefix, key)
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Liveness probe of the underlying store.
    pub fn ping(&self) -> CacheResult<()> {
        self.store.ping()
    }
}

impl<C: Codec> Cache for RemoteCache<C> {
    fn get_with<V: DeserializeOwned>(&self, key: &str, _options: GetOptions) -> CacheResult<V> {
        let cache_key = self.effective_key(key);
        debug!("cache get {}", cache_key);

        match self.store.get_bytes(&cache_key)? {
            Some(bytes) => self.codec.decode(&bytes),
            None => Err(CacheError::NotFound(cache_key)),
        }
    }

    fn set_with<V: Serialize + ?Sized>(&self, key: &str, value: &V, options: SetOptions) -> CacheResult<()> {
        let bytes = self.codec.encode(value)?;
        let cache_key = self.effective_key(key);
        debug!("cache set {} ({} bytes, ttl {:?})", cache_key, bytes.len(), options.ttl());

        self.store.set_bytes(&cache_key, &bytes, options.ttl())
    }

    fn delete_with(&self, key: &str, _options: DeleteOptions) -> CacheResult<()> {
        let cache_key = self.effective_key(key);
        debug!("cache delete {}", cache_key);

        self.store.delete(&cache_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn jack() -> User {
        User { name: "jack".to_string(), age: 18 }
    }

    fn create_test_cache(prefix: &str) -> (Arc<MemoryStore>, RemoteCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = RemoteCache::with_store(store.clone(), prefix, JsonCodec);
        (store, cache)
    }

    /// Store failing every call, records the keys it was asked for.
    #[derive(Default)]
    struct BrokenStore {
        seen: Mutex<Vec<String>>,
    }

    impl BrokenStore {
        fn fail(&self, key: &str) -> CacheError {
            self.seen.lock().push(key.to_string());
            CacheError::PoolError("connection refused".to_string())
        }
    }

    impl KeyValueStore for BrokenStore {
        fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(self.fail(key))
        }

        fn set_bytes(&self, key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            Err(self.fail(key))
        }

        fn delete(&self, key: &str) -> CacheResult<()> {
            Err(self.fail(key))
        }

        fn ping(&self) -> CacheResult<()> {
            Err(self.fail("PING"))
        }
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let (_, cache) = create_test_cache("");
        cache.set("user", &jack()).unwrap();
        let found: User = cache.get("user").unwrap();
        assert_eq!(found, jack());

        cache.set("numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(cache.get::<Vec<i32>>("numbers").unwrap(), vec![1, 2, 3]);

        cache.set("greeting", "hello").unwrap();
        assert_eq!(cache.get::<String>("greeting").unwrap(), "hello");
    }

    #[test]
    fn test_prefixed_scenario() {
        let (store, cache) = create_test_cache("app:");
        cache.set_with_ttl("user:1", &jack(), Duration::from_secs(5)).unwrap();

        assert!(store.contains_key("app:user:1"));
        assert!(!store.contains_key("user:1"));
        let ttl = store.ttl("app:user:1").unwrap();
        assert!(ttl > Duration::from_secs(4) && ttl <= Duration::from_secs(5));

        let found: User = cache.get("user:1").unwrap();
        assert_eq!(found, jack());
    }

    #[test]
    fn test_get_missing_key_is_not_found() {
        let (_, cache) = create_test_cache("app:");
        let err = cache.get::<User>("nobody").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, CacheError::NotFound(ref key) if key == "app:nobody"));
    }

    #[test]
    fn test_expired_entry_is_not_found() {
        let (_, cache) = create_test_cache("app:");
        cache.set_with_ttl("user:1", &jack(), Duration::from_millis(50)).unwrap();
        assert!(cache.get::<User>("user:1").is_ok());

        thread::sleep(Duration::from_millis(150));

        assert!(cache.get::<User>("user:1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_zero_expiration_persists() {
        let (store, cache) = create_test_cache("");
        cache
            .set_with("forever", &jack(), SetOptions::expire_in(Duration::ZERO))
            .unwrap();
        assert_eq!(store.ttl("forever"), None);
        assert!(cache.get::<User>("forever").is_ok());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, cache) = create_test_cache("app:");
        cache.delete("never-set").unwrap();

        cache.set("user:2", &jack()).unwrap();
        cache.delete("user:2").unwrap();
        cache.delete("user:2").unwrap();

        assert!(store.is_empty());
        assert!(cache.get::<User>("user:2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_prefix_isolation() {
        let store = Arc::new(MemoryStore::new());
        let cache_a = RemoteCache::with_store(store.clone(), "a:", JsonCodec);
        let cache_b = RemoteCache::with_store(store.clone(), "b:", JsonCodec);

        cache_a.set("k", &jack()).unwrap();
        assert!(cache_b.get::<User>("k").unwrap_err().is_not_found());

        cache_b.set("k", &User { name: "rose".to_string(), age: 20 }).unwrap();
        assert_eq!(cache_a.get::<User>("k").unwrap(), jack());

        cache_b.delete("k").unwrap();
        assert_eq!(cache_a.get::<User>("k").unwrap(), jack());
    }

    #[test]
    fn test_malformed_payload_is_deserialization_error() {
        let (store, cache) = create_test_cache("app:");
        KeyValueStore::set_bytes(store.as_ref(), "app:user:1", b"not json", None).unwrap();

        let err = cache.get::<User>("user:1").unwrap_err();
        assert!(matches!(err, CacheError::DeserializationError(_)));

        // Wrong shape is a decoding failure too
        cache.set("user:1", &42).unwrap();
        let err = cache.get::<User>("user:1").unwrap_err();
        assert!(matches!(err, CacheError::DeserializationError(_)));
    }

    #[test]
    fn test_serialization_error_skips_store() {
        let store = Arc::new(BrokenStore::default());
        let cache = RemoteCache::with_store(store.clone(), "app:", JsonCodec);

        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), "tuple keys are not valid JSON object keys");
        let err = cache.set("bad", &bad).unwrap_err();

        assert!(matches!(err, CacheError::SerializationError(_)));
        assert!(store.seen.lock().is_empty());
    }

    #[test]
    fn test_transport_errors_propagate_once() {
        let store = Arc::new(BrokenStore::default());
        let cache = RemoteCache::with_store(store.clone(), "app:", JsonCodec);

        assert!(cache.get::<User>("user:1").unwrap_err().is_transport());
        assert!(cache.set("user:1", &jack()).unwrap_err().is_transport());
        assert!(cache.delete("user:1").unwrap_err().is_transport());
        assert!(cache.ping().unwrap_err().is_transport());

        // No retries, every call reached the store exactly once with the effective key
        assert_eq!(
            *store.seen.lock(),
            vec!["app:user:1", "app:user:1", "app:user:1", "PING"]
        );
    }

    #[test]
    fn test_custom_codec() {
        /// Stores JSON reversed, enough to prove the codec is pluggable.
        struct ReversedJson;

        impl Codec for ReversedJson {
            fn encode<V: Serialize + ?Sized>(&self, value: &V) -> CacheResult<Vec<u8>> {
                let mut bytes = JsonCodec.encode(value)?;
                bytes.reverse();
                Ok(bytes)
            }

            fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<V> {
                let mut bytes = bytes.to_vec();
                bytes.reverse();
                JsonCodec.decode(&bytes)
            }
        }

        let store = Arc::new(MemoryStore::new());
        let cache = RemoteCache::with_store(store.clone(), "", ReversedJson);
        cache.set("n", &[1, 2]).unwrap();

        assert_eq!(KeyValueStore::get_bytes(store.as_ref(), "n").unwrap(), Some(b"]2,1[".to_vec()));
        assert_eq!(cache.get::<Vec<u8>>("n").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_concurrent_callers() {
        let (_, cache) = create_test_cache("app:");
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let key = format!("user:{}", i);
                    let user = User { name: format!("user-{}", i), age: i };
                    cache.set(&key, &user).unwrap();
                    assert_eq!(cache.get::<User>(&key).unwrap(), user);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_construction_is_lazy() {
        let config = RemoteCacheConfig::single_server("127.0.0.1:1").with_prefix("app:");
        let cache = RemoteCache::new(&config).unwrap();
        assert_eq!(cache.prefix(), "app:");
        assert_eq!(cache.effective_key("user:1"), "app:user:1");
    }

    #[test]
    fn test_eager_connect_surfaces_dial_failure() {
        let config = RemoteCacheConfig::single_server("127.0.0.1:1")
            .with_connection_timeout(Duration::from_millis(200))
            .with_eager_connect(true);
        let err = RemoteCache::new(&config).err().unwrap();
        assert!(err.is_transport());
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = RemoteCacheConfig::default().with_address("");
        assert!(matches!(RemoteCache::new(&config), Err(CacheError::ConfigError(_))));
    }

    // The tests below need a redis server on 127.0.0.1:6379

    fn create_redis_cache(prefix: &str) -> RemoteCache {
        let config = RemoteCacheConfig::single_server("redis://127.0.0.1:6379")
            .with_prefix(prefix)
            .with_eager_connect(true);
        RemoteCache::new(&config).unwrap()
    }

    #[test]
    #[ignore = "requires a running redis server"]
    fn test_redis_scenario() {
        let cache = create_redis_cache("curd-cache-redis:");

        cache.set_with_ttl("test_key1", &jack(), Duration::from_secs(1)).unwrap();
        assert_eq!(cache.get::<User>("test_key1").unwrap(), jack());

        thread::sleep(Duration::from_millis(1500));
        assert!(cache.get::<User>("test_key1").unwrap_err().is_not_found());

        let rose = User { name: "rose".to_string(), age: 20 };
        cache.set("test_key2", &rose).unwrap();
        assert_eq!(cache.get::<User>("test_key2").unwrap(), rose);

        cache.delete("test_key2").unwrap();
        cache.delete("test_key2").unwrap();
        assert!(cache.get::<User>("test_key2").unwrap_err().is_not_found());
    }

    #[test]
    #[ignore = "requires a running redis server"]
    fn test_redis_prefix_isolation() {
        let cache_a = create_redis_cache("isolation-a:");
        let cache_b = create_redis_cache("isolation-b:");

        cache_a.set_with_ttl("k", &jack(), Duration::from_secs(10)).unwrap();
        assert!(cache_b.get::<User>("k").unwrap_err().is_not_found());
        cache_a.delete("k").unwrap();
    }
}
