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
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::cache::build_cache_key;
use crate::{
    AsyncCache, AsyncKeyValueStore, AsyncRedisStore, CacheError, CacheResult, Codec, DeleteOptions,
    GetOptions, JsonCodec, RemoteCacheConfig, SetOptions,
};

/// Cache over a remote key-value store - asynchronous version
///
/// Dropping a pending call cancels it; each store round trip is additionally bounded by
/// the configured response timeout.
pub struct AsyncRemoteCache<C = JsonCodec> {
    store: Arc<dyn AsyncKeyValueStore>,
    codec: C,
    prefix: String,
}

impl AsyncRemoteCache<JsonCodec> {
    pub async fn new(config: &RemoteCacheConfig) -> CacheResult<Self> {
        Self::with_codec(config, JsonCodec).await
    }
}

impl<C: Codec> AsyncRemoteCache<C> {
    pub async fn with_codec(config: &RemoteCacheConfig, codec: C) -> CacheResult<Self> {
        let store = AsyncRedisStore::new(config)?;
        let cache = Self::with_store(Arc::new(store), &config.prefix, codec);

        if config.eager_connect {
            cache.ping().await?;
        }
        Ok(cache)
    }

    /// Uses a store supplied by the caller; no dial or pool option applies to it.
    pub fn with_store(store: Arc<dyn AsyncKeyValueStore>, prefix: &str, codec: C) -> Self {
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

    pub fn store(&self) -> &Arc<dyn AsyncKeyValueStore> {
        &self.store
    }

    pub async fn ping(&self) -> CacheResult<()> {
        self.store.ping().await
    }
}

#[async_trait]
impl<C: Codec> AsyncCache for AsyncRemoteCache<C> {
    async fn get_with<V: DeserializeOwned + Send>(&self, key: &str, _options: GetOptions) -> CacheResult<V> {
        let cache_key = self.effective_key(key);
        debug!("cache get {}", cache_key);

        match self.store.get_bytes(&cache_key).await? {
            Some(bytes) => self.codec.decode(&bytes),
            None => Err(CacheError::NotFound(cache_key)),
        }
    }

    async fn set_with<V: Serialize + Sync + ?Sized>(&self, key: &str, value: &V, options: SetOptions) -> CacheResult<()> {
        let bytes = self.codec.encode(value)?;
        let cache_key = self.effective_key(key);
        debug!("cache set {} ({} bytes, ttl {:?})", cache_key, bytes.len(), options.ttl());

        self.store.set_bytes(&cache_key, &bytes, options.ttl()).await
    }

    async fn delete_with(&self, key: &str, _options: DeleteOptions) -> CacheResult<()> {
        let cache_key = self.effective_key(key);
        debug!("cache delete {}", cache_key);

        self.store.delete(&cache_key).await
    }
}
