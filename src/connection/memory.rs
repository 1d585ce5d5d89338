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
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::connection::{AsyncKeyValueStore, KeyValueStore};
use crate::errors::CacheResult;

struct StoredValue {
    value: Vec<u8>,
    expiry: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}

/// Writes between two sweeps of expired entries.
const SWEEP_INTERVAL: usize = 128;

/// In-process store honouring expirations, usable wherever a remote store is expected.
/// Expired entries are dropped when they are looked up, and swept every
/// [`SWEEP_INTERVAL`] writes so that keys which are never read again do not pile up.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredValue>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .is_some_and(|stored| !stored.is_expired(now))
    }

    /// Live keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .read()
            .iter()
            .filter(|(_, stored)| !stored.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drops every expired entry, returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, stored| !stored.is_expired(now));
        before - entries.len()
    }

    /// Remaining lifetime of a live key, `None` when it never expires or does not exist.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read();
        let stored = entries.get(key).filter(|stored| !stored.is_expired(now))?;
        stored.expiry.map(|expiry| expiry.saturating_duration_since(now))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(stored) if !stored.is_expired(now) => return Ok(Some(stored.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Double checking, the entry may have been replaced meanwhile
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|stored| stored.is_expired(now)) {
            entries.remove(key);
        }
        Ok(entries
            .get(key)
            .filter(|stored| !stored.is_expired(now))
            .map(|stored| stored.value.clone()))
    }

    fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        let expiry = ttl
            .filter(|ttl| !ttl.is_zero())
            .and_then(|ttl| Instant::now().checked_add(ttl));
        self.entries.write().insert(
            key.to_string(),
            StoredValue {
                value: value.to_vec(),
                expiry,
            },
        );

        if self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.purge_expired();
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AsyncKeyValueStore for MemoryStore {
    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        KeyValueStore::get_bytes(self, key)
    }

    async fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        KeyValueStore::set_bytes(self, key, value, ttl)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        KeyValueStore::delete(self, key)
    }

    async fn ping(&self) -> CacheResult<()> {
        KeyValueStore::ping(self)
    }
}
