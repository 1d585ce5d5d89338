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
use deadpool::managed::{Metrics, Object, RecycleError, RecycleResult, Timeouts};
use deadpool::Runtime;
use redis::aio::MultiplexedConnection;
use redis::Client;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{PoolConfig, RemoteCacheConfig};
use crate::connection::create_client;
use crate::errors::{CacheError, CacheResult};
use crate::util::ttl_millis;

pub type AsyncRedisPool = deadpool::managed::Pool<AsyncRedisConnectionManager>;

/// Byte level access to the remote store, async flavour.
#[async_trait]
pub trait AsyncKeyValueStore: Send + Sync {
    /// `None` when the key does not exist.
    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// `ttl` of `None` stores the value without expiration.
    async fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    async fn ping(&self) -> CacheResult<()>;
}

/// deadpool manager producing multiplexed redis connections
pub struct AsyncRedisConnectionManager {
    client: Client,
    idle_timeout: Option<Duration>,
}

impl AsyncRedisConnectionManager {
    pub fn new(client: Client, idle_timeout: Option<Duration>) -> Self {
        Self { client, idle_timeout }
    }
}

#[async_trait]
impl deadpool::managed::Manager for AsyncRedisConnectionManager {
    type Type = MultiplexedConnection;
    type Error = redis::RedisError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.client.get_multiplexed_async_connection().await
    }

    async fn recycle(&self, conn: &mut Self::Type, metrics: &Metrics) -> RecycleResult<Self::Error> {
        if let Some(idle_timeout) = self.idle_timeout {
            if metrics.last_used() > idle_timeout {
                return Err(RecycleError::Message("connection idle for too long".into()));
            }
        }

        // Check that the connection is still valid
        match redis::cmd("PING").query_async::<String>(conn).await {
            Ok(pong) if pong == "PONG" => Ok(()),
            Ok(_) => Err(RecycleError::Message("Invalid PONG response".into())),
            Err(e) => Err(RecycleError::Backend(e)),
        }
    }
}

/// Redis backed store over a deadpool connection pool
pub struct AsyncRedisStore {
    pool: AsyncRedisPool,
    response_timeout: Option<Duration>,
    reaper: Option<JoinHandle<()>>,
}

impl AsyncRedisStore {
    pub fn new(config: &RemoteCacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let client = create_client(config)?;
        let pool = Self::build_pool(client, &config.pool)?;
        let reaper = Self::start_reaper(pool.clone(), &config.pool);

        info!(
            "async redis pool created for {} (max_active={}, max_idle={})",
            config.address,
            config.pool.max_active,
            config.pool.effective_max_idle()
        );

        Ok(Self {
            pool,
            response_timeout: config.response_timeout(),
            reaper,
        })
    }

    /// Wraps a pool built by the caller, sizing and dial options are left untouched.
    pub fn from_pool(pool: AsyncRedisPool) -> Self {
        Self {
            pool,
            response_timeout: None,
            reaper: None,
        }
    }

    /// Pools connections of a client built by the caller with the default pool sizing.
    pub fn from_client(client: Client) -> CacheResult<Self> {
        let config = PoolConfig::default();
        let pool = Self::build_pool(client, &config)?;
        let reaper = Self::start_reaper(pool.clone(), &config);
        Ok(Self {
            pool,
            response_timeout: None,
            reaper,
        })
    }

    fn build_pool(client: Client, config: &PoolConfig) -> CacheResult<AsyncRedisPool> {
        let manager = AsyncRedisConnectionManager::new(client, config.idle_timeout());

        // A zero wait timeout makes deadpool fail immediately on an exhausted pool
        let wait = if config.wait { config.connection_timeout } else { Duration::ZERO };

        let pool = deadpool::managed::Pool::builder(manager)
            .max_size(config.max_active as usize)
            .timeouts(Timeouts {
                wait: Some(wait),
                create: Some(config.connection_timeout),
                recycle: Some(config.connection_timeout),
            })
            .runtime(Runtime::Tokio1)
            .build()?;

        Ok(pool)
    }

    /// Periodically closes idle connections past the idle timeout and keeps at most
    /// `max_idle` of them. Only started when a tokio runtime is running.
    fn start_reaper(pool: AsyncRedisPool, config: &PoolConfig) -> Option<JoinHandle<()>> {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let max_idle = config.effective_max_idle();
        let idle_timeout = config.idle_timeout();
        let period = idle_timeout
            .unwrap_or(Duration::from_secs(60))
            .min(Duration::from_secs(60));

        Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let kept = AtomicU32::new(0);
                pool.retain(|_, metrics| {
                    if idle_timeout.is_some_and(|t| metrics.last_used() > t) {
                        return false;
                    }
                    kept.fetch_add(1, Ordering::Relaxed) < max_idle
                });
                debug!("async redis pool reaped, status: {:?}", pool.status());
            }
        }))
    }

    pub fn pool(&self) -> &AsyncRedisPool {
        &self.pool
    }

    async fn get_connection(&self) -> CacheResult<Object<AsyncRedisConnectionManager>> {
        Ok(self.pool.get().await?)
    }

    async fn with_timeout<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        match self.response_timeout {
            Some(limit) => timeout(limit, fut)
                .await
                .map_err(|_| CacheError::TimeoutError(limit))?,
            None => fut.await,
        }
    }
}

impl Drop for AsyncRedisStore {
    fn drop(&mut self) {
        if let Some(reaper) = self.reaper.take() {
            reaper.abort();
        }
    }
}

#[async_trait]
impl AsyncKeyValueStore for AsyncRedisStore {
    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.with_timeout(async {
            let mut conn = self.get_connection().await?;
            let value: Option<Vec<u8>> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await
                .map_err(|e| {
                    warn!("redis GET failed for {}: {}", key, e);
                    CacheError::RedisError(e)
                })?;
            Ok(value)
        })
        .await
    }

    async fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.with_timeout(async {
            let mut conn = self.get_connection().await?;

            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value);
            if let Some(millis) = ttl_millis(ttl) {
                cmd.arg("PX").arg(millis);
            }

            cmd.query_async::<()>(&mut *conn).await.map_err(|e| {
                warn!("redis SET failed for {}: {}", key, e);
                CacheError::RedisError(e)
            })
        })
        .await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.with_timeout(async {
            let mut conn = self.get_connection().await?;
            let deleted: i64 = redis::cmd("DEL")
                .arg(key)
                .query_async(&mut *conn)
                .await
                .map_err(|e| {
                    warn!("redis DEL failed for {}: {}", key, e);
                    CacheError::RedisError(e)
                })?;
            debug!("redis DEL {} removed {} key(s)", key, deleted);
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> CacheResult<()> {
        self.with_timeout(async {
            let mut conn = self.get_connection().await?;
            let response: String = redis::cmd("PING").query_async(&mut *conn).await?;
            if response == "PONG" {
                Ok(())
            } else {
                Err(CacheError::PoolError(format!("unexpected PING response: {}", response)))
            }
        })
        .await
    }
}
