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
use r2d2::{HandleError, Pool, PooledConnection};
use redis::{Client, RedisError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{PoolConfig, RemoteCacheConfig};
use crate::connection::create_client;
use crate::errors::{CacheError, CacheResult};
use crate::util::ttl_millis;

pub type RedisPool = Pool<Client>;

/// Byte level access to the remote store, blocking flavour.
pub trait KeyValueStore: Send + Sync {
    /// `None` when the key does not exist.
    fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// `ttl` of `None` stores the value without expiration.
    fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;

    /// Removing a missing key is not an error.
    fn delete(&self, key: &str) -> CacheResult<()>;

    fn ping(&self) -> CacheResult<()>;
}

/// Forwards pool errors to tracing instead of the `log` crate.
#[derive(Debug, Clone, Copy)]
struct TracingErrorHandler;

impl HandleError<RedisError> for TracingErrorHandler {
    fn handle_error(&self, error: RedisError) {
        warn!("redis pool connection error: {}", error);
    }
}

/// Redis backed store over an r2d2 connection pool
pub struct SyncRedisStore {
    pool: RedisPool,
    wait: bool,
    response_timeout: Option<Duration>,
}

impl SyncRedisStore {
    pub fn new(config: &RemoteCacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let client = create_client(config)?;
        let pool = Self::build_pool(client, &config.pool);

        info!(
            "redis pool created for {} (max_active={}, max_idle={})",
            config.address,
            config.pool.max_active,
            config.pool.effective_max_idle()
        );

        Ok(Self {
            pool,
            wait: config.pool.wait,
            response_timeout: config.response_timeout(),
        })
    }

    /// Wraps a pool built by the caller, sizing and dial options are left untouched.
    pub fn from_pool(pool: RedisPool) -> Self {
        Self {
            pool,
            wait: true,
            response_timeout: None,
        }
    }

    /// Pools connections of a client built by the caller with the default pool sizing.
    pub fn from_client(client: Client) -> Self {
        Self::from_pool(Self::build_pool(client, &PoolConfig::default()))
    }

    fn build_pool(client: Client, config: &PoolConfig) -> RedisPool {
        // Unchecked: the pool dials in the background, construction never blocks on the server
        Pool::builder()
            .max_size(config.max_active)
            .min_idle(Some(config.effective_max_idle()))
            .idle_timeout(config.idle_timeout())
            .connection_timeout(config.connection_timeout)
            .test_on_check_out(true)
            .error_handler(Box::new(TracingErrorHandler))
            .build_unchecked(client)
    }

    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }

    fn get_connection(&self) -> CacheResult<PooledConnection<Client>> {
        let conn = if self.wait {
            self.pool.get()?
        } else {
            self.get_connection_no_wait()?
        };

        if self.response_timeout.is_some() {
            conn.set_read_timeout(self.response_timeout)?;
            conn.set_write_timeout(self.response_timeout)?;
        }
        Ok(conn)
    }

    /// Hands out an idle connection or dials a new one, failing at once only when
    /// every slot of the pool is in use.
    fn get_connection_no_wait(&self) -> CacheResult<PooledConnection<Client>> {
        if let Some(conn) = self.pool.try_get() {
            return Ok(conn);
        }

        let state = self.pool.state();
        if state.connections >= self.pool.max_size() {
            return Err(CacheError::PoolError(format!(
                "connection pool exhausted ({} of {} in use)",
                state.connections.saturating_sub(state.idle_connections),
                self.pool.max_size()
            )));
        }
        Ok(self.pool.get_timeout(self.pool.connection_timeout())?)
    }
}

impl KeyValueStore for SyncRedisStore {
    fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.get_connection()?;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query(&mut *conn)
            .map_err(|e| {
                warn!("redis GET failed for {}: {}", key, e);
                CacheError::RedisError(e)
            })?;
        Ok(value)
    }

    fn set_bytes(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.get_connection()?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(millis) = ttl_millis(ttl) {
            cmd.arg("PX").arg(millis);
        }

        cmd.query::<()>(&mut *conn).map_err(|e| {
            warn!("redis SET failed for {}: {}", key, e);
            CacheError::RedisError(e)
        })
    }

    fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_connection()?;
        let deleted: i64 = redis::cmd("DEL")
            .arg(key)
            .query(&mut *conn)
            .map_err(|e| {
                warn!("redis DEL failed for {}: {}", key, e);
                CacheError::RedisError(e)
            })?;
        debug!("redis DEL {} removed {} key(s)", key, deleted);
        Ok(())
    }

    fn ping(&self) -> CacheResult<()> {
        let mut conn = self.get_connection()?;
        let response: String = redis::cmd("PING").query(&mut *conn)?;
        if response == "PONG" {
            Ok(())
        } else {
            Err(CacheError::PoolError(format!("unexpected PING response: {}", response)))
        }
    }
}
