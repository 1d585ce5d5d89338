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
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{CacheError, CacheResult};

pub const DEFAULT_ADDRESS: &str = "localhost:6379";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteCacheConfig {
    /// Prepended to every logical key
    pub prefix: String,
    /// `host:port`, or a `redis://` / `rediss://` url
    pub address: String,
    /// User name
    pub username: Option<String>,
    /// PASSWORD, authentication is skipped when unset or empty
    pub password: Option<String>,
    /// Database number
    pub database: i64,
    /// TLS enabled or not
    pub tls: bool,
    /// Connection pool sizing
    pub pool: PoolConfig,
    /// Upper bound for a single command round trip, zero disables it
    pub response_timeout: Duration,
    /// Ping the server while constructing the cache
    pub eager_connect: bool,
}

impl Default for RemoteCacheConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            address: DEFAULT_ADDRESS.to_string(),
            username: None,
            password: None,
            database: 0,
            tls: false,
            pool: PoolConfig::default(),
            response_timeout: Duration::from_secs(3),
            eager_connect: false,
        }
    }
}

impl RemoteCacheConfig {
    pub fn single_server(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_database(mut self, db: i64) -> Self {
        self.database = db;
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Shorthand for the three sizing knobs of the pool.
    pub fn with_pool(mut self, max_idle: u32, max_active: u32, idle_timeout: Duration) -> Self {
        self.pool.max_idle = max_idle;
        self.pool.max_active = max_active;
        self.pool.idle_timeout = idle_timeout;
        self
    }

    pub fn with_pool_config(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.pool.wait = wait;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.pool.connection_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_eager_connect(mut self, enabled: bool) -> Self {
        self.eager_connect = enabled;
        self
    }

    pub(crate) fn effective_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    pub(crate) fn effective_username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }

    pub(crate) fn response_timeout(&self) -> Option<Duration> {
        Some(self.response_timeout).filter(|t| !t.is_zero())
    }

    pub fn validate(&self) -> CacheResult<()> {
        if self.address.trim().is_empty() {
            return Err(CacheError::ConfigError("Address cannot be empty".to_string()));
        }
        if self.database < 0 {
            return Err(CacheError::ConfigError(format!(
                "Database index cannot be negative: {}",
                self.database
            )));
        }
        self.pool.validate()
    }
}

/// Connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Idle connections kept around for reuse
    pub max_idle: u32,
    /// Upper bound of connections open at the same time
    pub max_active: u32,
    /// Idle connections older than this are closed, zero keeps them forever
    pub idle_timeout: Duration,
    /// Wait for a free connection when the pool is exhausted instead of failing at once
    pub wait: bool,
    /// How long a caller may wait for a connection
    pub connection_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: 5,
            max_active: 20,
            idle_timeout: Duration::from_secs(10 * 60),
            wait: true,
            connection_timeout: Duration::from_secs(3),
        }
    }
}

impl PoolConfig {
    pub fn with_max_idle(mut self, max_idle: u32) -> Self {
        self.max_idle = max_idle;
        self
    }

    pub fn with_max_active(mut self, max_active: u32) -> Self {
        self.max_active = max_active;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Idle connections never exceed the active limit.
    pub(crate) fn effective_max_idle(&self) -> u32 {
        self.max_idle.min(self.max_active)
    }

    pub(crate) fn idle_timeout(&self) -> Option<Duration> {
        Some(self.idle_timeout).filter(|t| !t.is_zero())
    }

    pub fn validate(&self) -> CacheResult<()> {
        if self.max_active == 0 {
            return Err(CacheError::ConfigError("Max active connections cannot be zero".to_string()));
        }
        if self.connection_timeout.is_zero() {
            return Err(CacheError::ConfigError("Connection timeout cannot be zero".to_string()));
        }
        Ok(())
    }
}
