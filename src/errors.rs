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

use std::time::Duration;
use redis::RedisError;
use thiserror::Error;

pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The key is absent from the remote store (never set, expired or deleted).
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Redis error: {0}")]
    RedisError(#[from] RedisError),

    #[error("Connection pool error: {0}")]
    PoolError(String),

    #[error("Operation timed out after {0:?}")]
    TimeoutError(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    /// Failures raised by the connection or pool layer rather than by the cache itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::RedisError(_) | CacheError::PoolError(_) | CacheError::TimeoutError(_)
        )
    }

    pub fn is_codec(&self) -> bool {
        matches!(
            self,
            CacheError::SerializationError(_) | CacheError::DeserializationError(_)
        )
    }
}

impl From<r2d2::Error> for CacheError {
    fn from(err: r2d2::Error) -> Self {
        CacheError::PoolError(err.to_string())
    }
}

impl From<deadpool::managed::PoolError<RedisError>> for CacheError {
    fn from(err: deadpool::managed::PoolError<RedisError>) -> Self {
        match err {
            deadpool::managed::PoolError::Backend(e) => CacheError::RedisError(e),
            other => CacheError::PoolError(other.to_string()),
        }
    }
}

impl From<deadpool::managed::BuildError> for CacheError {
    fn from(err: deadpool::managed::BuildError) -> Self {
        CacheError::PoolError(err.to_string())
    }
}
