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
mod blocking;
mod memory;
mod non_blocking;

pub use blocking::*;
pub use memory::*;
pub use non_blocking::*;

use redis::{Client, ConnectionAddr, ConnectionInfo, IntoConnectionInfo, RedisConnectionInfo};

use crate::config::RemoteCacheConfig;
use crate::errors::{CacheError, CacheResult};
use crate::util::{is_redis_url, split_host_port};

/// Builds the redis client described by the configuration. No connection is opened here;
/// AUTH and SELECT are issued by the client on every new connection.
pub(crate) fn create_client(config: &RemoteCacheConfig) -> CacheResult<Client> {
    let conn_info = if is_redis_url(&config.address) {
        build_connection_info_from_url(config.address.trim(), config)?
    } else {
        let (host, port) = split_host_port(&config.address)?;
        build_connection_info_from_host_port(&host, port, config)?
    };

    Client::open(conn_info).map_err(|e| CacheError::ConfigError(e.to_string()))
}

fn build_connection_info_from_url(url: &str, config: &RemoteCacheConfig) -> CacheResult<ConnectionInfo> {
    let conn_info: ConnectionInfo = url
        .into_connection_info()
        .map_err(|e| CacheError::ConfigError(e.to_string()))?;

    // Each field set in the configuration overrides the url, the rest is kept
    let settings = apply_redis_settings(conn_info.redis_settings().clone(), config);
    Ok(conn_info.set_redis_settings(settings))
}

fn build_connection_info_from_host_port(
    host: &str,
    port: u16,
    config: &RemoteCacheConfig,
) -> CacheResult<ConnectionInfo> {
    let addr = if config.tls {
        ConnectionAddr::TcpTls {
            host: host.to_string(),
            port,
            insecure: false,
            tls_params: None,
        }
    } else {
        ConnectionAddr::Tcp(host.to_string(), port)
    };

    let connection = addr.into_connection_info()?;
    Ok(connection.set_redis_settings(apply_redis_settings(RedisConnectionInfo::default(), config)))
}

fn apply_redis_settings(mut redis_info: RedisConnectionInfo, config: &RemoteCacheConfig) -> RedisConnectionInfo {
    if config.database != 0 {
        redis_info = redis_info.set_db(config.database);
    }
    if let Some(username) = config.effective_username() {
        redis_info = redis_info.set_username(username);
    }
    if let Some(password) = config.effective_password() {
        redis_info = redis_info.set_password(password);
    }
    redis_info
}
