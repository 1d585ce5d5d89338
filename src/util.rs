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

use crate::errors::{CacheError, CacheResult};

pub(crate) const DEFAULT_PORT: u16 = 6379;

/// Expiration in whole milliseconds, rounded up so that a sub-millisecond
/// ttl still expires instead of persisting. `None` means no expiration.
pub(crate) fn ttl_millis(ttl: Option<Duration>) -> Option<u64> {
    let ttl = ttl.filter(|t| !t.is_zero())?;
    let millis = ttl.as_millis();
    let millis = if Duration::from_millis(millis as u64) < ttl { millis + 1 } else { millis };
    Some(millis.min(u64::MAX as u128) as u64)
}

/// Splits `host:port`, `host` or `[v6]:port` into its parts.
pub(crate) fn split_host_port(address: &str) -> CacheResult<(String, u16)> {
    let address = address.trim();

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(|| {
            CacheError::ConfigError(format!("Unterminated IPv6 address: {}", address))
        })?;
        let port = match tail.strip_prefix(':') {
            Some(port) => parse_port(port, address)?,
            None if tail.is_empty() => DEFAULT_PORT,
            None => {
                return Err(CacheError::ConfigError(format!("Invalid address: {}", address)));
            }
        };
        return Ok((host.to_string(), port));
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => Ok((host.to_string(), parse_port(port, address)?)),
        Some(_) => Err(CacheError::ConfigError(format!("Missing host in address: {}", address))),
        None => Ok((address.to_string(), DEFAULT_PORT)),
    }
}

fn parse_port(port: &str, address: &str) -> CacheResult<u16> {
    port.parse::<u16>()
        .map_err(|_| CacheError::ConfigError(format!("Invalid port in address: {}", address)))
}

pub(crate) fn is_redis_url(address: &str) -> bool {
    let address = address.trim_start();
    ["redis://", "rediss://", "redis+unix://", "unix://"]
        .iter()
        .any(|scheme| address.starts_with(scheme))
}
