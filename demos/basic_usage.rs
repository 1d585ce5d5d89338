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
use crud_cache_redis::{Cache, CacheResult, RemoteCache, RemoteCacheConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
}

fn main() -> CacheResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Create configuration
    let config = RemoteCacheConfig::single_server("localhost:6379")
        .with_prefix("app:")
        .with_pool(5, 20, Duration::from_secs(600))
        .with_eager_connect(true);

    // 2. Create the cache
    let cache = RemoteCache::new(&config)?;

    // 3. Store with a ttl and read it back
    let user = User { name: "jack".to_string(), age: 18 };
    cache.set_with_ttl("user:1", &user, Duration::from_secs(5))?;
    let found: User = cache.get("user:1")?;
    println!("{} -> {:?}", cache.effective_key("user:1"), found);

    // 4. Delete, a second get reports the key as missing
    cache.delete("user:1")?;
    match cache.get::<User>("user:1") {
        Err(e) if e.is_not_found() => println!("user:1 is gone"),
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
