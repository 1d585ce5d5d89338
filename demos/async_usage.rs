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
use crud_cache_redis::{AsyncCache, AsyncRemoteCache, CacheResult, RemoteCacheConfig, SetOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
}

#[tokio::main]
async fn main() -> CacheResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = RemoteCacheConfig::single_server("redis://127.0.0.1:6379")
        .with_prefix("app:async:")
        .with_response_timeout(Duration::from_millis(500))
        .with_eager_connect(true);

    let cache = Arc::new(AsyncRemoteCache::new(&config).await?);

    // Concurrent writers share one pool
    let mut handles = Vec::new();
    for i in 0..10u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("user:{}", i);
            let user = User { name: format!("user-{}", i), age: 20 + i };
            cache
                .set_with(&key, &user, SetOptions::expire_in(Duration::from_secs(30)))
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("writer task panicked")?;
    }

    let user: User = cache.get("user:3").await?;
    println!("user:3 -> {:?}", user);

    for i in 0..10u32 {
        cache.delete(&format!("user:{}", i)).await?;
    }
    Ok(())
}
