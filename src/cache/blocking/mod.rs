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
mod remote;

pub use remote::*;

use std::time::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{CacheResult, DeleteOptions, GetOptions, SetOptions};

/// Cache backend contract of the CRUD layer, blocking flavour.
pub trait Cache {
    /// Fails with `CacheError::NotFound` when the key is absent.
    fn get_with<V: DeserializeOwned>(&self, key: &str, options: GetOptions) -> CacheResult<V>;
    fn set_with<V: Serialize + ?Sized>(&self, key: &str, value: &V, options: SetOptions) -> CacheResult<()>;
    fn delete_with(&self, key: &str, options: DeleteOptions) -> CacheResult<()>;

    fn get<V: DeserializeOwned>(&self, key: &str) -> CacheResult<V> {
        self.get_with(key, GetOptions::default())
    }

    /// Stores without expiration.
    fn set<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> CacheResult<()> {
        self.set_with(key, value, SetOptions::default())
    }

    fn set_with_ttl<V: Serialize + ?Sized>(&self, key: &str, value: &V, ttl: Duration) -> CacheResult<()> {
        self.set_with(key, value, SetOptions::expire_in(ttl))
    }

    fn delete(&self, key: &str) -> CacheResult<()> {
        self.delete_with(key, DeleteOptions::default())
    }
}
