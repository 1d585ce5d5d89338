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

//! Redis backed cache adapter for CRUD frameworks.
//!
//! [`RemoteCache`] and [`AsyncRemoteCache`] expose `get` / `set` / `delete` over a remote
//! key-value store. Keys are prefixed, values go through a pluggable [`Codec`] (JSON by
//! default) and connections come from an r2d2 or deadpool pool, or from any
//! [`KeyValueStore`] / [`AsyncKeyValueStore`] supplied by the caller.

mod cache;
mod codec;
mod config;
mod connection;
mod errors;
mod options;
mod util;

pub use cache::*;
pub use codec::*;
pub use config::*;
pub use connection::*;
pub use errors::*;
pub use options::*;
