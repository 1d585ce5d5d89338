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

/// Per-call options of `get`. Nothing to configure yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {}

/// Per-call options of `set`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Entry lifetime, `None` or zero stores without expiration
    pub expiration: Option<Duration>,
}

impl SetOptions {
    pub fn expire_in(ttl: Duration) -> Self {
        Self::default().with_expiration(ttl)
    }

    pub fn with_expiration(mut self, ttl: Duration) -> Self {
        self.expiration = Some(ttl);
        self
    }

    /// The expiration to apply, zero counts as none.
    pub fn ttl(&self) -> Option<Duration> {
        self.expiration.filter(|ttl| !ttl.is_zero())
    }
}

/// Per-call options of `delete`. Nothing to configure yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_expiration_means_none() {
        assert_eq!(SetOptions::default().ttl(), None);
        assert_eq!(SetOptions::expire_in(Duration::ZERO).ttl(), None);
        assert_eq!(
            SetOptions::expire_in(Duration::from_secs(5)).ttl(),
            Some(Duration::from_secs(5))
        );
    }
}
