//! Request identity inside a bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Normalized identity of a cached request: method plus absolute URL.
///
/// The query string is part of the identity; `MatchOptions::ignore_query`
/// drops it on both sides at lookup time instead of here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    method: String,
    url: String,
}

impl CacheKey {
    pub fn new(method: &str, url: &Url) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
        }
    }

    /// GET identity for a URL, the common case for precached assets.
    pub fn get(url: &Url) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The same identity with the query string removed.
    pub fn without_query(&self) -> Self {
        let url = match self.url.split_once('?') {
            Some((head, _)) => head.to_string(),
            None => self.url.clone(),
        };
        Self {
            method: self.method.clone(),
            url,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
