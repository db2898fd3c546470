//! Intercepted request model and routing classification.

use url::Url;

use crate::model::CacheKey;
use crate::scope::BasePath;

/// A request intercepted by the worker.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: String,
    pub url: Url,
    /// Top-level page load (the platform's navigate mode).
    pub navigation: bool,
}

impl FetchRequest {
    pub fn new(method: &str, url: Url) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url,
            navigation: false,
        }
    }

    /// Plain GET for a static asset.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// Top-level navigation GET.
    pub fn navigate(url: Url) -> Self {
        let mut request = Self::new("GET", url);
        request.navigation = true;
        request
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Cache identity for this request.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.method, &self.url)
    }
}

/// Routing class assigned to every intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    Navigation,
    StaticAsset,
    OutOfScope,
    NonGet,
}

/// Classifies a request against the worker base path.
///
/// Only `Navigation` and `StaticAsset` are handled by the controller; the
/// other two are left to default handling.
pub fn classify(request: &FetchRequest, base: &BasePath) -> RequestClass {
    if !request.is_get() {
        return RequestClass::NonGet;
    }
    if !base.contains(&request.url) {
        return RequestClass::OutOfScope;
    }
    if request.navigation {
        RequestClass::Navigation
    } else {
        RequestClass::StaticAsset
    }
}
