// Package scope derives the worker's in-scope base path from its
// registration scope.

use thiserror::Error;
use tracing::warn;
use url::Url;

#[cfg(test)]
mod scope_test;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("entry {entry:?} resolves outside the worker scope")]
    OutOfScope { entry: String },
    #[error("entry {entry:?} cannot be resolved without a parseable scope")]
    Unresolvable { entry: String },
}

/// In-scope root derived from the worker registration scope.
///
/// Keeps the scope origin plus a directory path ending with exactly one `/`.
/// A scope that fails to parse degrades to a permissive base that treats
/// every URL as in-scope, so a bad scope never blocks installation.
#[derive(Debug, Clone)]
pub struct BasePath {
    base: Option<Url>,
    path: String,
}

impl BasePath {
    /// Derives the base from a scope URL string.
    pub fn from_scope(scope: &str) -> Self {
        match Url::parse(scope) {
            Ok(url) => {
                let path = dir_path(url.path());
                let mut base = url;
                base.set_path(&path);
                base.set_query(None);
                base.set_fragment(None);
                Self {
                    base: Some(base),
                    path,
                }
            }
            Err(e) => {
                warn!(
                    component = "scope",
                    event = "scope_unparsable",
                    scope = scope,
                    error = %e,
                    "falling back to permissive base path"
                );
                Self::permissive()
            }
        }
    }

    /// Base that treats every URL as in-scope.
    pub fn permissive() -> Self {
        Self {
            base: None,
            path: "/".to_string(),
        }
    }

    /// The directory path, always ending with a single `/`.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The scope root as an absolute URL, when the scope was parseable.
    pub fn root_url(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Whether a URL falls under this base: same origin, path under the
    /// directory.
    pub fn contains(&self, url: &Url) -> bool {
        match &self.base {
            None => true,
            Some(base) => base.origin() == url.origin() && url.path().starts_with(&self.path),
        }
    }

    /// Resolves a manifest entry against the base.
    ///
    /// Absolute entries are accepted as-is when they fall inside the scope.
    /// The empty entry resolves to the scope root, the directory index.
    pub fn resolve(&self, entry: &str) -> Result<Url, ScopeError> {
        if let Ok(url) = Url::parse(entry) {
            return if self.contains(&url) {
                Ok(url)
            } else {
                Err(ScopeError::OutOfScope {
                    entry: entry.to_string(),
                })
            };
        }

        let base = self.base.as_ref().ok_or_else(|| ScopeError::Unresolvable {
            entry: entry.to_string(),
        })?;
        let url = base
            .join(entry.trim_start_matches('/'))
            .map_err(|_| ScopeError::Unresolvable {
                entry: entry.to_string(),
            })?;

        if self.contains(&url) {
            Ok(url)
        } else {
            Err(ScopeError::OutOfScope {
                entry: entry.to_string(),
            })
        }
    }
}

/// Trims a URL path to a directory path with exactly one trailing separator.
fn dir_path(path: &str) -> String {
    let mut dir = if path.ends_with('/') {
        path.to_string()
    } else {
        match path.rfind('/') {
            Some(idx) => path[..=idx].to_string(),
            None => "/".to_string(),
        }
    };
    while dir.ends_with("//") {
        dir.pop();
    }
    if dir.is_empty() {
        dir.push('/');
    }
    dir
}
