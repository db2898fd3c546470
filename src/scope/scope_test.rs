#[cfg(test)]
mod tests {
    use url::Url;

    use crate::scope::BasePath;

    /// Test that a directory scope keeps a single trailing separator.
    #[test]
    fn test_directory_scope() {
        let base = BasePath::from_scope("https://example.com/app/");
        assert_eq!(base.as_str(), "/app/");
    }

    /// Test that a scope ending in a file is trimmed to its directory.
    #[test]
    fn test_file_scope_trims_to_directory() {
        let base = BasePath::from_scope("https://example.com/app/worker.js");
        assert_eq!(base.as_str(), "/app/");
    }

    #[test]
    fn test_root_scope() {
        let base = BasePath::from_scope("https://example.com/");
        assert_eq!(base.as_str(), "/");
    }

    #[test]
    fn test_double_trailing_separator_collapses() {
        let base = BasePath::from_scope("https://example.com/app//");
        assert_eq!(base.as_str(), "/app/");
    }

    /// Test that an unparsable scope falls back to treating everything as
    /// in-scope instead of failing.
    #[test]
    fn test_unparsable_scope_is_permissive() {
        let base = BasePath::from_scope("not a url");
        assert!(base.root_url().is_none());

        let anywhere = Url::parse("https://anything.example/x/y").unwrap();
        assert!(base.contains(&anywhere));
    }

    #[test]
    fn test_contains_requires_same_origin_and_path_prefix() {
        let base = BasePath::from_scope("https://example.com/app/");

        let same = Url::parse("https://example.com/app/icon.png").unwrap();
        let sibling = Url::parse("https://example.com/other/icon.png").unwrap();
        let foreign = Url::parse("https://cdn.example.net/app/icon.png").unwrap();

        assert!(base.contains(&same));
        assert!(!base.contains(&sibling));
        assert!(!base.contains(&foreign));
    }

    #[test]
    fn test_resolve_relative_entries() {
        let base = BasePath::from_scope("https://example.com/app/");

        assert_eq!(base.resolve("").unwrap().as_str(), "https://example.com/app/");
        assert_eq!(
            base.resolve("index.html").unwrap().as_str(),
            "https://example.com/app/index.html"
        );
        assert_eq!(
            base.resolve("/index.html").unwrap().as_str(),
            "https://example.com/app/index.html"
        );
    }

    /// Test that entries escaping the scope are a configuration error.
    #[test]
    fn test_resolve_rejects_escaping_entries() {
        let base = BasePath::from_scope("https://example.com/app/");

        assert!(base.resolve("../outside.html").is_err());
        assert!(base.resolve("https://cdn.example.net/x.js").is_err());
    }

    #[test]
    fn test_resolve_accepts_absolute_in_scope() {
        let base = BasePath::from_scope("https://example.com/app/");
        assert!(base.resolve("https://example.com/app/deep/x.js").is_ok());
    }

    #[test]
    fn test_resolve_relative_without_scope_fails() {
        let base = BasePath::permissive();
        assert!(base.resolve("index.html").is_err());
        assert!(base.resolve("https://anything.example/x.js").is_ok());
    }
}
