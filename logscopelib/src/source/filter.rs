//! Log file discovery with glob pattern support.
//!
//! Expands a directory into the access logs it contains, with optional
//! include/exclude glob patterns.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::LogscopeError;
use crate::Result;

/// Configuration for file filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Glob patterns to include (if empty, include every log file)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl FilterConfig {
    /// Create a new empty filter config (includes all log files).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// Without include patterns only log-looking names are accepted
    /// (`access.log`, `access.log.1`). With include patterns, any path that
    /// matches one of them is accepted. Exclude patterns always win.
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        if self.include.is_empty() {
            return path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_log_file_name);
        }

        self.include.iter().any(|p| p.matches(&path_str))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| LogscopeError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// `*.log`, or a numbered rotation such as `*.log.3`.
fn is_log_file_name(name: &str) -> bool {
    if name.ends_with(".log") {
        return true;
    }
    match name.rsplit_once(".log.") {
        Some((stem, suffix)) => {
            !stem.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Hidden directories are never searched.
fn should_skip_dir(name: &str) -> bool {
    name.starts_with('.')
}

/// Discover log files under a path.
///
/// A file path is returned as-is when it passes the filter. A directory is
/// walked recursively and every matching file is returned, sorted.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(LogscopeError::PathNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();

    if root.is_file() {
        if filter.matches(root) {
            files.push(root.to_path_buf());
        }
        return Ok(files);
    }

    let walker = WalkDir::new(root).follow_links(true).into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        if e.file_type().is_dir() {
            let name = e.file_name().to_str().unwrap_or("");
            return !should_skip_dir(name);
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();

        if path.is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("nginx")).unwrap();
        fs::create_dir_all(dir.join("apache/old")).unwrap();
        fs::create_dir_all(dir.join(".cache")).unwrap();

        fs::write(dir.join("nginx/access.log"), "").unwrap();
        fs::write(dir.join("nginx/access.log.1"), "").unwrap();
        fs::write(dir.join("nginx/access.log.2.gz"), "").unwrap();
        fs::write(dir.join("apache/access_log.txt"), "").unwrap();
        fs::write(dir.join("apache/old/access.log"), "").unwrap();
        fs::write(dir.join(".cache/stale.log"), "").unwrap();
        fs::write(dir.join("README.md"), "# Readme").unwrap();
    }

    #[test]
    fn test_filter_matches_log_files() {
        let filter = FilterConfig::new();

        assert!(filter.matches(Path::new("/var/log/nginx/access.log")));
        assert!(filter.matches(Path::new("error.log")));
        assert!(filter.matches(Path::new("access.log.12")));
        assert!(!filter.matches(Path::new("access.log.2.gz")));
        assert!(!filter.matches(Path::new("README.md")));
        assert!(!filter.matches(Path::new(".log.1")));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("**/*.txt").unwrap();

        assert!(filter.matches(Path::new("apache/access_log.txt")));
        assert!(!filter.matches(Path::new("nginx/access.log")));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/old/**").unwrap();

        assert!(filter.matches(Path::new("apache/access.log")));
        assert!(!filter.matches(Path::new("apache/old/access.log")));
    }

    #[test]
    fn test_filter_with_multiple_patterns() {
        let filter = FilterConfig::new()
            .include_many(&["**/nginx/**", "**/apache/**"])
            .unwrap()
            .exclude_many(&["**/*.gz"])
            .unwrap();

        assert!(filter.matches(Path::new("logs/nginx/access.log")));
        assert!(filter.matches(Path::new("logs/apache/access_log.txt")));
        assert!(!filter.matches(Path::new("logs/nginx/access.log.2.gz")));
        assert!(!filter.matches(Path::new("logs/haproxy/access.log")));
    }

    #[test]
    fn test_discover_files() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let files = discover_files(temp.path(), &FilterConfig::new()).unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|p| p.ends_with("nginx/access.log")));
        assert!(files.iter().any(|p| p.ends_with("nginx/access.log.1")));
        assert!(files.iter().any(|p| p.ends_with("apache/old/access.log")));
        assert!(!files
            .iter()
            .any(|p| p.to_string_lossy().contains(".cache")));

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_discover_files_with_filter() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let filter = FilterConfig::new().exclude("**/old/**").unwrap();
        let files = discover_files(temp.path(), &filter).unwrap();

        assert_eq!(files.len(), 2);
        assert!(!files.iter().any(|p| p.ends_with("apache/old/access.log")));
    }

    #[test]
    fn test_discover_single_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("site.log");
        fs::write(&file_path, "").unwrap();

        let files = discover_files(&file_path, &FilterConfig::new()).unwrap();

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn test_discover_files_nonexistent() {
        let result = discover_files("/nonexistent/path", &FilterConfig::new());

        assert!(matches!(result, Err(LogscopeError::PathNotFound(_))));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");

        if let Err(LogscopeError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }
}
