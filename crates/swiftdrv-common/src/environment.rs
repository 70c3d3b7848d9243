//! A handle over the process environment and working directory.
//!
//! The core never calls `std::env::var` or `std::env::current_dir`
//! directly; it goes through an [`Environment`] value so tests can supply a
//! fake one instead of depending on whatever happens to be set in the test
//! runner's process.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Environment {
    vars: FxHashMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    pub fn new(vars: FxHashMap<String, String>, cwd: PathBuf) -> Self {
        Self { vars, cwd }
    }

    /// Snapshot the real process environment and working directory.
    pub fn from_process() -> std::io::Result<Self> {
        let vars = std::env::vars().collect();
        let cwd = std::env::current_dir()?;
        Ok(Self { vars, cwd })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    pub fn is_set_and_nonempty(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn for_test(cwd: impl Into<PathBuf>) -> Self {
        Self {
            vars: FxHashMap::default(),
            cwd: cwd.into(),
        }
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonempty_check_treats_empty_as_unset() {
        let env = Environment::for_test("/tmp").with_var("SDKROOT", "");
        assert!(!env.is_set_and_nonempty("SDKROOT"));
        assert!(env.get("SDKROOT") == Some(""));
    }

    #[test]
    fn unset_var_is_none() {
        let env = Environment::for_test("/tmp");
        assert_eq!(env.get("SDKROOT"), None);
        assert!(!env.is_set_and_nonempty("SDKROOT"));
    }
}
