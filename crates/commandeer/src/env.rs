//! Environment abstraction for testability.
//!
//! Options declared with [`Opt::env`](crate::Opt::env) read their fallback
//! through an [`EnvReader`], so tests can supply variables without touching
//! the process environment.

use std::collections::HashMap;

/// Abstraction over environment variables.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value.
    fn var(&self, name: &str) -> Option<String>;
}

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the mock environment.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_mock_env() {
        let env = MockEnv::new().with_var("PORT", "8080").with_var("EMPTY", "");
        assert_eq!(env.var("PORT"), Some("8080".to_string()));
        assert_eq!(env.var("EMPTY"), Some(String::new()));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    #[serial]
    fn test_real_env() {
        std::env::set_var("COMMANDEER_TEST_REAL_ENV", "yes");
        assert_eq!(RealEnv.var("COMMANDEER_TEST_REAL_ENV"), Some("yes".to_string()));
        std::env::remove_var("COMMANDEER_TEST_REAL_ENV");
        assert_eq!(RealEnv.var("COMMANDEER_TEST_REAL_ENV"), None);
    }
}
