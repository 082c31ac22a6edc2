//! Test suites and the tests they contain

use crate::testing_config::TestingConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A directory tree governed by one suite (or site) config file.
///
/// Suites are created once per root by discovery and shared behind an `Arc`.
/// Two suites are the same suite only if they are the same allocation
/// (`Arc::ptr_eq`).
#[derive(Debug)]
pub struct TestSuite {
    name: String,
    source_root: PathBuf,
    exec_root: PathBuf,
    config: Arc<TestingConfig>,
}

impl TestSuite {
    pub fn new(
        name: impl Into<String>,
        source_root: impl Into<PathBuf>,
        exec_root: impl Into<PathBuf>,
        config: Arc<TestingConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            source_root: source_root.into(),
            exec_root: exec_root.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn exec_root(&self) -> &Path {
        &self.exec_root
    }

    /// The suite's root configuration
    pub fn config(&self) -> &Arc<TestingConfig> {
        &self.config
    }

    /// Source-side location of a path inside the suite
    pub fn source_path(&self, components: &[String]) -> PathBuf {
        join_components(&self.source_root, components)
    }

    /// Exec-side location of a path inside the suite
    pub fn exec_path(&self, components: &[String]) -> PathBuf {
        join_components(&self.exec_root, components)
    }
}

fn join_components(root: &Path, components: &[String]) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(components);
    path
}

/// A single discovered test
#[derive(Debug, Clone)]
pub struct Test {
    suite: Arc<TestSuite>,
    path_in_suite: Vec<String>,
    config: Arc<TestingConfig>,
}

impl Test {
    pub fn new(suite: Arc<TestSuite>, path_in_suite: Vec<String>, config: Arc<TestingConfig>) -> Self {
        Self {
            suite,
            path_in_suite,
            config,
        }
    }

    pub fn suite(&self) -> &Arc<TestSuite> {
        &self.suite
    }

    pub fn path_in_suite(&self) -> &[String] {
        &self.path_in_suite
    }

    /// The local configuration in effect for this test
    pub fn config(&self) -> &Arc<TestingConfig> {
        &self.config
    }

    /// `"<suite> :: a/b/c"`
    pub fn full_name(&self) -> String {
        format!("{} :: {}", self.suite.name(), self.path_in_suite.join("/"))
    }

    pub fn source_path(&self) -> PathBuf {
        self.suite.source_path(&self.path_in_suite)
    }

    pub fn exec_path(&self) -> PathBuf {
        self.suite.exec_path(&self.path_in_suite)
    }

    pub fn is_unsupported(&self) -> bool {
        self.config.unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit_config::LitConfig;

    fn suite() -> Arc<TestSuite> {
        let config = Arc::new(TestingConfig::from_defaults(&LitConfig::default()));
        Arc::new(TestSuite::new("unit", "/src/unit", "/build/unit", config))
    }

    #[test]
    fn test_suite_paths() {
        let suite = suite();
        let path = vec!["a".to_string(), "b.txt".to_string()];

        assert_eq!(suite.source_path(&path), PathBuf::from("/src/unit/a/b.txt"));
        assert_eq!(suite.exec_path(&path), PathBuf::from("/build/unit/a/b.txt"));
        assert_eq!(suite.source_path(&[]), PathBuf::from("/src/unit"));
    }

    #[test]
    fn test_full_name() {
        let suite = suite();
        let test = Test::new(
            suite.clone(),
            vec!["sub".to_string(), "t1.txt".to_string()],
            suite.config().clone(),
        );

        assert_eq!(test.full_name(), "unit :: sub/t1.txt");
        assert_eq!(test.exec_path(), PathBuf::from("/build/unit/sub/t1.txt"));
        assert!(!test.is_unsupported());
    }
}
