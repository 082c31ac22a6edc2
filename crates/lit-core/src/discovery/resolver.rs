//! Suite resolution
//!
//! A directory belongs to the nearest enclosing directory that holds a site
//! or suite config. Every directory visited on the way up is cached, so a
//! later lookup anywhere on that path costs one canonicalization.

use super::{dir_contains_test_suite, Discovery, SuiteSearchResult};
use crate::suite::TestSuite;
use crate::testing_config::TestingConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl<'a> Discovery<'a> {
    /// Find the suite owning `dir` and the components from its root to `dir`.
    ///
    /// Returns [`SuiteSearchResult::not_found`] (with no components) when no
    /// directory up to the filesystem root has a config.
    pub fn resolve_suite(&mut self, dir: &Path) -> SuiteSearchResult {
        let lit_config = self.lit_config;
        let fs = lit_config.fs();
        let mut current = fs.canonicalize(dir);
        // Directories below the answer, innermost first, with their basenames.
        let mut pending: Vec<(PathBuf, String)> = Vec::new();

        let mut result = loop {
            if let Some(hit) = self.cache.get(&current) {
                break hit.clone();
            }

            if let Some(config_path) = dir_contains_test_suite(&current, lit_config) {
                let suite = self.load_suite(&current, config_path);
                break self
                    .cache
                    .insert(current, SuiteSearchResult::found(suite, Vec::new()));
            }

            // The filesystem root ends the walk.
            let (Some(parent), Some(base)) = (
                current.parent().map(Path::to_path_buf),
                current
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned()),
            ) else {
                break self.cache.insert(current, SuiteSearchResult::not_found());
            };
            pending.push((current, base));
            current = parent;
        };

        while let Some((dir, base)) = pending.pop() {
            if result.is_found() {
                result.path_in_suite.push(base);
            }
            result = self.cache.insert(dir, result);
        }
        result
    }

    /// Find the suite containing `item`, which may name a file or a path
    /// that does not exist.
    ///
    /// Relative items are taken from the current directory. Trailing
    /// components that are not directories are carried into the returned
    /// path-in-suite.
    pub fn get_test_suite(&mut self, item: &Path) -> SuiteSearchResult {
        let lit_config = self.lit_config;
        let fs = lit_config.fs();
        let cwd = fs.current_dir().unwrap_or_default();
        let item = fs.canonicalize(&cwd.join(item));

        let mut components = Vec::new();
        let mut current = item.as_path();
        while !fs.is_dir(current) {
            match (current.parent(), current.file_name()) {
                (Some(parent), Some(base)) => {
                    components.push(base.to_string_lossy().into_owned());
                    current = parent;
                }
                _ => return SuiteSearchResult::not_found(),
            }
        }
        components.reverse();

        let mut result = self.resolve_suite(current);
        if result.is_found() {
            result.path_in_suite.extend(components);
        }
        result
    }

    /// Create the suite rooted at `dir` from the config at `config_path`
    fn load_suite(&self, dir: &Path, config_path: PathBuf) -> Arc<TestSuite> {
        let lit_config = self.lit_config;
        let mut config_path = config_path;

        if let Some(config_map) = lit_config.config_map() {
            let canonical = lit_config.fs().canonicalize(&config_path);
            config_path = match config_map.get(canonical.to_string_lossy().as_ref()) {
                Some(target) => PathBuf::from(target),
                None => canonical,
            };
        }

        if lit_config.is_debug() {
            lit_config.note(format!("loading suite config {}", config_path.display()));
        }

        let mut config = TestingConfig::from_defaults(lit_config);
        config.load_from_path(&config_path, lit_config);

        let source_root = config
            .test_source_root
            .clone()
            .unwrap_or_else(|| dir.to_path_buf());
        let exec_root = config
            .test_exec_root
            .clone()
            .unwrap_or_else(|| dir.to_path_buf());

        Arc::new(TestSuite::new(
            config.name.clone(),
            source_root,
            exec_root,
            Arc::new(config),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::lit_config::LitConfig;
    use std::collections::BTreeMap;

    fn lit_with(fs: &Arc<MemoryFileSystem>) -> LitConfig {
        LitConfig::default().with_quiet(true).with_fs(fs.clone())
    }

    #[test]
    fn test_resolve_suite_root() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "name = \"root\"\n");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let result = discovery.resolve_suite(Path::new("/s"));
        let suite = result.suite.unwrap();
        assert_eq!(suite.name(), "root");
        assert_eq!(suite.source_root(), Path::new("/s"));
        assert_eq!(suite.exec_root(), Path::new("/s"));
        assert!(result.path_in_suite.is_empty());
    }

    #[test]
    fn test_descendant_shares_suite() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "name = \"root\"\n");
        fs.add_dir("/s/a/b/c");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let deep = discovery.resolve_suite(Path::new("/s/a/b/c"));
        let root = discovery.resolve_suite(Path::new("/s"));

        assert!(Arc::ptr_eq(deep.suite.as_ref().unwrap(), root.suite.as_ref().unwrap()));
        assert_eq!(deep.path_in_suite, vec!["a", "b", "c"]);
        assert_eq!(discovery.cache().len(), 4);
    }

    #[test]
    fn test_no_suite_has_no_components() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_dir("/x/y");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let result = discovery.resolve_suite(Path::new("/x/y"));
        assert!(result.suite.is_none());
        assert!(result.path_in_suite.is_empty());
    }

    #[test]
    fn test_resolve_suite_is_memoized() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "");
        fs.add_dir("/s/a/b");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let first = discovery.resolve_suite(Path::new("/s/a/b"));
        let checks = fs.stats();
        let second = discovery.resolve_suite(Path::new("/s/./a/b"));
        let middle = discovery.resolve_suite(Path::new("/s/a"));

        assert_eq!(fs.stats(), checks);
        assert_eq!(fs.stats().read_to_string, 1);
        assert!(Arc::ptr_eq(first.suite.as_ref().unwrap(), second.suite.as_ref().unwrap()));
        assert_eq!(second.path_in_suite, vec!["a", "b"]);
        assert_eq!(middle.path_in_suite, vec!["a"]);
    }

    #[test]
    fn test_declared_roots_override_directory() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file(
            "/build/s/lit.site.toml",
            "name = \"site\"\ntest_source_root = \"/src/s\"\n",
        );
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let suite = discovery
            .resolve_suite(Path::new("/build/s"))
            .suite
            .unwrap();
        assert_eq!(suite.source_root(), Path::new("/src/s"));
        assert_eq!(suite.exec_root(), Path::new("/build/s"));
    }

    #[test]
    fn test_config_map_redirects_load() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "name = \"original\"\n");
        fs.add_file("/elsewhere/lit.toml", "name = \"mapped\"\n");
        let lit = lit_with(&fs).with_config_map(BTreeMap::from([(
            "/s/lit.toml".to_string(),
            "/elsewhere/lit.toml".to_string(),
        )]));
        let mut discovery = Discovery::new(&lit);

        let suite = discovery.resolve_suite(Path::new("/s")).suite.unwrap();
        assert_eq!(suite.name(), "mapped");
        assert_eq!(suite.source_root(), Path::new("/s"));
    }

    #[test]
    fn test_get_test_suite_for_file_and_virtual_path() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "");
        fs.add_file("/s/sub/t1.txt", "");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let file = discovery.get_test_suite(Path::new("/s/sub/t1.txt"));
        assert_eq!(file.path_in_suite, vec!["sub", "t1.txt"]);

        let virtual_path = discovery.get_test_suite(Path::new("/s/sub/t1.txt/case-3"));
        assert_eq!(virtual_path.path_in_suite, vec!["sub", "t1.txt", "case-3"]);
    }

    #[test]
    fn test_get_test_suite_relative_to_cwd() {
        let fs = Arc::new(MemoryFileSystem::new().with_current_dir("/s/sub"));
        fs.add_file("/s/lit.toml", "");
        let lit = lit_with(&fs);
        let mut discovery = Discovery::new(&lit);

        let result = discovery.get_test_suite(Path::new("./t2.txt"));
        assert!(result.is_found());
        assert_eq!(result.path_in_suite, vec!["sub", "t2.txt"]);
    }
}
