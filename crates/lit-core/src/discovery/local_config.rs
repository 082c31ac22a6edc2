//! Local configuration resolution

use super::choose_config_file_from_dir;
use crate::lit_config::LitConfig;
use crate::suite::TestSuite;
use crate::testing_config::TestingConfig;
use std::sync::Arc;

/// Effective config for `path_in_suite`.
///
/// Starting from the suite's root config, each level from the suite root
/// down to `path_in_suite` that has a local config file gets a clone of the
/// level above with that file applied. Levels without one share the config
/// above them, so with no local files at all this returns the suite's own
/// config (`Arc::ptr_eq`).
pub fn get_local_config(
    suite: &Arc<TestSuite>,
    lit_config: &LitConfig,
    path_in_suite: &[String],
) -> Arc<TestingConfig> {
    let mut config = Arc::clone(suite.config());

    for depth in 0..=path_in_suite.len() {
        let source_path = suite.source_path(&path_in_suite[..depth]);
        let Some(config_path) = choose_config_file_from_dir(
            lit_config.fs(),
            &source_path,
            lit_config.local_config_names(),
        ) else {
            continue;
        };

        if lit_config.is_debug() {
            lit_config.note(format!("loading local config {}", config_path.display()));
        }

        let mut local = TestingConfig::clone(&config);
        local.load_from_path(&config_path, lit_config);
        config = Arc::new(local);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Discovery;
    use crate::fs::MemoryFileSystem;
    use std::path::Path;

    fn components(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn suite_in(fs: MemoryFileSystem) -> (LitConfig, Arc<TestSuite>) {
        let lit = LitConfig::default().with_quiet(true).with_fs(Arc::new(fs));
        let suite = Discovery::new(&lit)
            .resolve_suite(Path::new("/s"))
            .suite
            .unwrap();
        (lit, suite)
    }

    #[test]
    fn test_root_without_local_config_is_shared() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/s/lit.toml", "name = \"root\"\n");
        fs.add_dir("/s/a");
        let (lit, suite) = suite_in(fs);

        let root = get_local_config(&suite, &lit, &[]);
        let a = get_local_config(&suite, &lit, &components(&["a"]));

        assert!(Arc::ptr_eq(&root, suite.config()));
        assert!(Arc::ptr_eq(&a, suite.config()));
    }

    #[test]
    fn test_override_applies_to_its_subtree_only() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/s/lit.toml", "name = \"root\"\n");
        fs.add_file("/s/a/b/lit.local.toml", "excludes = [\"skip-me\"]\n");
        fs.add_dir("/s/a/b/c");
        fs.add_dir("/s/a/sibling");
        let (lit, suite) = suite_in(fs);

        let deep = get_local_config(&suite, &lit, &components(&["a", "b", "c"]));
        let a = get_local_config(&suite, &lit, &components(&["a"]));
        let sibling = get_local_config(&suite, &lit, &components(&["a", "sibling"]));

        assert!(deep.excludes.contains("skip-me"));
        assert!(Arc::ptr_eq(&a, suite.config()));
        assert!(Arc::ptr_eq(&sibling, suite.config()));
        assert!(suite.config().excludes.is_empty());
    }

    #[test]
    fn test_nested_overrides_stack() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/s/lit.toml", "suffixes = [\".t\"]\n");
        fs.add_file("/s/lit.local.toml", "extra_excludes = [\"one\"]\n");
        fs.add_file("/s/x/lit.local.toml", "extra_excludes = [\"two\"]\nunsupported = true\n");
        let (lit, suite) = suite_in(fs);

        let root = get_local_config(&suite, &lit, &[]);
        let x = get_local_config(&suite, &lit, &components(&["x"]));

        assert!(!Arc::ptr_eq(&root, suite.config()));
        assert_eq!(root.excludes.len(), 1);
        assert_eq!(x.excludes.len(), 2);
        assert!(x.unsupported);
        assert!(!root.unsupported);
        assert_eq!(x.suffixes, vec![".t".to_string()]);
    }
}
