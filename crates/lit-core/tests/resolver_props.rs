use lit_core::{Discovery, LitConfig, MemoryFileSystem};
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

const PROPTEST_CASES: u32 = 128;

fn arb_components() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..6)
}

fn under(root: &str, components: &[String]) -> PathBuf {
    let mut path = PathBuf::from(root);
    path.extend(components);
    path
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn descendants_share_the_root_suite(components in arb_components()) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "name = \"root\"\n");
        let dir = under("/s", &components);
        fs.add_dir(&dir);
        let lit = LitConfig::default().with_quiet(true).with_fs(fs.clone());
        let mut discovery = Discovery::new(&lit);

        let deep = discovery.resolve_suite(&dir);
        let root = discovery.resolve_suite(&PathBuf::from("/s"));

        prop_assert!(Arc::ptr_eq(deep.suite.as_ref().unwrap(), root.suite.as_ref().unwrap()));
        prop_assert_eq!(deep.path_in_suite, components);
        prop_assert!(root.path_in_suite.is_empty());
    }

    #[test]
    fn no_config_means_no_suite(components in arb_components()) {
        let fs = Arc::new(MemoryFileSystem::new());
        let dir = under("/x", &components);
        fs.add_dir(&dir);
        let lit = LitConfig::default().with_quiet(true).with_fs(fs.clone());
        let mut discovery = Discovery::new(&lit);

        let result = discovery.resolve_suite(&dir);
        prop_assert!(result.suite.is_none());
        prop_assert!(result.path_in_suite.is_empty());
    }

    #[test]
    fn repeated_lookups_touch_the_filesystem_once(components in arb_components()) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.add_file("/s/lit.toml", "");
        let dir = under("/s", &components);
        fs.add_dir(&dir);
        let lit = LitConfig::default().with_quiet(true).with_fs(fs.clone());
        let mut discovery = Discovery::new(&lit);

        let first = discovery.resolve_suite(&dir);
        let stats = fs.stats();
        let cached = discovery.cache().len();
        let second = discovery.resolve_suite(&dir);

        prop_assert_eq!(fs.stats(), stats);
        prop_assert_eq!(discovery.cache().len(), cached);
        prop_assert!(Arc::ptr_eq(first.suite.as_ref().unwrap(), second.suite.as_ref().unwrap()));
        prop_assert_eq!(first.path_in_suite, second.path_in_suite);
    }
}
