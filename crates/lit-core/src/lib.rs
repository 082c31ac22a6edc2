//! Test suite discovery and command execution for the lit test runner
//!
//! Discovery turns input paths into suites and the tests they contain:
//!
//! ```no_run
//! use lit_core::{find_tests_for_inputs, LitConfig};
//!
//! let lit_config = LitConfig::new("lit");
//! for (suite, tests) in find_tests_for_inputs(&lit_config, &["tests/"]).unwrap() {
//!     println!("{}: {} tests", suite.name(), tests.len());
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod exec;
pub mod format;
pub mod fs;
pub mod lit_config;
pub mod path_utils;
pub mod suite;
pub mod testing_config;

pub use discovery::{
    expand_inputs, find_tests_for_inputs, get_local_config, load_tests, try_find_tests_for_inputs,
    Discovery, DiscoveryCache, SuiteSearchResult,
};
pub use error::{DiscoveryError, DiscoveryResult, ExecError, ExecResult};
pub use exec::{execute_command, ExecOptions, RunCmdResult};
pub use format::{ExecutableFormat, SuffixFormat, TestFormat};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use lit_config::{Diagnostic, DiagnosticLevel, LitConfig, Param, SubdirWalk};
pub use suite::{Test, TestSuite};
pub use testing_config::TestingConfig;
