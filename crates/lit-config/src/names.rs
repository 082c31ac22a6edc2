//! Candidate config file names
//!
//! Each list is searched in order and the first existing file wins.

/// Default site config names
pub const DEFAULT_SITE_CONFIG_NAMES: &[&str] = &["lit.site.toml"];

/// Default suite config names
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["lit.toml"];

/// Default local config names
pub const DEFAULT_LOCAL_CONFIG_NAMES: &[&str] = &["lit.local.toml"];

/// The three ordered lists of config file names discovery looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNames {
    /// Site configs, checked before suite configs
    pub site: Vec<String>,
    /// Suite configs
    pub suite: Vec<String>,
    /// Local (per-directory override) configs
    pub local: Vec<String>,
}

impl Default for ConfigNames {
    fn default() -> Self {
        Self {
            site: to_owned(DEFAULT_SITE_CONFIG_NAMES),
            suite: to_owned(DEFAULT_CONFIG_NAMES),
            local: to_owned(DEFAULT_LOCAL_CONFIG_NAMES),
        }
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = ConfigNames::default();
        assert_eq!(names.site, vec!["lit.site.toml"]);
        assert_eq!(names.suite, vec!["lit.toml"]);
        assert_eq!(names.local, vec!["lit.local.toml"]);
    }
}
