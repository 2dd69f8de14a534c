//! Configuration loading.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use slot_engine::DstPolicy;

/// CLI configuration.
///
/// Sources, lowest precedence first: built-in defaults, the user config file
/// (`<config dir>/slot-engine/config.toml`), the file given with `--config`,
/// then `SLOTS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How window boundaries inside a DST gap are resolved.
    pub dst_policy: DstPolicy,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// `tracing` filter used when neither `RUST_LOG` nor `--verbose` is set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dst_policy: DstPolicy::default(),
            pretty: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("SLOTS_"));

        figment.extract()
    }
}

/// Platform-specific config directory for the CLI.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slot-engine"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_shift_forward_and_pretty_print() {
        let config = Config::default();
        assert_eq!(config.dst_policy, DstPolicy::ShiftForward);
        assert!(config.pretty);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dst_policy = \"skip\"\npretty = false").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.dst_policy, DstPolicy::Skip);
        assert!(!config.pretty);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn config_dir_ends_with_crate_name() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "slot-engine");
        }
    }
}
