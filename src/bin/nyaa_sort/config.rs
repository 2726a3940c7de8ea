use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use itertools::Itertools;
use serde::Deserialize;

use nyaa_sort::print_error;
use nyaa_sort::sort::{DEFAULT_EXTENSIONS, Verbosity};

use crate::NyaaSortArgs;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) path: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) backup: Option<PathBuf>,
    pub(crate) dryrun: bool,
    pub(crate) extensions: Vec<String>,
    pub(crate) overwrite: bool,
    pub(crate) verbosity: Verbosity,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct NyaaSortConfig {
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    sorted_directory: Option<PathBuf>,
    #[serde(default)]
    backup_directory: Option<PathBuf>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    overwrite: bool,
    #[serde(default)]
    quiet: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    nyaasort: NyaaSortConfig,
}

impl NyaaSortConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        nyaa_sort::config::CONFIG_PATH
            .as_deref()
            .filter(|path| path.exists())
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| {
                Self::from_toml_str(&config_string)
                    .map_err(|e| {
                        print_error!("{e}");
                    })
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.nyaasort)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: NyaaSortArgs) -> Self {
        Self::from_parts(args, NyaaSortConfig::get_user_config())
    }

    fn from_parts(args: NyaaSortArgs, user_config: NyaaSortConfig) -> Self {
        let mut extensions: Vec<String> = user_config
            .extensions
            .into_iter()
            .chain(args.extension)
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unique()
            .collect();
        if extensions.is_empty() {
            extensions = DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect();
        }

        // CLI flags win over the config file, quiet only applies if nothing asks for more output
        let verbosity = if args.debug || user_config.debug {
            Verbosity::Debug
        } else if args.verbose || (user_config.verbose && !args.quiet) {
            Verbosity::Verbose
        } else if args.quiet || user_config.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };

        Self {
            path: args.path.or(user_config.directory).and_then(normalize_path),
            output: args.output.or(user_config.sorted_directory).and_then(normalize_path),
            backup: args.backup.or(user_config.backup_directory).and_then(normalize_path),
            dryrun: args.print || user_config.dryrun,
            extensions,
            overwrite: args.force || user_config.overwrite,
            verbosity,
        }
    }
}

/// Drop blank paths and expand a leading `~` to the home directory.
///
/// A blank path means "not set", so it must not fall through to the current directory.
fn normalize_path(path: PathBuf) -> Option<PathBuf> {
    let text = path.to_str().map(str::trim);
    if text.is_some_and(str::is_empty) || path.as_os_str().is_empty() {
        return None;
    }
    let expanded = match text {
        Some("~") => dirs::home_dir(),
        Some(text) => text
            .strip_prefix("~/")
            .and_then(|rest| dirs::home_dir().map(|home| home.join(rest))),
        None => None,
    };
    Some(expanded.unwrap_or(path))
}

#[cfg(test)]
mod nyaasort_config_tests {
    use super::*;

    use clap::Parser;

    fn args(arguments: &[&str]) -> NyaaSortArgs {
        NyaaSortArgs::try_parse_from(std::iter::once("test").chain(arguments.iter().copied())).expect("should parse")
    }

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = NyaaSortConfig::from_toml_str("").expect("should parse empty config");
        assert!(config.directory.is_none());
        assert!(config.sorted_directory.is_none());
        assert!(config.backup_directory.is_none());
        assert!(!config.debug);
        assert!(!config.dryrun);
        assert!(!config.overwrite);
        assert!(!config.quiet);
        assert!(!config.verbose);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn from_toml_str_parses_nyaasort_section() {
        let toml = r#"
[nyaasort]
directory = "/downloads"
sorted_directory = "/anime"
backup_directory = "/backup"
extensions = ["mkv", "mp4"]
dryrun = true
overwrite = true
verbose = true
"#;
        let config = NyaaSortConfig::from_toml_str(toml).expect("should parse config");
        assert_eq!(config.directory, Some(PathBuf::from("/downloads")));
        assert_eq!(config.sorted_directory, Some(PathBuf::from("/anime")));
        assert_eq!(config.backup_directory, Some(PathBuf::from("/backup")));
        assert_eq!(config.extensions, vec!["mkv", "mp4"]);
        assert!(config.dryrun);
        assert!(config.overwrite);
        assert!(config.verbose);
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        let result = NyaaSortConfig::from_toml_str("this is not valid toml {{{");
        assert!(result.is_err());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[other_section]
some_value = true

[nyaasort]
quiet = true
";
        let config = NyaaSortConfig::from_toml_str(toml).expect("should parse config");
        assert!(config.quiet);
        assert!(!config.verbose);
    }

    #[test]
    fn cli_paths_override_config_paths() {
        let user_config = NyaaSortConfig {
            directory: Some(PathBuf::from("/downloads")),
            sorted_directory: Some(PathBuf::from("/anime")),
            ..Default::default()
        };
        let config = Config::from_parts(args(&["/other", "-b", "/backup"]), user_config);
        assert_eq!(config.path, Some(PathBuf::from("/other")));
        assert_eq!(config.output, Some(PathBuf::from("/anime")));
        assert_eq!(config.backup, Some(PathBuf::from("/backup")));
    }

    #[test]
    fn blank_config_paths_are_unset() {
        let user_config = NyaaSortConfig {
            directory: Some(PathBuf::from("")),
            sorted_directory: Some(PathBuf::from("   ")),
            backup_directory: Some(PathBuf::from("")),
            ..Default::default()
        };
        let config = Config::from_parts(args(&[]), user_config);
        assert_eq!(config.path, None);
        assert_eq!(config.output, None);
        assert_eq!(config.backup, None);
    }

    #[test]
    fn sample_config_fixture_has_no_backup() {
        let user_config = NyaaSortConfig::from_toml_str(include_str!("../../../tests/fixtures/sample_config.toml"))
            .expect("should parse sample config");
        let config = Config::from_parts(args(&[]), user_config);
        assert!(config.backup.is_none());
        assert!(config.path.is_some());
        assert!(config.output.is_some());
    }

    #[test]
    fn home_prefix_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let user_config = NyaaSortConfig {
            directory: Some(PathBuf::from("~/Downloads/anime")),
            sorted_directory: Some(PathBuf::from("~")),
            ..Default::default()
        };
        let config = Config::from_parts(args(&["-b", "/mnt/backup"]), user_config);
        assert_eq!(config.path, Some(home.join("Downloads/anime")));
        assert_eq!(config.output, Some(home));
        assert_eq!(config.backup, Some(PathBuf::from("/mnt/backup")));
    }

    #[test]
    fn extensions_are_merged_and_normalized() {
        let user_config = NyaaSortConfig {
            extensions: vec!["mkv".to_string(), ".MP4".to_string()],
            ..Default::default()
        };
        let config = Config::from_parts(args(&["-t", "mp4", "-t", "avi"]), user_config);
        assert_eq!(config.extensions, vec!["mkv", "mp4", "avi"]);
    }

    #[test]
    fn default_extension_is_mkv() {
        let config = Config::from_parts(args(&[]), NyaaSortConfig::default());
        assert_eq!(config.extensions, vec!["mkv"]);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(!config.dryrun);
    }

    #[test]
    fn verbosity_from_flags_and_config() {
        let config = Config::from_parts(args(&["-q"]), NyaaSortConfig::default());
        assert_eq!(config.verbosity, Verbosity::Quiet);

        let user_config = NyaaSortConfig {
            verbose: true,
            ..Default::default()
        };
        let config = Config::from_parts(args(&[]), user_config);
        assert_eq!(config.verbosity, Verbosity::Verbose);

        let user_config = NyaaSortConfig {
            verbose: true,
            ..Default::default()
        };
        let config = Config::from_parts(args(&["-q"]), user_config);
        assert_eq!(config.verbosity, Verbosity::Quiet);

        let config = Config::from_parts(args(&["-D"]), NyaaSortConfig::default());
        assert_eq!(config.verbosity, Verbosity::Debug);
    }
}
