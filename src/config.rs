use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "NYAA_SORT_CONFIG";

/// Path to the user config file.
///
/// Uses `$NYAA_SORT_CONFIG` if set, otherwise `$HOME/.config/nyaa-sort.toml`.
/// Returns `None` if neither is available.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});
