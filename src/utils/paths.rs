use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const HOME_ENV: &str = "CARTERA_HOME";
const DEFAULT_DIR_NAME: &str = ".cartera";
const STORE_DIR: &str = "store";
const SECURE_DIR: &str = "secure";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";

/// Returns the application data directory: `$CARTERA_HOME`, else `~/.cartera`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Layout of the files kept below a data directory.
pub struct PathResolver;

impl PathResolver {
    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(app_data_dir)
    }

    /// Directory holding one JSON document per collection key.
    pub fn store_dir_in(base: &Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn secure_dir_in(base: &Path) -> PathBuf {
        base.join(SECURE_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn export_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_base() {
        let base = PathBuf::from("/tmp/cartera-layout");
        assert_eq!(
            PathResolver::config_file_in(&base),
            base.join("config").join("config.json")
        );
        assert_eq!(PathResolver::store_dir_in(&base), base.join("store"));
        assert_eq!(PathResolver::secure_dir_in(&base), base.join("secure"));
        assert_eq!(
            PathResolver::resolve_base(Some(base.clone())),
            base
        );
    }
}
