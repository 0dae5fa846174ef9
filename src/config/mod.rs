use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::WalletError,
    storage::{MissingFilePolicy, ParsePolicy},
};

const DEFAULT_DIR_NAME: &str = ".wallet_core";
const HOME_ENV: &str = "WALLET_CORE_HOME";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Directory used for export and import when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dump_dir: Option<PathBuf>,
    #[serde(default)]
    pub parse_policy: ParsePolicy,
    #[serde(default)]
    pub missing_files: MissingFilePolicy,
}

/// Returns the application data directory, defaulting to `~/.wallet_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, WalletError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, WalletError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, WalletError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), WalletError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.parse_policy, ParsePolicy::Strict);
        assert_eq!(config.missing_files, MissingFilePolicy::Skip);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("nested")).unwrap();
        let config = Config {
            dump_dir: Some(dir.path().join("dumps")),
            parse_policy: ParsePolicy::Lenient,
            missing_files: MissingFilePolicy::Fail,
        };
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "parse_policy": "lenient" }"#).unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.parse_policy, ParsePolicy::Lenient);
        assert_eq!(config.dump_dir, None);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(WalletError::Config(_))));
    }
}
