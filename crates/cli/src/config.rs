use anyhow::{Context, Result};
use cardwise_engine::RecommendationEngine;
use cardwise_wallet::{MerchantDirectory, Wallet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Wallet file with the user's `[[cards]]`.
    pub wallet: Option<PathBuf>,
    /// Merchant directory with `[[merchants]]`.
    pub merchants: Option<PathBuf>,
    #[serde(flatten)]
    pub engine: RecommendationEngine,
}

/// `<config dir>/cardwise/config.toml` on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cardwise", "Cardwise")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Loads the config at `path`, or the default location. A missing file
/// means defaults; a malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };
    if !p.exists() {
        tracing::debug!("no config at {}, using defaults", p.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let config: Config =
        toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    config
        .engine
        .validate()
        .with_context(|| format!("invalid config {}", p.display()))?;
    Ok(config)
}

/// Wallet from the explicit path, else the one named in the config.
/// No wallet at all is an empty wallet.
pub fn load_wallet(explicit: Option<&Path>, config: &Config) -> Result<Wallet> {
    let Some(p) = explicit.or(config.wallet.as_deref()) else {
        return Ok(Wallet::new());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read wallet {}", p.display()))?;
    Wallet::from_toml(&s).with_context(|| format!("parse wallet {}", p.display()))
}

/// Merchant directory from the explicit path, else the one named in the
/// config. None configured is an empty directory.
pub fn load_directory(explicit: Option<&Path>, config: &Config) -> Result<MerchantDirectory> {
    let Some(p) = explicit.or(config.merchants.as_deref()) else {
        return Ok(MerchantDirectory::default());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read merchants {}", p.display()))?;
    MerchantDirectory::from_toml(&s).with_context(|| format!("parse merchants {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(config.wallet.is_none());
        assert_eq!(config.engine, RecommendationEngine::default());
    }

    #[test]
    fn config_overrides_mapping_and_names_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "config.toml",
            r#"
            wallet = "/tmp/wallet.toml"
            merchants = "/tmp/merchants.toml"
            fallback_keys = ["other"]

            [mapping]
            coffee = ["cafe"]
            "#,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.wallet.as_deref(), Some(Path::new("/tmp/wallet.toml")));
        assert_eq!(config.merchants.as_deref(), Some(Path::new("/tmp/merchants.toml")));
        assert_eq!(config.engine.mapping.candidates("coffee"), ["cafe"]);
        assert_eq!(config.engine.fallback_keys.keys(), ["other"]);
    }

    #[test]
    fn malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.toml", "fallback_keys = 3");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn wallet_loaded_from_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let wallet_path = write_file(
            &dir,
            "wallet.toml",
            r#"
            [[cards]]
            id = "richart"
            bank_name = "Taishin"
            card_name = "Richart"
            cashback = { dining = 3.3 }
            "#,
        );
        let config = Config {
            wallet: Some(wallet_path),
            ..Config::default()
        };
        let wallet = load_wallet(None, &config).unwrap();
        assert_eq!(wallet.stats().total, 1);
    }

    #[test]
    fn no_wallet_configured_is_empty() {
        let wallet = load_wallet(None, &Config::default()).unwrap();
        assert!(wallet.cards().is_empty());
    }

    #[test]
    fn explicit_merchant_directory_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "merchants.toml",
            r#"
            [[merchants]]
            id = "1"
            name = "Louisa Coffee"
            category = "咖啡廳"
            "#,
        );
        let config = Config {
            merchants: Some(dir.path().join("absent.toml")),
            ..Config::default()
        };
        let directory = load_directory(Some(&path), &config).unwrap();
        assert_eq!(
            directory.resolve("louisa").unwrap().category,
            cardwise_core::MerchantCategory::Coffee
        );
    }

    #[test]
    fn no_directory_configured_is_empty() {
        let directory = load_directory(None, &Config::default()).unwrap();
        assert!(directory.merchants.is_empty());
    }
}
