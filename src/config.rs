use crate::error::{Result, ReviewError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub save_threshold: usize,
    pub fetch_timeout_seconds: u64,
    pub photo_size: u32,
    pub preview_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("players_labeled.json"),
            save_threshold: 5,
            fetch_timeout_seconds: 5,
            photo_size: 200,
            preview_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuración cargada");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewError::Config("No se encontró el directorio personal".into()))?;
        Ok(home.join(".config").join("player-review").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.save_threshold == 0 {
            return Err(ReviewError::Config("save_threshold debe ser al menos 1".into()));
        }
        if self.photo_size == 0 {
            return Err(ReviewError::Config("photo_size debe ser mayor que 0".into()));
        }
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: usize) -> Result<()> {
        self.save_threshold = threshold;
        self.validate()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds.max(1))
    }

    /// Carpeta donde se escribe la foto actual (por defecto en el directorio temporal)
    pub fn preview_dir(&self) -> PathBuf {
        self.preview_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("player-review"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.save_threshold, 5);
        assert_eq!(config.photo_size, 200);
        assert_eq!(config.dataset_path, PathBuf::from("players_labeled.json"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_threshold(3).unwrap();
        config.dataset_path = PathBuf::from("otro.json");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.save_threshold, 3);
        assert_eq!(loaded.dataset_path, PathBuf::from("otro.json"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch_timeout_seconds": 10}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.save_threshold, 5);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = Config::default();
        assert!(matches!(config.set_threshold(0), Err(ReviewError::Config(_))));
    }
}
