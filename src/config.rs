use crate::error::{Result, ZipflowError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub population: PopulationConfig,
    pub paths: PathsConfig,
}

/// Size of the generated archive population.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopulationConfig {
    pub archive_count: usize,
    pub documents_per_archive: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub archives_dir: PathBuf,
    pub levels_output: PathBuf,
    pub objects_output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            archive_count: 50,
            documents_per_archive: 100,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            archives_dir: PathBuf::from("archives"),
            levels_output: PathBuf::from("levels.csv"),
            objects_output: PathBuf::from("objects.csv"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ZipflowError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ZipflowError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ZipflowError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["zipflow.toml", ".zipflow.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref archives_dir) = cli_args.archives_dir {
            self.paths.archives_dir = archives_dir.clone();
        }

        if let Some(ref levels_output) = cli_args.levels_output {
            self.paths.levels_output = levels_output.clone();
        }

        if let Some(ref objects_output) = cli_args.objects_output {
            self.paths.objects_output = objects_output.clone();
        }

        if let Some(archive_count) = cli_args.archive_count {
            self.population.archive_count = archive_count;
        }

        if let Some(documents_per_archive) = cli_args.documents_per_archive {
            self.population.documents_per_archive = documents_per_archive;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ZipflowError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ZipflowError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.population.archive_count == 0 {
            return Err(ZipflowError::Config {
                message: "Archive count must be greater than 0".to_string(),
            });
        }

        if self.population.documents_per_archive == 0 {
            return Err(ZipflowError::Config {
                message: "Documents per archive must be greater than 0".to_string(),
            });
        }

        // Two sinks may never share one output file.
        if self.paths.levels_output == self.paths.objects_output {
            return Err(ZipflowError::Config {
                message: "Level and object outputs must be distinct files".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub archives_dir: Option<PathBuf>,
    pub levels_output: Option<PathBuf>,
    pub objects_output: Option<PathBuf>,
    pub archive_count: Option<usize>,
    pub documents_per_archive: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archives_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.archives_dir = dir;
        self
    }

    pub fn with_levels_output(mut self, path: Option<PathBuf>) -> Self {
        self.levels_output = path;
        self
    }

    pub fn with_objects_output(mut self, path: Option<PathBuf>) -> Self {
        self.objects_output = path;
        self
    }

    pub fn with_archive_count(mut self, count: Option<usize>) -> Self {
        self.archive_count = count;
        self
    }

    pub fn with_documents_per_archive(mut self, count: Option<usize>) -> Self {
        self.documents_per_archive = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.population.archive_count, 50);
        assert_eq!(config.population.documents_per_archive, 100);
        assert_eq!(config.paths.levels_output, PathBuf::from("levels.csv"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.population.archive_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_colliding_outputs_rejected() {
        let mut config = Config::default();
        config.paths.objects_output = config.paths.levels_output.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.population.archive_count,
            loaded_config.population.archive_count
        );
        assert_eq!(config.paths.archives_dir, loaded_config.paths.archives_dir);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_archive_count(Some(2))
            .with_archives_dir(Some(PathBuf::from("data")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.population.archive_count, 2);
        assert_eq!(config.paths.archives_dir, PathBuf::from("data"));
        // Untouched fields keep their defaults
        assert_eq!(config.population.documents_per_archive, 100);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[population]"));
        assert!(sample.contains("[paths]"));
    }
}
