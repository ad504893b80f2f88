//! Configuration loading
//!
//! Resolution order: an explicit configuration file when one is given and
//! usable, otherwise the encrypted single-line fallback file, otherwise empty
//! defaults. None of these steps is fatal; a run with empty credentials fails
//! visibly at the API, row by row.

use super::ApiConfig;
use crate::utils::error::{Result, ShipmentError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Fallback configuration file looked up in the working directory
pub const DEFAULT_FALLBACK_FILE: &str = "la-aws-data.bin";

/// Turns the fallback file's ciphertext into a configuration document
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

/// Identity decryptor, used until a deployment supplies a real one
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughDecryptor;

impl Decryptor for PassThroughDecryptor {
    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        Ok(ciphertext.to_string())
    }
}

impl<F> Decryptor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        Ok(self(ciphertext))
    }
}

/// Where the resolved configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Fallback(PathBuf),
    Defaults,
}

/// Builds the run's [`ApiConfig`]
pub struct ConfigResolver {
    fallback_path: PathBuf,
    decryptor: Box<dyn Decryptor>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("fallback_path", &self.fallback_path)
            .finish_non_exhaustive()
    }
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_FILE),
            decryptor: Box::new(PassThroughDecryptor),
        }
    }

    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    pub fn with_decryptor(mut self, decryptor: impl Decryptor + 'static) -> Self {
        self.decryptor = Box::new(decryptor);
        self
    }

    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }

    /// Resolve the configuration for one run.
    pub fn resolve(&self, explicit: Option<&Path>) -> (ApiConfig, ConfigSource) {
        if let Some(path) = explicit.filter(|p| p.exists()) {
            match load_explicit(path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    return (config, ConfigSource::Explicit(path.to_path_buf()));
                }
                Err(e) => error!("Error loading config from {}: {}", path.display(), e),
            }
        } else if let Some(path) = explicit {
            warn!("Config file {} does not exist", path.display());
        }

        if !self.fallback_path.exists() {
            error!(
                "Fallback file {} not found and no usable config path provided",
                self.fallback_path.display()
            );
            return (ApiConfig::default(), ConfigSource::Defaults);
        }

        info!("Fallback file {} found", self.fallback_path.display());
        match self.load_fallback() {
            Ok(config) => {
                info!(
                    "Configuration loaded from {}",
                    self.fallback_path.display()
                );
                (config, ConfigSource::Fallback(self.fallback_path.clone()))
            }
            Err(e) => {
                error!(
                    "Issue reading data from {}: {}",
                    self.fallback_path.display(),
                    e
                );
                (ApiConfig::default(), ConfigSource::Defaults)
            }
        }
    }

    fn load_fallback(&self) -> Result<ApiConfig> {
        let reader = BufReader::new(File::open(&self.fallback_path)?);
        let line = reader.lines().next().transpose()?.unwrap_or_default();
        let plaintext = self.decryptor.decrypt(line.trim())?;
        ApiConfig::from_json(&plaintext)
            .map_err(|e| ShipmentError::config(format!("Failed to parse fallback config: {}", e)))
    }
}

fn load_explicit(path: &Path) -> Result<ApiConfig> {
    let content = std::fs::read_to_string(path)?;
    ApiConfig::from_json(&content)
        .map_err(|e| ShipmentError::config(format!("Failed to parse config: {}", e)))
}
