use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_PARALLELISM: usize = 10;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Tuning knobs for the summarization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Number of summarizer worker threads.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Capacity of each bounded channel between stages.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PipelineConfig {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.parallelism == 0 {
            return Err(Error::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }
        // crossbeam treats capacity 0 as a rendezvous channel, which is not
        // the buffered hand-off the stages expect.
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the pipeline configuration from an optional `Config.toml` and
/// `DUPES_`-prefixed environment variables, on top of the built-in defaults.
pub fn load_configuration() -> Result<PipelineConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("parallelism", DEFAULT_PARALLELISM as u64)?
        .set_default("channel_capacity", DEFAULT_CHANNEL_CAPACITY as u64)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("DUPES"))
        .build()?;
    builder.try_deserialize::<PipelineConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.parallelism, 10);
        assert_eq!(config.channel_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let config = PipelineConfig::default().with_parallelism(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PipelineConfig::default().with_channel_capacity(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_source_falls_back_to_defaults() {
        let config: PipelineConfig = Config::builder()
            .add_source(ConfigFile::from_str(
                "parallelism = 3",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.parallelism, 3);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
