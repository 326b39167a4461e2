use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub aggregation: AggregationConfig,
    pub pagination: PaginationConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_per_page: usize,
    pub max_per_page: usize,
    pub highlight_pre: String,
    pub highlight_post: String,
    pub snippet_context_chars: usize,
    pub max_snippets_per_field: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub max_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Report unrecognized filter operators during validation. Evaluation
    /// itself always lets them match.
    pub reject_unknown_operators: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_per_page: 20,
            max_per_page: 100,
            highlight_pre: "<mark>".to_string(),
            highlight_post: "</mark>".to_string(),
            snippet_context_chars: 40,
            max_snippets_per_field: 3,
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { max_limit: 1000 }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 20,
            max_per_page: 100,
        }
    }
}

impl EngineConfig {
    /// Defaults, then `engine.toml` in the working directory if present, then
    /// `ENGINE__<SECTION>__<KEY>` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::base_builder()?;

        if Path::new("engine.toml").exists() {
            builder = builder.add_source(File::with_name("engine"));
        }

        Self::finish(builder)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::base_builder()?.add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder().add_source(Config::try_from(&EngineConfig::default())?))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder
            .add_source(
                Environment::with_prefix("ENGINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let engine_config: EngineConfig = config.try_deserialize()?;
        engine_config.validate()?;

        Ok(engine_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.default_per_page == 0 {
            return Err(ConfigError::Message(
                "Search default per-page must be greater than 0".to_string(),
            ));
        }

        if self.search.default_per_page > self.search.max_per_page {
            return Err(ConfigError::Message(
                "Search default per-page cannot exceed max per-page".to_string(),
            ));
        }

        if self.search.highlight_pre.is_empty() || self.search.highlight_post.is_empty() {
            return Err(ConfigError::Message(
                "Highlight markers cannot be empty".to_string(),
            ));
        }

        if self.search.max_snippets_per_field == 0 {
            return Err(ConfigError::Message(
                "Max snippets per field must be greater than 0".to_string(),
            ));
        }

        if self.aggregation.max_limit == 0 {
            return Err(ConfigError::Message(
                "Aggregation max limit must be greater than 0".to_string(),
            ));
        }

        if self.pagination.default_per_page == 0 {
            return Err(ConfigError::Message(
                "Pagination default per-page must be greater than 0".to_string(),
            ));
        }

        if self.pagination.default_per_page > self.pagination.max_per_page {
            return Err(ConfigError::Message(
                "Pagination default per-page cannot exceed max per-page".to_string(),
            ));
        }

        if self.filter.reject_unknown_operators {
            tracing::info!("Strict filter operator validation enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.search.default_per_page, 20);
        assert_eq!(config.search.highlight_pre, "<mark>");
        assert_eq!(config.aggregation.max_limit, 1000);
        assert!(!config.filter.reject_unknown_operators);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.search.default_per_page = 0;
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.search.default_per_page = 500;
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.search.highlight_post = String::new();
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.aggregation.max_limit = 0;
        assert!(config.validate().is_err());

        config = EngineConfig::default();
        config.pagination.max_per_page = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_loading() {
        let config = EngineConfig::load().expect("Should load default configuration");
        assert!(config.validate().is_ok());
        assert!(config.search.max_per_page >= config.search.default_per_page);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[search]\ndefault_per_page = 5\nhighlight_pre = \"<em>\"\n\n[filter]\nreject_unknown_operators = true"
        )
        .unwrap();

        let config = EngineConfig::load_from(file.path()).expect("Should load file configuration");
        assert_eq!(config.search.default_per_page, 5);
        assert_eq!(config.search.highlight_pre, "<em>");
        assert_eq!(config.search.highlight_post, "</mark>");
        assert_eq!(config.aggregation.max_limit, 1000);
        assert!(config.filter.reject_unknown_operators);
    }

    #[test]
    fn test_load_from_invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[aggregation]\nmax_limit = 0").unwrap();

        assert!(EngineConfig::load_from(file.path()).is_err());
    }
}
