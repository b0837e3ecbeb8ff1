use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use error_stack::{report, ResultExt};
use serde::Deserialize;
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};

pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "Config";
pub const ENV_PREFIX: &str = "CAMPAIGN_SYNC";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration")]
    InvalidSettings,
    #[error("Required environment variable '{0}' is not set")]
    MissingApiKey(String),
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub brevo: super::brevo_config::BrevoConfig,
    pub sheets: super::sheets_config::SpreadsheetConfig,
    pub secrets: super::secrets::SecretsConfig,
    pub logging: super::logging_config::LoggingConfig,
}

impl AppConfig {
    /// Built-in defaults, overridden by the optional file named by `CONFIG_PATH`
    /// (default `Config.*`), overridden by `CAMPAIGN_SYNC__SECTION__KEY` variables.
    pub fn load() -> error_stack::Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(environment());

        Self::from_builder(builder)
            .attach_printable_lazy(|| format!("Config file: {config_path}"))
    }

    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> error_stack::Result<Self, ConfigError> {
        let config = builder.build().change_context(ConfigError::InvalidSettings)?;

        let mut track = Track::new();
        let path_de = PathDeserializer::new(config, &mut track);
        let app_config = match AppConfig::deserialize(path_de) {
            Ok(app_config) => app_config,
            Err(e) => {
                let path_str = track
                    .path()
                    .iter()
                    .map(|seg| match seg {
                        Segment::Seq { index } => format!("[{}]", index),
                        Segment::Map { key } => format!(".{}", key),
                        Segment::Enum { variant } => format!("::{}", variant),
                        Segment::Unknown => String::from("<?>"),
                    })
                    .collect::<String>();
                return Err(report!(ConfigError::InvalidSettings)
                    .attach_printable(e.to_string())
                    .attach_printable(format!("Field path: {}", path_str.trim_start_matches('.'))));
            }
        };

        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> error_stack::Result<(), ConfigError> {
        if self.brevo.page_size == 0 {
            return Err(report!(ConfigError::InvalidSettings)
                .attach_printable("brevo.page_size must be greater than zero"));
        }
        let variation = self.sheets.demo_noise_variation;
        if !variation.is_finite() || variation < 0.0 {
            return Err(report!(ConfigError::InvalidSettings).attach_printable(format!(
                "sheets.demo_noise_variation must be a non-negative number, got {variation}"
            )));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
