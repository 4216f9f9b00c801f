mod app_config;

pub use app_config::{
    AppConfig, CredentialsConfig, LogFormat, LoggingConfig, ServerConfig, UpstreamConfig,
};
