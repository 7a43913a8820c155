//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Let the log level follow the `config-logging` section at runtime
//!
//! # Design Decisions
//! - `RUST_LOG` wins at startup; later section updates replace the filter
//! - JSON output for machine parsing, pretty output otherwise

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::config::schema::LoggingConfig;

const DEFAULT_FILTER: &str = "config_store=info";

/// Handle for swapping the active filter after startup.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replace the active filter with one built from a logging section.
    pub fn apply(&self, config: &LoggingConfig) -> Result<(), reload::Error> {
        let directives = filter_directives(config);
        match EnvFilter::try_new(&directives) {
            Ok(filter) => {
                self.inner.reload(filter)?;
                tracing::info!(filter = %directives, "Log filter updated");
            }
            Err(e) => {
                tracing::warn!(filter = %directives, error = %e, "Ignoring unusable log filter");
            }
        }
        Ok(())
    }
}

/// Initialize the global subscriber.
pub fn init(json: bool) -> LogLevelHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let (filter, handle) = reload::Layer::new(filter);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    LogLevelHandle { inner: handle }
}

/// Render a logging section as `EnvFilter` directives.
///
/// The section's base level becomes the default directive; each
/// `loglevel.<component>` entry becomes a `<component>=<level>` directive.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.to_string()];
    for (component, level) in &config.component_levels {
        directives.push(format!("{}={}", component.replace('-', "_"), level));
    }
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_filter_directives() {
        let mut config = LoggingConfig::default();
        config.level = LogLevel::Debug;
        config.component_levels.insert("config-store".into(), LogLevel::Warn);

        assert_eq!(filter_directives(&config), "debug,config_store=warn");
        assert!(EnvFilter::try_new(filter_directives(&config)).is_ok());
    }
}
