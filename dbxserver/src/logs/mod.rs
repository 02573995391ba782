//! Initialisation du système de logging
//!
//! Le niveau minimum et la sortie console viennent de `dbxconfig`
//! (`host.logger.min_level`, `host.logger.enable_console`).

use anyhow::{Result, anyhow};
use dbxconfig::Config;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum des événements conservés
    pub min_level: LevelFilter,
    /// Activer la sortie vers stderr/stdout
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::INFO,
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Construit les options depuis la configuration
    pub fn from_config(config: &Config) -> Self {
        let level = config.get_log_min_level();
        let min_level = parse_level(&level).unwrap_or_else(|| {
            eprintln!("Unknown log level '{}', falling back to INFO", level);
            LevelFilter::INFO
        });
        Self {
            min_level,
            enable_console: config.get_log_enable_console(),
        }
    }
}

/// Convertit un nom de niveau ("info", "WARN"…) en `LevelFilter`
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_uppercase().as_str() {
        "OFF" => Some(LevelFilter::OFF),
        "ERROR" => Some(LevelFilter::ERROR),
        "WARN" | "WARNING" => Some(LevelFilter::WARN),
        "INFO" => Some(LevelFilter::INFO),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "TRACE" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

/// Installe le subscriber global
///
/// Le filtre est posé avant la couche console : l'ordre compte.
///
/// # Exemple
/// ```rust,no_run
/// use dbxserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions::default()).unwrap();
/// ```
pub fn init_logging(options: LoggingOptions) -> Result<()> {
    let console = options.enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
    });

    Registry::default()
        .with(options.min_level)
        .with(console)
        .try_init()
        .map_err(|e| anyhow!("Logging already initialized: {}", e))
}
