use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Catalog crates at `info`; the SQL layers only speak up on warnings.
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Output shape of the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human readable output, no targets.
    #[default]
    Compact,
    /// One JSON object per event, targets included.
    Json,
}

impl LogFormat {
    /// `json` in any case selects JSON; everything else is compact.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }

    /// Reads `LOG_FORMAT`; unset means compact.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").map(|v| Self::parse(&v)).unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to stdout. `RUST_LOG` overrides the
/// default filter. A second call is a no-op.
pub fn init_logging(format: LogFormat) {
    let (compact, json) = match format {
        LogFormat::Compact => (Some(fmt::layer().with_target(false).compact()), None),
        LogFormat::Json => (None, Some(fmt::layer().with_target(true).json())),
    };
    let _ = Registry::default().with(env_filter()).with(compact).with(json).try_init();
}

pub fn init_logging_default() {
    init_logging(LogFormat::Compact)
}

/// e.g. `RUST_LOG=info,service::catalog=debug LOG_FORMAT=json`
pub fn init_logging_json() {
    init_logging(LogFormat::Json)
}

pub fn init_logging_from_env() {
    init_logging(LogFormat::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse(""), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Compact);
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LogFormat::Compact);
        init_logging(LogFormat::Json);
        tracing::info!("still logging");
    }
}
