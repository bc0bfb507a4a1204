use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Environment variable read for `EnvFilter` directives.
pub const LOG_ENV: &str = "CELLCALC_LOG";

/// Install the stderr subscriber. `-v` flags take precedence over the
/// configured level; `CELLCALC_LOG` directives take precedence over both.
pub fn init(verbosity: u8, logging: &LoggingConfig) {
    let level = level_from_verbosity(verbosity).unwrap_or_else(|| {
        logging
            .level
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::WARN)
    });
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn level_from_verbosity(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), None);
        assert_eq!(level_from_verbosity(1), Some(LevelFilter::INFO));
        assert_eq!(level_from_verbosity(2), Some(LevelFilter::DEBUG));
        assert_eq!(level_from_verbosity(9), Some(LevelFilter::TRACE));
    }
}
