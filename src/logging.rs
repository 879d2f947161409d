//! Tracing setup (logs to stderr)

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::error::{IndexError, Result};

/// Initialize tracing with `level` as the default for this crate.
///
/// `RUST_LOG` directives are honoured on top of it. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_logging(level: &str) -> Result<()> {
    let directive = format!("dateindex={level}")
        .parse::<Directive>()
        .map_err(|e| IndexError::ConfigError {
            message: format!("invalid log level '{level}': {e}"),
        })?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
