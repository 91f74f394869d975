//! Logging initialization
//!
//! The core library only emits `tracing` events; the binary owns the
//! subscriber. Logs go to stderr so stdout stays clean for documents.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity flags
pub const LOG_ENV: &str = "SEMDOC_LOG";

static INIT_ONCE: Once = Once::new();

fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "semdoc_core=warn,semdoc_cli=warn",
        1 => "semdoc_core=debug,semdoc_cli=debug",
        _ => "semdoc_core=trace,semdoc_cli=trace",
    }
}

/// Install the stderr subscriber once; later calls are no-ops
pub fn init(verbosity: u8) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(0);
        init(2);
        init(1);
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(default_directives(0).contains("warn"));
        assert!(default_directives(1).contains("debug"));
        assert!(default_directives(5).contains("trace"));
    }
}
