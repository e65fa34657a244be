//! Tracing setup for the binary
//!
//! Logs go to stderr so they never mix with a program's printed output in
//! plain mode. `RUST_LOG` takes precedence over the built-in default.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "kidcode=warn";
const VERBOSE_FILTER: &str = "kidcode=debug";

/// Filter used when `RUST_LOG` is unset or invalid
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "kidcode=warn");
        assert_eq!(default_filter(true), "kidcode=debug");
        assert!(default_filter(true).parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
        tracing::debug!("logging initialised");
    }
}
