//! `tracing` subscriber setup for the `mmm` binary.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

/// Resolve the effective filter: `-v` flags win over the configured directive.
pub fn filter_directive(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(configured: &str, verbose: u8) {
    let directive = filter_directive(configured, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_filter() {
        assert_eq!(filter_directive("warn", 0), "warn");
        assert_eq!(filter_directive("warn", 1), "info");
        assert_eq!(filter_directive("error", 2), "debug");
        assert_eq!(filter_directive("error", 9), "trace");
    }
}
