use chrono::Local;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Timestamps in the host's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// `--quiet` wins over `--verbose`. With neither, `RUST_LOG` is used as-is,
/// and `info` only applies when it is unset or unparsable.
pub fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    build_filter(verbose, quiet, std::env::var(EnvFilter::DEFAULT_ENV).ok())
}

fn build_filter(verbose: bool, quiet: bool, rust_log: Option<String>) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

pub fn init(verbose: bool, quiet: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt::layer().with_timer(LocalTimer).with_target(verbose))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        assert_eq!(filter(false, true).to_string(), "error");
        assert_eq!(filter(true, false).to_string(), "debug");
        assert_eq!(filter(true, true).to_string(), "error");
    }

    #[test]
    fn test_rust_log_is_not_clamped_to_info() {
        let filter = build_filter(false, false, Some("debug".to_string()));
        assert_eq!(filter.to_string(), "debug");

        let filter = build_filter(false, false, Some("helix_client=trace".to_string()));
        assert_eq!(filter.to_string(), "helix_client=trace");
    }

    #[test]
    fn test_info_when_rust_log_unset() {
        assert_eq!(build_filter(false, false, None).to_string(), "info");
        assert_eq!(build_filter(false, false, Some(String::new())).to_string(), "info");
    }

    #[test]
    fn test_flags_override_rust_log() {
        let rust_log = Some("trace".to_string());
        assert_eq!(build_filter(false, true, rust_log.clone()).to_string(), "error");
        assert_eq!(build_filter(true, false, rust_log).to_string(), "debug");
    }
}
