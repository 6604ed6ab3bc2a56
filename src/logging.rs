use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["tempest", "tempest_array", "tempest_calendar", "tempest_metrics"];

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// A valid `RUST_LOG` overrides the CLI flag; an invalid one is reported and
/// ignored.
pub fn init(verbosity: u8) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = select_filter(env.as_deref(), verbosity);
    let active = filter.to_string();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(err) = rejected {
        warn!(%err, "ignoring invalid {}", EnvFilter::DEFAULT_ENV);
    }
    debug!(filter = %active, "logging initialised");
}

/// Filter from `env` if it parses, else from `verbosity`. The parse error,
/// if any, is returned alongside.
fn select_filter(env: Option<&str>, verbosity: u8) -> (EnvFilter, Option<ParseError>) {
    match env.filter(|s| !s.trim().is_empty()).map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(err)) => (EnvFilter::new(default_filter(verbosity)), Some(err)),
        None => (EnvFilter::new(default_filter(verbosity)), None),
    }
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert!(default_filter(0).starts_with("tempest=warn,"));
        assert!(default_filter(2).contains("tempest_metrics=debug"));
        assert!(default_filter(7).ends_with("tempest_metrics=trace"));
    }

    #[test]
    fn env_filter_overrides_verbosity() {
        let (filter, rejected) = select_filter(Some("tempest_metrics=trace"), 0);
        assert!(rejected.is_none());
        assert_eq!(filter.to_string(), "tempest_metrics=trace");
    }

    #[test]
    fn unset_or_blank_env_uses_verbosity() {
        for env in [None, Some(""), Some("  ")] {
            let (filter, rejected) = select_filter(env, 1);
            assert!(rejected.is_none());
            assert!(filter.to_string().contains("tempest=info"));
        }
    }

    #[test]
    fn invalid_env_falls_back_to_verbosity() {
        let (filter, rejected) = select_filter(Some("tempest=loud"), 2);
        assert!(rejected.is_some());
        assert!(filter.to_string().contains("tempest_array=debug"));
    }
}
