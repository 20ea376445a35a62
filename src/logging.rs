use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter directive.
pub const ENV_VAR: &str = "SRCREF_LOG";

/// Filter used when `SRCREF_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: human-readable lines on stderr, filtered
/// by `SRCREF_LOG` (e.g. `SRCREF_LOG=srcref=debug`). Called once from `main`;
/// the library itself never installs a subscriber.
pub fn init() {
    let (filter, rejected) = match std::env::var(ENV_VAR) {
        Ok(raw) => match EnvFilter::try_new(&raw) {
            Ok(filter) => (filter, None),
            Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some((raw, e))),
        },
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), None),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(layer).try_init();

    if let Some((raw, e)) = rejected {
        tracing::warn!("ignoring invalid ${ENV_VAR} `{raw}`: {e}");
    }
}
