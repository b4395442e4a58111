//! Tracing setup for the CLI.
//!
//! Command entry points carry `#[instrument]`; with `--timing` every span
//! logs its duration when it closes (`FmtSpan::CLOSE`). Records emitted by
//! the business crate through `log` are forwarded by the subscriber's
//! `tracing-log` bridge. `RUST_LOG` overrides the computed level.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default level for the flag combination.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // span close events are INFO
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

fn span_events(timing: bool) -> FmtSpan {
    if timing { FmtSpan::CLOSE } else { FmtSpan::NONE }
}

/// Install the global subscriber writing to stderr.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events(timing))
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), LevelFilter::WARN);
        assert_eq!(default_level(false, true), LevelFilter::INFO);
        assert_eq!(default_level(true, true), LevelFilter::DEBUG);
    }

    #[test]
    fn test_span_events_follow_timing_flag() {
        assert_eq!(span_events(true), FmtSpan::CLOSE);
        assert_eq!(span_events(false), FmtSpan::NONE);
    }
}
