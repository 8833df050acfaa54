//! Log output of `modctl`.
//!
//! `--verbose` turns on debug records with their targets. `--timing` reports
//! how long each `#[instrument]`ed command took, as span-close events on
//! stderr. `RUST_LOG` always wins over both flags. Records emitted through the
//! `log` facade by the business crate end up here too.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: LevelFilter,
    spans: FmtSpan,
    show_target: bool,
}

impl LogSettings {
    fn from_flags(verbose: bool, timing: bool) -> Self {
        let level = match (verbose, timing) {
            (true, _) => LevelFilter::DEBUG,
            // span-close events are INFO
            (false, true) => LevelFilter::INFO,
            (false, false) => LevelFilter::WARN,
        };
        Self {
            level,
            spans: if timing { FmtSpan::CLOSE } else { FmtSpan::NONE },
            show_target: verbose,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.level.into())
            .from_env_lossy()
    }
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init_tracing(verbose: bool, timing: bool) {
    let settings = LogSettings::from_flags(verbose, timing);

    tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_span_events(settings.spans.clone())
        .with_target(settings.show_target)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_by_default() {
        let settings = LogSettings::from_flags(false, false);
        assert_eq!(settings.level, LevelFilter::WARN);
        assert_eq!(settings.spans, FmtSpan::NONE);
        assert!(!settings.show_target);
    }

    #[test]
    fn test_timing_reports_span_close() {
        let settings = LogSettings::from_flags(false, true);
        assert_eq!(settings.level, LevelFilter::INFO);
        assert_eq!(settings.spans, FmtSpan::CLOSE);
    }

    #[test]
    fn test_verbose_wins_over_timing() {
        let settings = LogSettings::from_flags(true, true);
        assert_eq!(settings.level, LevelFilter::DEBUG);
        assert_eq!(settings.spans, FmtSpan::CLOSE);
        assert!(settings.show_target);
    }
}
