//! Stderr logger for the probe-mesh tools.
//!
//! Lines look like `[  0.012s DEBUG probe_mesh_io] message`. Install it once
//! with [`init_with_level`]; library code only talks to the `log` facade.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    // Strip the module path down to its crate name.
    fn short_target<'a>(&self, record: &'a Record<'_>) -> &'a str {
        let target = record.target();
        target.split("::").next().unwrap_or(target)
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            self.short_target(record),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Route `tracing` events (and `log` records) to stderr.
///
/// `RUST_LOG` wins when set; otherwise events at `level` and above are
/// shown, so the tool's `-v`/`-q` flags keep working in this build. `json`
/// switches to one flattened JSON object per event.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        subscriber.json().flatten_event(true).finish().try_init()
    } else {
        subscriber
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

/// Filter directive for `level`, e.g. `debug` or `off`.
#[cfg(any(feature = "tracing", test))]
fn default_directive(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_maps_to_filter_directive() {
        assert_eq!(default_directive(LevelFilter::Debug), "debug");
        assert_eq!(default_directive(LevelFilter::Error), "error");
        assert_eq!(default_directive(LevelFilter::Off), "off");
    }

    #[test]
    fn target_is_cut_to_the_crate() {
        let logger = StderrLogger {
            level: LevelFilter::Info,
            started: Instant::now(),
        };
        assert_eq!(
            logger.short_target(
                &Record::builder()
                    .target("probe_mesh_io::format")
                    .args(format_args!("x"))
                    .build()
            ),
            "probe_mesh_io"
        );
    }
}
