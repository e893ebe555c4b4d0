//! Logger initialization for the server

use jiff::{Zoned, tz::TimeZone};
use logforth::{append::Stderr, filter::EnvFilter, layout::Layout};
use std::{fmt::Write, io::IsTerminal, str::FromStr, sync::Once};

static INIT: Once = Once::new();

/// Custom layout that formats timestamps in UTC
#[derive(Debug)]
struct UtcLayout {
    no_color: bool,
}

impl UtcLayout {
    fn new() -> Self {
        Self { no_color: false }
    }

    fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn level(&self, level: log::Level) -> String {
        if self.no_color {
            return format!("{level:>5}");
        }

        let color = match level {
            log::Level::Error => 31,
            log::Level::Warn => 33,
            log::Level::Info => 32,
            log::Level::Debug => 34,
            log::Level::Trace => 35,
        };

        format!("\x1b[{color}m{level:>5}\x1b[0m")
    }
}

impl Layout for UtcLayout {
    fn format(
        &self,
        record: &log::Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut output = String::new();

        let now = Zoned::now().with_time_zone(TimeZone::UTC);

        write!(output, "{} ", now.strftime("%Y-%m-%dT%H:%M:%S%.6fZ"))?;
        write!(output, "{}  ", self.level(record.level()))?;

        if let Some(module) = record.module_path() {
            write!(output, "{module}: ")?;
        }

        write!(output, "{}", record.args())?;

        Ok(output.into_bytes())
    }
}

/// Initialize the logger. Only the first call has an effect.
///
/// The log_filter should be a string like "info" or "server=debug,info=debug"
pub fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();
    INIT.call_once(move || apply_logger(log_filter));
}

fn apply_logger(log_filter: String) {
    logforth::builder()
        .dispatch(move |d| {
            let filter = EnvFilter::from_str(&log_filter).unwrap_or_else(|_| {
                eprintln!("Invalid log filter '{log_filter}', falling back to 'info'");
                EnvFilter::from_str("info").expect("default filter should be valid")
            });

            let layout = if std::io::stderr().is_terminal() {
                UtcLayout::new()
            } else {
                UtcLayout::new().no_color()
            };

            d.filter(filter).append(Stderr::default().with_layout(layout))
        })
        .apply();
}
