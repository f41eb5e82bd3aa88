//! Logger backend for the `log` facade.
//!
//! Lines look like `01:02:345 [WARN] message`, with the level colored by ANSI
//! escapes. Where the time comes from and where the line goes are supplied by
//! the host, so the same logger serves the brain's serial port and a test
//! harness.

use alloc::string::String;
use core::{
    fmt::{self, Write},
    time::Duration,
};

use log::{max_level, set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const ESCAPES: [Option<&str>; 6] = [
    None,             // Default foreground
    Some("\x1B[31m"), // Error (red)
    Some("\x1B[33m"), // Warn (yellow)
    Some("\x1B[34m"), // Info (blue)
    Some("\x1B[36m"), // Debug (cyan)
    Some("\x1B[37m"), // Trace (white)
];

/// Time since startup.
pub type Clock = fn() -> Duration;

/// Receives one formatted line, without a trailing newline.
pub type Sink = fn(&str);

pub struct RobotLogger {
    clock: Clock,
    sink: Sink,
}

impl RobotLogger {
    pub const fn new(clock: Clock, sink: Sink) -> Self {
        Self { clock, sink }
    }

    pub fn init(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        set_logger(self)?;
        set_max_level(level);

        Ok(())
    }
}

#[cfg(feature = "vexide")]
impl RobotLogger {
    /// Prints to the serial port, stamped with the brain's high resolution timer.
    pub const fn serial() -> Self {
        Self::new(serial_clock, serial_sink)
    }
}

#[cfg(feature = "vexide")]
fn serial_clock() -> Duration {
    Duration::from_micros(unsafe { vex_sdk::vexSystemHighResTimeGet() })
}

#[cfg(feature = "vexide")]
fn serial_sink(line: &str) {
    vexide::io::println!("{line}");
}

/// Writes one log line for a message logged at `timestamp`.
pub fn write_record<W: Write>(out: &mut W, timestamp: Duration, level: Level, args: fmt::Arguments<'_>) -> fmt::Result {
    let mins = timestamp.as_secs() / 60;
    let submin_secs = timestamp.as_secs() % 60;
    write!(
        out,
        "{:02}:{:02}:{:03} {}[{}]\x1B[0m {}",
        mins,
        submin_secs,
        timestamp.subsec_millis(),
        ESCAPES[level as usize].unwrap_or_default(),
        level,
        args
    )
}

impl Log for RobotLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let mut line = String::new();
            if write_record(&mut line, (self.clock)(), record.level(), *record.args()).is_ok() {
                (self.sink)(&line);
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn formats_time_and_level() {
        let mut line = String::new();
        write_record(
            &mut line,
            Duration::from_millis(62_345),
            Level::Warn,
            format_args!("shot timed out"),
        )
        .unwrap();
        assert_eq!(line, "01:02:345 \x1B[33m[WARN]\x1B[0m shot timed out");
    }

    #[test]
    fn errors_are_red() {
        let mut line = String::new();
        write_record(&mut line, Duration::ZERO, Level::Error, format_args!("x")).unwrap();
        assert!(line.starts_with("00:00:000 \x1B[31m[ERROR]"));
    }

    static LINES: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn sends_enabled_records_to_the_sink() {
        fn clock() -> Duration {
            Duration::from_secs(1)
        }
        fn sink(line: &str) {
            assert!(line.ends_with("hello"));
            LINES.fetch_add(1, Ordering::SeqCst);
        }

        set_max_level(LevelFilter::Trace);
        let logger = RobotLogger::new(clock, sink);
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        let before = LINES.load(Ordering::SeqCst);
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("hello"))
                .build(),
        );
        assert_eq!(LINES.load(Ordering::SeqCst), before + 1);
    }
}
