//! A minimal, zero-dependency logging crate for the `OxideX` project.
//!
//! Messages go to stderr, tagged with the module path of the call site.
//! Colors are used only when stderr is a terminal.
//!
//! # Configuration
//!
//! The minimum level starts at [`Level::Info`]. On first use the logger reads
//! the `OXIDEX_LOG` environment variable (`error`, `warn`, `info`, `debug`,
//! `trace`); invalid values are ignored. The level can be changed at any
//! time with [`set_level`] or [`set_level_from_str`].
//!
//! # Example
//!
//! ```
//! use oxidex_log::{debug, info, Level};
//!
//! oxidex_log::set_level(Level::Debug);
//!
//! info!("composed {} classes", 3);
//! debug!("members: {:?}", ["foo", "getFoo"]);
//! ```

use std::fmt::{self, Arguments};
use std::io::{IsTerminal, Write};
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable read when the logger is first used.
pub const LOG_ENV: &str = "OXIDEX_LOG";

/// Log levels, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Failures.
    Error = 0,
    /// Suspicious but recoverable situations.
    Warn = 1,
    /// High-level progress.
    Info = 2,
    /// Diagnostic detail.
    Debug = 3,
    /// Step-by-step detail.
    Trace = 4,
}

impl Level {
    const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Returns the upper-case label for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    fn from_u8(raw: u8) -> Level {
        Level::ALL
            .get(usize::from(raw))
            .copied()
            .unwrap_or(Level::Info)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid log level: {}", self.input)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use oxidex_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError {
                input: s.to_owned(),
            })
    }
}

/// The global logger.
pub struct Logger {
    level: AtomicU8,
    color: bool,
}

impl Logger {
    const fn new(level: Level, color: bool) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            color,
        }
    }

    fn from_env() -> Self {
        let level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(Level::Info);
        Logger::new(level, std::io::stderr().is_terminal())
    }

    /// Sets the minimum level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Returns the minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Returns `true` if messages at `level` are written.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    fn write(&self, level: Level, target: &str, args: Arguments) {
        let mut stderr = std::io::stderr().lock();
        // Logging never fails the caller.
        let _ = if self.color {
            writeln!(
                stderr,
                "{}[{level}]\x1b[0m {target}: {args}",
                level.color_code()
            )
        } else {
            writeln!(stderr, "[{level}] {target}: {args}")
        };
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, initializing it from `OXIDEX_LOG` on first
/// call.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::from_env)
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level from a level name.
///
/// # Errors
///
/// Returns [`ParseLevelError`] if `s` is not a level name; the level is left
/// unchanged.
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Re-reads `OXIDEX_LOG` and applies it.
///
/// Returns the level now in effect. An unset or invalid variable leaves the
/// level unchanged.
pub fn init_from_env() -> Level {
    let logger = get_logger();
    if let Some(level) = std::env::var(LOG_ENV).ok().and_then(|raw| raw.parse().ok()) {
        logger.set_level(level);
    }
    logger.level()
}

#[doc(hidden)]
pub fn __log(level: Level, target: &str, args: Arguments) {
    let logger = get_logger();
    if logger.enabled(level) {
        logger.write(level, target, args);
    }
}

/// Logs at an explicit level.
///
/// ```
/// use oxidex_log::{log, Level};
///
/// log!(level: Level::Warn, "{} mixins skipped", 2);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::get_logger().enabled(level) {
            $crate::__log(level, module_path!(), format_args!($($arg)*));
        }
    }};
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log!(level: $crate::Level::Error, $($arg)*) };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log!(level: $crate::Level::Warn, $($arg)*) };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log!(level: $crate::Level::Info, $($arg)*) };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::log!(level: $crate::Level::Debug, $($arg)*) };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::log!(level: $crate::Level::Trace, $($arg)*) };
}
