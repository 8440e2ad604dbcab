use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use strum_macros::Display;


// ----------------------------------------------
// Level
// ----------------------------------------------

#[repr(u8)]
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Silent,
    Verbose,
    Info,
    Warn,
    Error,
}

impl Level {
    const ALL: [Level; 5] = [Level::Silent, Level::Verbose, Level::Info, Level::Warn, Level::Error];

    // Silent as a threshold mutes everything; Silent messages never print.
    #[inline]
    pub fn passes(self, threshold: Level) -> bool {
        threshold != Level::Silent && self != Level::Silent && self >= threshold
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        self.passes(level())
    }

    fn ansi_color(self) -> &'static str {
        match self {
            Level::Silent  => "",
            Level::Verbose => "\x1b[90m",
            Level::Info    => "\x1b[32m",
            Level::Warn    => "\x1b[33m",
            Level::Error   => "\x1b[31m",
        }
    }
}

static THRESHOLD: AtomicU8 = AtomicU8::new(Level::Verbose as u8);

pub fn set_level(level: Level) {
    THRESHOLD.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> Level {
    let index = THRESHOLD.load(Ordering::Relaxed) as usize;
    Level::ALL.get(index).copied().unwrap_or(Level::Error)
}

// ----------------------------------------------
// Channel
// ----------------------------------------------

// Tag printed after the level, e.g. "[Info] [map] ...".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Channel(pub &'static str);

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " [{}]", self.0)
    }
}

#[macro_export]
macro_rules! channel {
    ($name:literal) => { $crate::log::Channel($name) };
}

// ----------------------------------------------
// Output
// ----------------------------------------------

#[doc(hidden)]
pub fn emit(level: Level, channel: Option<Channel>, args: fmt::Arguments<'_>) {
    if !level.is_enabled() {
        return;
    }

    let tag = channel.map(|chan| chan.to_string()).unwrap_or_default();
    let line = format!("{}[{level}]{tag}\x1b[0m {args}", level.ansi_color());

    // Console write failures are dropped.
    if level >= Level::Warn {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    } else {
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:ident, $chan:expr, $($fmt:tt)+) => {
        if $crate::log::Level::$level.is_enabled() {
            $crate::log::emit($crate::log::Level::$level, $chan, format_args!($($fmt)+));
        }
    };
}

#[macro_export]
macro_rules! verbose {
    ($fmt:literal $($rest:tt)*) => { $crate::log_at!(Verbose, None, $fmt $($rest)*) };
    ($chan:expr, $($fmt:tt)+) => { $crate::log_at!(Verbose, Some($chan), $($fmt)+) };
}

#[macro_export]
macro_rules! info {
    ($fmt:literal $($rest:tt)*) => { $crate::log_at!(Info, None, $fmt $($rest)*) };
    ($chan:expr, $($fmt:tt)+) => { $crate::log_at!(Info, Some($chan), $($fmt)+) };
}

#[macro_export]
macro_rules! warn {
    ($fmt:literal $($rest:tt)*) => { $crate::log_at!(Warn, None, $fmt $($rest)*) };
    ($chan:expr, $($fmt:tt)+) => { $crate::log_at!(Warn, Some($chan), $($fmt)+) };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $($rest:tt)*) => { $crate::log_at!(Error, None, $fmt $($rest)*) };
    ($chan:expr, $($fmt:tt)+) => { $crate::log_at!(Error, Some($chan), $($fmt)+) };
}

// Scoped use: log::info!(), log::channel!(), etc.
#[allow(unused_imports)]
pub use crate::{channel, verbose, info, warn, error};
