//! `fern`-backed logger setup and the `racex_*!` macro family, following
//! the teacher's own `rap_info!`/`rap_debug!`/`rap_error!` convention on
//! top of `log` + `fern` + `colorful`.

use colorful::Colorful;
use log::LevelFilter;

/// Initialises the global logger. `verbosity` follows the usual `-v`/`-vv`
/// CLI convention: 0 = warn, 1 = info, 2+ = debug.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            let level_tag = match record.level() {
                log::Level::Error => "ERROR".red().to_string(),
                log::Level::Warn => "WARN".yellow().to_string(),
                log::Level::Info => "INFO".cyan().to_string(),
                log::Level::Debug => "DEBUG".green().to_string(),
                log::Level::Trace => "TRACE".to_string(),
            };
            out.finish(format_args!("[racex] [{}] {}", level_tag, message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();

    if let Err(err) = result {
        eprintln!("[racex] logger already initialised: {err}");
    }
}

#[macro_export]
macro_rules! racex_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! racex_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! racex_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! racex_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}
