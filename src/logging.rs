use std::str::FromStr;

use simplelog::{
    ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

use crate::config::{Settings, expand_path};

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Parse a level name from config, falling back to `warn`.
pub fn level_from_str(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or_else(|_| {
        eprintln!("dasc: unknown log level {name:?}, using warn");
        LevelFilter::Warn
    })
}

/// Raise `level` by `steps` (one per `-v`), saturating at trace.
pub fn raise(level: LevelFilter, steps: u8) -> LevelFilter {
    let idx = LEVELS.iter().position(|l| *l == level).unwrap_or(2);
    LEVELS[(idx + usize::from(steps)).min(LEVELS.len() - 1)]
}

/// Install the global logger.
///
/// Logs go to `settings.log_file` when set, otherwise to stderr.
/// Best-effort: a logger that cannot be installed is reported and skipped.
pub fn init(settings: &Settings, verbosity: u8) {
    let level = raise(level_from_str(&settings.log_level), verbosity);
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    if !settings.log_file.is_empty() {
        let path = expand_path(&settings.log_file);
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                if let Err(e) = WriteLogger::init(level, config, file) {
                    eprintln!("dasc: cannot install logger: {e}");
                }
                return;
            }
            Err(e) => eprintln!("dasc: cannot open log file {}: {e}", path.display()),
        }
    }

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("dasc: cannot install logger: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(level_from_str("debug"), LevelFilter::Debug);
        assert_eq!(level_from_str("OFF"), LevelFilter::Off);
        assert_eq!(level_from_str(" trace "), LevelFilter::Trace);
        assert_eq!(level_from_str("loud"), LevelFilter::Warn);
    }

    #[test]
    fn raise_saturates() {
        assert_eq!(raise(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(raise(LevelFilter::Warn, 1), LevelFilter::Info);
        assert_eq!(raise(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(raise(LevelFilter::Info, 9), LevelFilter::Trace);
        assert_eq!(raise(LevelFilter::Off, 1), LevelFilter::Error);
    }
}
