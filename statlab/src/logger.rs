// statlab/src/logger.rs
//! Logger setup on top of `env_logger`.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level implied by the global flags, or `None` to defer to `RUST_LOG`.
///
/// `--quiet` wins over `--disable-debug`, which wins over `--debug`.
pub fn level_from_flags(quiet: bool, debug: bool, disable_debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Error)
    } else if disable_debug {
        Some(LevelFilter::Info)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_target(false);
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_precedence() {
        assert_eq!(level_from_flags(true, true, false), Some(LevelFilter::Error));
        assert_eq!(level_from_flags(false, true, true), Some(LevelFilter::Info));
        assert_eq!(level_from_flags(false, true, false), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(false, false, false), None);
    }
}
