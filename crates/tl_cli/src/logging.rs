use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Installs the global fmt subscriber once. Logs go to stderr so stdout
/// stays clean for timeline JSON.
pub fn init_logging(level: Level) {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        });
    }
}

pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, false), Level::INFO);
        assert_eq!(level_for(1, false), Level::DEBUG);
        assert_eq!(level_for(3, false), Level::TRACE);
        assert_eq!(level_for(2, true), Level::ERROR);
    }
}
