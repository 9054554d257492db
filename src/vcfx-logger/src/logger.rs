use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;
use log::Level;
use env_logger::{Builder, Env, fmt::Color};
use std::io::Write;
use once_cell::sync::OnceCell;

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Process-wide logger, wrapping `env_logger` with an `indicatif`
/// `MultiProgress` bridge so progress bars never interleave with log lines.
#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger at the given verbosity (0 = Warn baseline).
    ///
    /// Respects the `VCFX_LOG` environment variable as an override, the same
    /// way `RUST_LOG` would for a plain `env_logger` setup.
    pub fn init(verbosity: u8) {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default().filter("VCFX_LOG");

        let logger = Builder::new()
            .filter_level(log_level)
            .format(|buf, record| {
                let traceback: String;
                let set_intensity: bool;
                if record.level() == LevelFilter::Error {
                    traceback = format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0));
                    set_intensity = true;
                } else {
                    traceback = String::new();
                    set_intensity = false;
                }

                let mut arg_style = buf.style();
                arg_style.set_intense(set_intensity);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan,
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .expect("Failed to wrap logger with multiprogress");
        let _ = INSTANCE.set(Self { multi_pg });
    }

    /// `-q/--quiet` maps to `0` (errors only); repeats of `--verbose` raise
    /// one level at a time.
    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Warn,
            1            => LevelFilter::Info,
            2            => LevelFilter::Debug,
            3..=u8::MAX  => LevelFilter::Trace,
        }
    }

    /// Force all informational output off, keeping only `Error` records.
    pub fn quiet() -> LevelFilter {
        LevelFilter::Error
    }

    pub fn set_level(level: LevelFilter) {
        log::set_max_level(level);
    }

    /// Handle to the shared `MultiProgress`, for tools that draw progress bars.
    pub fn multi() -> &'static MultiProgress {
        &INSTANCE.get().expect("Logger::init was never called").multi_pg
    }
}

/// Convenience entry point used by every `src/bin/*` tool adapter.
pub fn init(verbosity: u8, quiet: bool) {
    Logger::init(verbosity);
    if quiet {
        Logger::set_level(Logger::quiet());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_expected_level() {
        assert_eq!(Logger::u8_to_loglevel(0), LevelFilter::Warn);
        assert_eq!(Logger::u8_to_loglevel(1), LevelFilter::Info);
        assert_eq!(Logger::u8_to_loglevel(2), LevelFilter::Debug);
        assert_eq!(Logger::u8_to_loglevel(3), LevelFilter::Trace);
        assert_eq!(Logger::u8_to_loglevel(255), LevelFilter::Trace);
    }
}
