use std::path::Path;
use std::time::SystemTime;

use color_eyre::Result;
use color_eyre::eyre::Context;
use fern::colors::{Color, ColoredLevelConfig};

/// Install the global logger.
///
/// Console records go to stderr at `console_level`. When `log_file` is given,
/// records at `file_level` and above are appended to it as well, tagged with
/// the source location they came from.
pub fn setup_logging(
    console_level: log::LevelFilter,
    log_file: Option<&Path>,
    file_level: log::LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        // sqlx statements are noisy at debug
        .level_for("sqlx", log::LevelFilter::Warn)
        .chain(console);

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .wrap_err_with(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .level(file_level)
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} {}: {} [in {}:{}]",
                        humantime::format_rfc3339_seconds(SystemTime::now()),
                        record.level(),
                        message,
                        record.file().unwrap_or("<unknown>"),
                        record.line().unwrap_or(0)
                    ))
                })
                .chain(file),
        );
    }

    dispatch.apply().wrap_err("Failed to install logger")?;
    Ok(())
}
