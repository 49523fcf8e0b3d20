use precise_calc::config::{Config, CONFIG_FILE_NAME};
use precise_calc::session::{Palette, Session};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error)),
    };

    // CALC_LOG wins over RUST_LOG, which wins over the config file
    let filter = EnvFilter::try_from_env("CALC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&config.logging))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(error) = config_error {
        warn!(%error, "ignoring {CONFIG_FILE_NAME}, using defaults");
    }
    debug!(path = %config.history_path().display(), format = ?config.history_format, "history store");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(
        stdin.lock(),
        stdout.lock(),
        config.open_history(),
        Palette::new(config.color),
    );
    session.run()?;

    Ok(())
}
