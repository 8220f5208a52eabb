use pixmaze::{
    app::App,
    config::{Config, ConfigError, USAGE},
    logging::init_file_logging,
};

fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            print!("{}", USAGE);
            return Ok(());
        }
        Err(err) => {
            eprintln!("{}\n\n{}", err, USAGE);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    let _guard = config
        .log_file
        .as_deref()
        .map(|path| init_file_logging(path, config.log_level));
    tracing::info!("Starting with {:?}", config);

    App::new(config).start()
}
