use clap::Parser;
use log::LevelFilter;

use aida::app::App;
use aida::cli::Cli;
use aida::config::AidaConfig;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Environment first; each command applies its own CLI overrides
    let app = App::new(AidaConfig::from_env());

    if let Err(err) = app.run(cli.command) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
