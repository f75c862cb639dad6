use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;

use minbar::cli::args::{Cli, Commands};
use minbar::cli::handlers::{self, DisplayArgs};
use minbar::config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The board owns the terminal, so its log goes to a file.
    let is_display = matches!(cli.command, None | Some(Commands::Display { .. }));
    init_logging(is_display)?;

    let config = AppConfig::load().context("Loading config")?;

    match cli.command {
        Some(Commands::Serve { host, port }) => handlers::handle_serve(&config, host, port),
        Some(Commands::Display { masjid, duration, tz, server }) => {
            handlers::handle_display(&config, DisplayArgs { masjid, duration, tz, server })
        }
        Some(Commands::Times { masjid, tz }) => handlers::handle_times(&masjid, tz.as_deref()),
        Some(Commands::Import { file }) => handlers::handle_import(&file),
        Some(Commands::Generate { masjid, days, from }) => {
            handlers::handle_generate(&config, &masjid, days, from.as_deref())
        }
        Some(Commands::Masjids) => handlers::handle_masjids(),
        Some(Commands::Cache { action }) => handlers::handle_cache(&config, &action),
        Some(Commands::Fetch { path, navigate, server }) => handlers::handle_fetch(&config, &path, navigate, server),

        // No subcommand → launch the board
        None => handlers::handle_display(
            &config,
            DisplayArgs {
                masjid: None,
                duration: None,
                tz: None,
                server: None,
            },
        ),
    }
}

fn init_logging(to_file: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if to_file {
        AppConfig::ensure_data_dir()?;
        let path = AppConfig::log_path()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Opening log file {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
