mod benchmark;
mod commands;
mod credentials;
mod settings;
mod summary;

use clap::Parser;

use crate::args::{CliArgs, Command};
use crate::config::load_config;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    let _logger = init_logging(&loaded.config.logging, &loaded.paths)?;

    match args.command {
        Command::Signup(signup) => commands::signup(&signup, &loaded.config, &loaded.paths),
        Command::Models { provider } => commands::list_models(provider.as_deref()),
        Command::Init { force } => commands::init_config(&loaded, force),
        Command::Run(run_args) => benchmark::run_benchmark(&run_args, &loaded).await,
    }
}
