//! `zktx` CLI: a thin command-line façade over `zktx-proofs`.

mod cli;

use clap::Parser as _;
use cli::{Cli, Commands, KeygenCommands};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup => {
            cli::run_setup();
            Ok(())
        }
        Commands::Generate(args) => cli::run_generate(&args),
        Commands::Prove(args) => cli::run_prove(&args),
        Commands::Verify(args) => cli::run_verify(&args).map(|_| ()),
        Commands::Decrypt(args) => cli::run_decrypt(&args).map(|_| ()),
        Commands::Keygen { command } => match command {
            KeygenCommands::Apk { ask } => cli::run_keygen_apk(&ask).map(|_| ()),
            KeygenCommands::Gpk { gsk, generator } => {
                cli::run_keygen_gpk(&gsk, generator.as_deref()).map(|_| ())
            }
        },
    };

    if let Err(err) = result {
        tracing::error!(%err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
