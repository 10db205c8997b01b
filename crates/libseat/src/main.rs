mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use libseat_core::AppContext;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the network
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "libseat", &mut std::io::stdout());
            Ok(())
        }

        // Login starts from credentials, not a stored session
        Command::Login(args) => commands::session::login(args, &cli.global).await,

        // Logout must work even when the stored token has expired
        Command::Logout => commands::session::logout(&cli.global).await,

        // Everything else resumes the stored session first
        cmd => {
            let resolved = config::resolve(&cli.global)?;
            let ctx = AppContext::new(&resolved.client)?;
            ctx.sign_in(&resolved.client.auth)
                .await
                .map_err(|e| CliError::from(e).with_profile(&resolved.profile_name))?;

            tracing::debug!(command = ?cmd, profile = %resolved.profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &ctx, &cli.global).await;

            output::flush_toasts(
                ctx.ui().drain_toasts(),
                cli.global.quiet,
                output::Painter::new(cli.global.color),
            );
            result.map_err(|e| e.with_profile(&resolved.profile_name))
        }
    }
}
