//! PRISM CLI and HTTP entry point.
//!
//! Binary name: `prism`
//!
//! Parses CLI arguments, opens the database and wires the dispatcher, then
//! runs the requested command or starts the tool-call server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use prism_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter, TracingOptions};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::new(verbosity_filter(cli.verbose, cli.quiet)).with_json(cli.log_json);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "prism", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.data_dir.clone()).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let addr = http::listen_addr(host, port, &state.config.server);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} PRISM listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "HTTP server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("HTTP server stopped");
        }

        Commands::Invoke {
            tool,
            params,
            caller,
        } => {
            cli::invoke::invoke(&state, &tool, params.as_deref(), caller, cli.json).await?;
        }

        Commands::Init => {
            let db_path = state.database_path();
            if cli.json {
                let info = serde_json::json!({
                    "data_dir": state.data_dir.display().to_string(),
                    "database": db_path.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!();
                println!(
                    "  {} Database ready at {}",
                    console::style("✓").green().bold(),
                    console::style(db_path.display()).cyan()
                );
                println!();
            }
        }

        Commands::Identity => {
            cli::identity::show_identity(&state, cli.json).await?;
        }

        Commands::Memories {
            user,
            memory_type,
            query,
        } => {
            cli::memory::list_memories(&state, user, memory_type, query, cli.json).await?;
        }

        Commands::Thoughts { limit } => {
            cli::thought::list_thoughts(&state, limit, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
