// src/main.rs

use clap::Parser;
use diary::cli::{Cli, Commands};
use diary::commands;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "diary=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { db } => commands::handle_init(db),
        Commands::Serve(args) => commands::handle_serve(args).await,
        Commands::HashPassword { password } => commands::handle_hash_password(password),
        Commands::List { db, tag, page } => commands::handle_list(db, tag, page),
        Commands::Show { id, db } => commands::handle_show(db, id),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
