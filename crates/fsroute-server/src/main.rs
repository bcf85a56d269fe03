use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use fsroute::{register, Config, RouteTable, TomlLoader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve a directory of route files
#[derive(Parser, Debug)]
#[command(name = "fsroute-server", version, about)]
struct Args {
    /// Config file (default: ./fsroute.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Routes directory, overrides the config file
    #[arg(short, long)]
    routes: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the route table and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!(
        routes_dir = %config.routing.routes_dir,
        extension = %config.routing.extension,
        "building route table"
    );

    let table = RouteTable::build_with(
        &config.routing.routes_dir,
        config.routing.absolute,
        config.convention(),
        &TomlLoader,
    )
    .with_context(|| format!("Failed to build routes from {}", config.routing.routes_dir))?;

    if args.list {
        print_table(&table);
        return Ok(());
    }

    let app: Router = register(&table, Router::new()).context("Failed to register routes")?;

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{} ({} routes)", addr, table.len());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Config file, then environment, then command line
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default().context("Failed to load fsroute.toml")?,
    };

    config.apply_env();

    if let Some(routes) = &args.routes {
        config.routing.routes_dir = routes.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    Ok(config)
}

fn print_table(table: &RouteTable) {
    for entry in table {
        let verbs: Vec<_> = entry.methods().verbs().map(|verb| verb.as_str()).collect();
        println!(
            "{:<32} {:<24} [{}]",
            entry.route_url(),
            entry.handler_name(),
            verbs.join(", ")
        );
    }
}
