//! gee demo web server.
//!
//! Serves a small route table through the segment-trie router, or lists the
//! registered routes for a method.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gee_telemetry::{log_route_registered, log_startup, parse_log_format, TelemetryConfig};

mod routes;
mod server;

#[derive(Parser, Debug)]
#[command(name = "gee", about = "gee demo web server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the demo server.
    Serve {
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:9999")]
        listen: String,

        /// Log level (overridden by RUST_LOG).
        #[arg(long, env = "GEE_LOG_LEVEL", default_value = "info")]
        log_level: String,

        /// Log format (json or pretty).
        #[arg(long, env = "GEE_LOG_FORMAT", default_value = "json")]
        log_format: String,
    },

    /// Print the route patterns registered for a method.
    Routes {
        /// HTTP method to list.
        #[arg(long, default_value = "GET")]
        method: String,
    },
}

/// Run the routes command.
fn run_routes(method: &str) -> ExitCode {
    let router = routes::demo_router();
    let mut patterns: Vec<&str> = router
        .get_routes(method)
        .iter()
        .map(|node| node.pattern())
        .collect();
    patterns.sort_unstable();

    if patterns.is_empty() {
        eprintln!("no routes registered for {}", method.to_uppercase());
        return ExitCode::from(1);
    }
    for pattern in patterns {
        println!("{} {}", method.to_uppercase(), pattern);
    }
    ExitCode::SUCCESS
}

/// Run the serve command.
async fn run_serve(listen: &str, log_level: &str, log_format: &str) -> ExitCode {
    let format = match parse_log_format(log_format) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };
    let config = TelemetryConfig::new()
        .with_log_level(log_level)
        .with_log_format(format);
    if let Err(e) = gee_telemetry::init_logging(&config) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let addr: SocketAddr = match listen.parse() {
        Ok(a) => a,
        Err(_) => {
            eprintln!("error: invalid listen address: {}", listen);
            return ExitCode::from(1);
        }
    };

    let router = routes::demo_router();
    for method in ["GET", "POST"] {
        for node in router.get_routes(method) {
            log_route_registered!(method, pattern = node.pattern());
        }
    }
    log_startup!(service = %config.service_name, version = env!("CARGO_PKG_VERSION"));

    // Registration is finished; the router is read-only from here on.
    let router = Arc::new(router);
    match server::run(router, addr).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: failed to serve on {}: {}", addr, e);
            ExitCode::from(1)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            log_level,
            log_format,
        } => run_serve(&listen, &log_level, &log_format).await,
        Commands::Routes { method } => run_routes(&method),
    }
}
