//! beacon CLI
//!
//! Command-line interface for inspecting an Eureka-compatible registry.

use anyhow::{bail, Result};
use beacon_core::{Application, RegistryConfig};
use beacon_registry::{local_ipv4_addresses, RegistryClient};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// beacon - client for Eureka-compatible service registries
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Registry base URL, including any path prefix
    #[arg(long, default_value = "http://127.0.0.1:8761/eureka", global = true)]
    registry: String,

    /// Basic auth user name
    #[arg(long, global = true)]
    username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all applications known to the registry
    Apps,

    /// Show the instances of one application
    App {
        /// Application name
        name: String,
    },

    /// Show a single instance
    Instance {
        /// Application name
        app: String,

        /// Instance id (e.g. 10.0.0.1:demo:8080)
        instance_id: String,
    },

    /// List the host's non-loopback IPv4 addresses
    Addrs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = RegistryClient::new(RegistryConfig {
        base_url: cli.registry,
        username: cli.username,
        password: cli.password,
        ..Default::default()
    });

    match cli.command {
        Commands::Apps => {
            let envelope = client.fetch_all_applications().await?;
            let Some(apps) = envelope.applications else {
                bail!("registry response carried no application list");
            };

            println!("{:<32} {:>9}", "APPLICATION", "INSTANCES");
            for app in &apps.applications {
                println!("{:<32} {:>9}", app.name, app.instances.len());
            }
        }
        Commands::App { name } => {
            let envelope = client.fetch_application(&name).await?;
            let Some(app) = envelope.application else {
                bail!("registry response carried no application");
            };
            print_application(&app);
        }
        Commands::Instance { app, instance_id } => {
            let envelope = client.fetch_instance(&app, &instance_id).await?;
            let Some(instance) = envelope.instance else {
                bail!("registry response carried no instance");
            };

            println!("Instance:  {}", instance.instance_id);
            println!("App:       {}", instance.app);
            println!("Host:      {}", instance.host_name);
            println!("Address:   {}:{}", instance.ip_addr, instance.port.port);
            println!("Status:    {}", instance.status);
            for (key, value) in &instance.metadata {
                println!("Metadata:  {}={}", key, value);
            }
        }
        Commands::Addrs => {
            for addr in local_ipv4_addresses()? {
                println!("{}", addr);
            }
        }
    }

    Ok(())
}

fn print_application(app: &Application) {
    println!(
        "{:<40} {:<22} {:<15}",
        "INSTANCE", "ADDRESS", "STATUS"
    );
    for instance in &app.instances {
        println!(
            "{:<40} {:<22} {:<15}",
            instance.instance_id,
            format!("{}:{}", instance.ip_addr, instance.port.port),
            instance.status.to_string()
        );
    }
}
