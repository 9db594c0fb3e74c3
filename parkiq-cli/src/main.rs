use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};

use parkiq_core::FusionConfig;
use parkiq_http::{AnalysisRuntime, HttpRuntimeConfig};
use parkiq_models::ModelRegistry;

#[derive(Parser, Debug)]
#[command(name = "parkiq", version)]
#[command(about = "ParkIQ - multimodal Parkinson's screening service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP analysis service
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to bind
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
        /// Per-modality inference budget in seconds
        #[arg(long, default_value_t = 20)]
        modality_timeout: u64,
    },
    /// Verify the model registry loads and print its metadata
    Models,
}

#[tokio::main]
async fn main() {
    // Initialize JSON logging once.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter, // fallback to default if parsing fails
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
            modality_timeout,
        } => {
            let registry = match ModelRegistry::load() {
                Ok(registry) => registry,
                Err(e) => {
                    tracing::error!(error = %e, "model loading failed; refusing to serve");
                    std::process::exit(1);
                }
            };

            let config = HttpRuntimeConfig {
                enable_cors: !no_cors,
                modality_timeout_secs: modality_timeout,
                ..HttpRuntimeConfig::default()
            };
            let runtime = AnalysisRuntime::with_config(registry, FusionConfig::default(), config);

            let addr = SocketAddr::new(host, port);
            if let Err(e) = runtime.serve(addr).await {
                tracing::error!(error = %e, "server terminated");
                std::process::exit(1);
            }
        }
        Commands::Models => match ModelRegistry::load() {
            Ok(registry) => {
                let mut models = serde_json::Map::new();
                for modality in registry.loaded() {
                    if let Some(model) = registry.model(modality) {
                        models.insert(
                            modality.name().to_string(),
                            serde_json::to_value(model.info()).unwrap_or_default(),
                        );
                    }
                }
                let report = serde_json::json!({ "models": models });
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
            }
            Err(e) => {
                eprintln!("model loading failed: {e}");
                std::process::exit(1);
            }
        },
    }
}
