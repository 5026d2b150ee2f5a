use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use freeconvertor::interfaces::{convert_content, fetch_and_convert};
use freeconvertor::models::AppState;
use freeconvertor::web_handlers::interfaces;
use freeconvertor::Settings;

/// Convert Clash proxy subscriptions into Clash, V2Ray and Shadowrocket formats
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (.toml, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Subscription URL to convert directly instead of starting the server
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// Local Clash configuration to convert directly instead of starting the server
    #[arg(long, value_name = "PATH")]
    file: Option<String>,

    /// Target format for direct conversion: clash, v2ray or shadowrocket
    #[arg(short, long, value_name = "FORMAT", default_value = "clash")]
    target: String,

    /// Output file path (must be used with --url or --file)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,
}

async fn convert_once(args: &Args, state: &AppState, output: &str) -> anyhow::Result<()> {
    let result = match (&args.url, &args.file) {
        (Some(url), _) => {
            info!("Processing subscription from URL: {} to file: {}", url, output);
            fetch_and_convert(url, &args.target, &state.fetch).await?
        }
        (None, Some(path)) => {
            info!("Processing configuration from {} to file: {}", path, output);
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            convert_content(&content, &args.target)?
        }
        (None, None) => anyhow::bail!("Nothing to convert"),
    };

    tokio::fs::write(output, result.content)
        .await
        .with_context(|| format!("Failed to write output file {}", output))?;
    info!(
        "Successfully wrote {} subscription ({} nodes) to {}",
        result.target, result.node_count, output
    );
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let one_shot = args.url.is_some() || args.file.is_some();
    if one_shot != args.output.is_some() {
        eprintln!("Error: --url/--file and -o/--output must be used together");
        std::process::exit(1);
    }

    let mut settings = match args.config.as_deref() {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    // Override settings with command line arguments if provided
    if let Some(address) = &args.address {
        settings.listen_address = address.clone();
    }
    if let Some(port) = args.port {
        settings.listen_port = port;
    }

    let state = AppState::new(settings);

    if let Some(output) = args.output.as_deref() {
        if let Err(e) = convert_once(&args, &state, output).await {
            error!("{:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let listen_address = state.config.listen_addr();
    let workers = state.config.workers.max(1);
    let app_state = web::Data::new(state);

    info!("FreeConvertor starting on {}", listen_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(interfaces::config)
            .route("/", web::get().to(|| async { "FreeConvertor is running!" }))
    })
    .bind(listen_address)?
    .workers(workers)
    .run()
    .await
}
