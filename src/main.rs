use clap::{Parser, Subcommand};
use paraguay_tourism::catalog::PlaceCatalog;
use paraguay_tourism::config::Settings;
use paraguay_tourism::location::{LocationResolver, DEFAULT_COUNTRY_CODE};
use paraguay_tourism::nearby::DEFAULT_RADIUS_KM;
use paraguay_tourism::{mcp, server};
use paraguay_tourism::tools::ToolSurface;
use serde::Serialize;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Paraguay Tourism: tourist places, proximity search and geolocation
///
/// Tables are printed to stderr, JSON to stdout.
///
/// Examples:
///   tourism list
///   tourism get palacio-lopez
///   tourism near --lat -25.2822 --lng -57.6352 --radius 50
///   tourism geocode "Encarnación"
///   tourism nearby --radius 100
///   tourism serve --port 3000
///   tourism mcp
#[derive(Parser)]
#[command(name = "tourism", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every tourist place.
    List,

    /// Show one place by id.
    Get {
        id: String,
    },

    /// Places within a radius of a point, nearest first.
    Near {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Radius in kilometers.
        #[arg(long)]
        radius: f64,
    },

    /// Approximate location from an IP address (default: this machine).
    Locate {
        #[arg(long)]
        ip: Option<String>,
    },

    /// Coordinates for a city, address or place name.
    Geocode {
        query: String,

        /// ISO 3166-1 alpha-2 filter; pass "" for worldwide.
        #[arg(long, default_value = DEFAULT_COUNTRY_CODE)]
        country: String,
    },

    /// Locate this machine by IP and list places around it.
    Nearby {
        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius: f64,
    },

    /// Serve the tools to an MCP client over stdin/stdout.
    Mcp,

    /// Serve the tools over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = match cli.settings.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "catalog unavailable");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let catalog: Arc<dyn PlaceCatalog> = Arc::new(catalog);
    let resolver = LocationResolver::new(&cli.settings.provider_config());
    let tools = ToolSurface::new(catalog, resolver);

    let result = match cli.command {
        Command::List => emit(&tools.list_all_tourist_places()),
        Command::Get { id } => emit(&tools.get_tourist_place_by_id(&id)),
        Command::Near { lat, lng, radius } => tools
            .find_tourist_places_by_distance(lat, lng, radius)
            .map_err(|e| e.to_string())
            .and_then(|listing| emit(&listing)),
        Command::Locate { ip } => emit(&tools.get_current_location(ip.as_deref())),
        Command::Geocode { query, country } => emit(&tools.geocode_location(&query, &country)),
        Command::Nearby { radius } => tools
            .find_nearby_tourist_places(radius)
            .map_err(|e| e.to_string())
            .and_then(|v| emit(&v)),
        Command::Mcp => serve_mcp(tools),
        Command::Serve { host, port } => serve(tools, &host, port),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

/// Table (if any) to stderr, JSON to stdout.
fn emit<T: Serialize>(payload: &T) -> Result<(), String> {
    let value = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    if let Some(table) = find_table(&value) {
        eprintln!("{}", table);
    }
    let json = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn find_table(value: &Value) -> Option<&str> {
    value
        .get("table")
        .or_else(|| value.get("places").and_then(|p| p.get("table")))
        .and_then(Value::as_str)
}

fn serve(tools: ToolSurface, host: &str, port: u16) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime
        .block_on(server::start(tools, host, port))
        .map_err(|e| format!("server error on {}:{}: {}", host, port, e))
}

fn serve_mcp(tools: ToolSurface) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime
        .block_on(mcp::serve_stdio(tools))
        .map_err(|e| format!("MCP server error: {}", e))
}
