//! Command line front end for the drop-off route optimizer

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

use drop_route::error::{Error, Result};
use drop_route::models::Address;
use drop_route::oracle::{GeocodedOracle, HaversineOracle, RoadNetworkOracle};
use drop_route::render::{build_link, marker_labels, resolve_coordinates, MapRenderer};
use drop_route::services::{AddressSuggester, Gazetteer};
use drop_route::{
    CancellationToken, DistanceOracle, DropOff, MatrixOracle, OptimizerConfig, RouteOptimizer,
    TripRequest,
};

#[derive(Parser)]
#[command(version, about, author, long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the shortest visiting order for a trip
    Optimize(OptimizeArgs),

    /// Autocomplete an address against a gazetteer
    Suggest {
        #[arg(long, value_name = "FILE")]
        gazetteer: PathBuf,

        #[arg(long, default_value_t = 5)]
        limit: usize,

        query: String,
    },
}

#[derive(Args)]
struct OptimizeArgs {
    /// Start location
    #[arg(long)]
    start: Option<String>,

    /// Drop-off, optionally prefixed with the employee name
    #[arg(long = "drop", value_name = "[NAME=]ADDRESS")]
    drops: Vec<String>,

    /// Fixed end; defaults to the last drop-off
    #[arg(long)]
    end: Option<String>,

    /// Trip request as JSON instead of --start/--drop/--end
    #[arg(long, value_name = "FILE", conflicts_with_all = ["start", "drops", "end"])]
    request: Option<PathBuf>,

    /// Directed leg cost table
    #[arg(long, value_name = "FILE")]
    matrix: Option<PathBuf>,

    /// Known places used for geocoding and map rendering
    #[arg(long, value_name = "FILE")]
    gazetteer: Option<PathBuf>,

    #[arg(long, value_name = "FILE", requires = "road_edges")]
    road_vertices: Option<PathBuf>,

    #[arg(long, value_name = "FILE", requires = "road_vertices")]
    road_edges: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    max_stops: Option<usize>,

    #[arg(long)]
    workers: Option<usize>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write an SVG route map (needs --gazetteer)
    #[arg(long, value_name = "SVG")]
    map: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    route: Vec<Stop<'a>>,
    total_distance: f64,
    link: String,
}

#[derive(Serialize)]
struct Stop<'a> {
    address: &'a str,
    name: Option<String>,
}

type AddressOracle = Box<dyn DistanceOracle<Location = Address>>;

fn parse_drop(value: &str) -> DropOff {
    match value.split_once('=') {
        Some((name, address)) if !name.trim().is_empty() => {
            DropOff::named(name.trim(), address.trim())
        }
        _ => DropOff::new(value.trim()),
    }
}

fn load_request(args: &OptimizeArgs) -> Result<TripRequest> {
    if let Some(path) = &args.request {
        return Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?);
    }

    let mut request = TripRequest::new(args.start.clone().unwrap_or_default());
    for drop in &args.drops {
        request.add_drop_off(parse_drop(drop));
    }
    if let Some(end) = &args.end {
        request.set_end(end.clone());
    }
    Ok(request)
}

fn load_config(args: &OptimizeArgs) -> Result<OptimizerConfig> {
    let mut config = match &args.config {
        Some(path) => OptimizerConfig::from_json_file(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(max_stops) = args.max_stops {
        config.max_stops = max_stops;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.timeout_ms.is_some() {
        config.timeout_ms = args.timeout_ms;
    }
    config.validate()?;
    Ok(config)
}

fn load_oracle(args: &OptimizeArgs, gazetteer: Option<&Gazetteer>) -> Result<AddressOracle> {
    if let Some(path) = &args.matrix {
        info!("Using leg table {}", path.display());
        return Ok(Box::new(MatrixOracle::from_json_file(path)?));
    }

    let gazetteer = gazetteer.cloned().ok_or_else(|| {
        Error::Config("no distance source, pass --matrix or --gazetteer".to_string())
    })?;

    match (&args.road_vertices, &args.road_edges) {
        (Some(vertices), Some(edges)) => {
            info!("Using road network from {}", vertices.display());
            let network = RoadNetworkOracle::from_files(vertices, edges)?;
            Ok(Box::new(GeocodedOracle::new(gazetteer, network)))
        }
        _ => {
            info!("Using straight-line distances between geocoded addresses");
            Ok(Box::new(GeocodedOracle::new(gazetteer, HaversineOracle::new())))
        }
    }
}

fn install_interrupt_handler(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!("Cannot install interruption handler: {}", e);
    }
}

fn optimize(args: OptimizeArgs) -> Result<()> {
    let request = load_request(&args)?;
    trace!("Trip request: {:?}", request);
    let config = load_config(&args)?;
    debug!("Optimizer config: {:?}", config);

    let gazetteer = args
        .gazetteer
        .as_ref()
        .map(Gazetteer::from_json_file)
        .transpose()?;
    let oracle = load_oracle(&args, gazetteer.as_ref())?;
    let optimizer = RouteOptimizer::with_config(oracle, config)?;

    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);

    let result = optimizer.plan(&request, &cancel)?;
    let link = build_link(&result.route);

    if let Some(path) = &args.map {
        let gazetteer = gazetteer
            .as_ref()
            .ok_or_else(|| Error::Config("--map needs --gazetteer".to_string()))?;
        let coordinates = resolve_coordinates(&result.route, gazetteer)?;
        let labels = marker_labels(&result.route, Some(&request));
        MapRenderer::default().render_to_file(&result.route, &coordinates, &labels, path)?;
    }

    if args.json {
        let report = Report {
            route: result
                .route
                .locations()
                .iter()
                .map(|address| Stop {
                    address,
                    name: request.label(address),
                })
                .collect(),
            total_distance: result.total_distance,
            link,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Optimized Route:");
    for (i, address) in result.route.locations().iter().enumerate() {
        match request.label(address) {
            Some(name) => println!("{}. {} ({})", i + 1, address, name),
            None => println!("{}. {}", i + 1, address),
        }
    }
    println!("Total distance: {:.2}", result.total_distance);
    println!("Open in Google Maps: {}", link);

    Ok(())
}

fn suggest(gazetteer: PathBuf, limit: usize, query: String) -> Result<()> {
    let gazetteer = Gazetteer::from_json_file(gazetteer)?.with_limit(limit);
    for suggestion in gazetteer.suggest(&query) {
        println!("{}", suggestion);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .init();
    debug!("Verbose level: {}", cli.verbose);

    let outcome = match cli.command {
        Command::Optimize(args) => optimize(args),
        Command::Suggest {
            gazetteer,
            limit,
            query,
        } => suggest(gazetteer, limit, query),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
