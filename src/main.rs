mod ui;

use std::{path::PathBuf, sync::Arc};

use cargotrace::{
    AppConfig, FixtureSource, MapboxDirections, RouteResolver, ShipmentSource, TrackerError,
    config::ACCESS_TOKEN_ENV,
};
use clap::Parser;
use egui::Vec2;
use log::{error, info};
use ui::dashboard::DashboardApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directions API token; overrides the environment and the config file
    #[arg(long)]
    access_token: Option<String>,

    /// Shipment selected at startup
    #[arg(short, long, value_name = "SHIPMENT_ID")]
    select: Option<String>,

    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shipments JSON file to show instead of the demo data
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, TrackerError> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::from_local_file()?.unwrap_or_default()),
    }
}

fn build_resolver(config: &AppConfig, token: Option<String>) -> Result<RouteResolver, TrackerError> {
    match token {
        Some(token) => {
            let client =
                MapboxDirections::new(&config.directions.base_url, token, config.directions.timeout())?;
            info!("Road-snapped routing enabled via {}", config.directions.base_url);
            Ok(RouteResolver::new(Arc::new(client)))
        }
        None => {
            info!("No directions token, routes are drawn as straight lines");
            Ok(RouteResolver::offline())
        }
    }
}

fn dashboard(args: Args) -> Result<(), TrackerError> {
    let config = load_config(args.config.as_ref())?;
    let source = match &args.data {
        Some(path) => FixtureSource::from_file(path)?,
        None => FixtureSource::builtin()?,
    };

    let initial = match &args.select {
        Some(id) => source
            .active_shipments()
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| TrackerError::UnknownShipment { id: id.clone() })?,
        None => config.initial_selection,
    };

    let env_token = std::env::var(ACCESS_TOKEN_ENV).ok();
    let token = config.resolve_access_token(args.access_token.as_deref(), env_token.as_deref());
    let resolver = build_resolver(&config, token)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| TrackerError::RuntimeStartError { source: e })?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("Cargo Trace")
        .with_inner_size(Vec2::new(1280., 860.));

    eframe::run_native(
        "Cargo Trace",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                Box::new(source),
                resolver,
                runtime,
                &config,
                initial,
                cc,
            )))
        }),
    )
    .map_err(|e| TrackerError::DashboardStartError { source: e })
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let args = Args::parse();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        error!("Could not set Ctrl-C handler: {}", e);
    }

    if let Err(e) = dashboard(args) {
        error!("{}", e);
        eprintln!("cargotrace: {}", e);
        std::process::exit(1);
    }
}
