// Error types for cargotrace

use snafu::Snafu;
use std::{io, path::PathBuf};

#[derive(Debug, Snafu)]
pub enum TrackerError {
    // Errors for the directions client
    #[snafu(display("Could not build the directions HTTP client"))]
    DirectionsClientBuild { source: reqwest::Error },
    #[snafu(display("Directions request failed"))]
    DirectionsRequest { source: reqwest::Error },
    #[snafu(display("Directions service answered with HTTP {status}"))]
    DirectionsStatus { status: u16 },
    #[snafu(display("Could not decode directions response"))]
    DirectionsDecode { source: reqwest::Error },
    #[snafu(display("Directions service returned no routes (code: {code})"))]
    NoRoutes { code: String },
    #[snafu(display("Need at least 2 valid waypoints, got {valid}"))]
    InsufficientWaypoints { valid: usize },

    // Config management errors
    #[snafu(display("Could not find application config directory"))]
    NoConfigDir,
    #[snafu(display("Error reading config file {}", path.display()))]
    ConfigIOError { path: PathBuf, source: io::Error },
    #[snafu(display("Error parsing config file {}", path.display()))]
    ConfigParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Shipment data errors
    #[snafu(display("Error reading shipment data file {}", path.display()))]
    ShipmentDataIOError { path: PathBuf, source: io::Error },
    #[snafu(display("Invalid shipment data"))]
    ShipmentDataParseError { source: serde_json::Error },
    #[snafu(display("Unknown shipment: {id}"))]
    UnknownShipment { id: String },

    // UI errors
    #[snafu(display("Could not start the dashboard window"))]
    DashboardStartError { source: eframe::Error },
    #[snafu(display("Could not start the async runtime"))]
    RuntimeStartError { source: io::Error },
}
