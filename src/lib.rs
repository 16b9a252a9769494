// Library interface for cargotrace
// The dashboard binary and the integration tests build on these modules

pub mod chart;
pub mod config;
pub mod errors;
pub mod map;
pub mod routing;
pub mod shipment;

// Re-export commonly used types
pub use chart::{ChartPoint, ChartSeries, prepare_chart_data};
pub use config::AppConfig;
pub use errors::TrackerError;
pub use map::{MapCanvas, MapController, RouteRequest, RouteTag};
pub use routing::{DirectionsService, MapboxDirections, Profile, RoutePath, RouteResolver};
pub use shipment::{
    Checkpoint, Coordinate, EnvironmentalReading, FixtureSource, PastShipment, Shipment,
    ShipmentSource, ShipmentStatus,
};
