// Route resolution: road-snapped directions with a straight-line fallback

pub mod mapbox;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::{
    errors::TrackerError,
    shipment::{Checkpoint, Coordinate},
};

pub use mapbox::MapboxDirections;

/// Upper bound on waypoints accepted by the directions service.
pub const MAX_WAYPOINTS: usize = 25;

/// Routing profile understood by the directions service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Profile {
    Driving,
    DrivingTraffic,
    Walking,
    Cycling,
}

impl Profile {
    /// Maps a shipment transport hint onto a routing profile.
    ///
    /// Unknown hints fall back to `Driving`.
    pub fn from_transport(transport: &str) -> Self {
        match transport {
            "truck" | "driving-traffic" => Self::DrivingTraffic,
            "walking" | "pedestrian" => Self::Walking,
            "cycling" | "bicycle" => Self::Cycling,
            "driving" => Self::Driving,
            other => {
                warn!("Unknown transport type {:?}, routing as driving", other);
                Self::Driving
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::DrivingTraffic => "driving-traffic",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable path.
///
/// Snapped paths keep the directions service's `[lon, lat]` pairs untouched;
/// use [`RoutePath::points`] to get coordinates in a uniform order.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutePath {
    Snapped(Vec<[f64; 2]>),
    StraightLine(Vec<Coordinate>),
}

impl RoutePath {
    pub fn points(&self) -> Vec<Coordinate> {
        match self {
            Self::Snapped(pairs) => pairs.iter().copied().map(Coordinate::from_lon_lat).collect(),
            Self::StraightLine(points) => points.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Snapped(pairs) => pairs.len(),
            Self::StraightLine(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_snapped(&self) -> bool {
        matches!(self, Self::Snapped(_))
    }
}

/// Remote directions lookup.
#[async_trait]
pub trait DirectionsService: Send + Sync {
    /// Returns the first candidate route as `[lon, lat]` pairs.
    async fn directions(
        &self,
        profile: Profile,
        waypoints: &[Coordinate],
    ) -> Result<Vec<[f64; 2]>, TrackerError>;
}

/// Straight segments through every checkpoint with well-formed coordinates.
pub fn straight_line(checkpoints: &[Checkpoint]) -> RoutePath {
    RoutePath::StraightLine(checkpoints.iter().filter_map(Checkpoint::coordinate).collect())
}

#[derive(Clone, Default)]
pub struct RouteResolver {
    service: Option<Arc<dyn DirectionsService>>,
}

impl RouteResolver {
    pub fn new(service: Arc<dyn DirectionsService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// Resolver without credentials; always draws straight lines.
    pub fn offline() -> Self {
        Self { service: None }
    }

    pub fn is_online(&self) -> bool {
        self.service.is_some()
    }

    /// Resolves the path for a shipment's checkpoints.
    ///
    /// Never fails: any problem with the remote lookup yields the straight
    /// line through the checkpoints instead.
    pub async fn resolve(&self, checkpoints: &[Checkpoint], transport: &str) -> RoutePath {
        let profile = Profile::from_transport(transport);

        let service = match &self.service {
            Some(service) if checkpoints.len() >= 2 => service,
            Some(_) => {
                debug!("Only {} checkpoint(s), skipping directions lookup", checkpoints.len());
                return straight_line(checkpoints);
            }
            None => {
                debug!("No directions service configured, drawing straight route");
                return straight_line(checkpoints);
            }
        };

        match self.snap(service.as_ref(), checkpoints, profile).await {
            Ok(path) => {
                info!("Resolved {} route with {} points", profile, path.len());
                RoutePath::Snapped(path)
            }
            Err(e) => {
                warn!("Directions lookup failed, drawing straight route: {}", e);
                straight_line(checkpoints)
            }
        }
    }

    async fn snap(
        &self,
        service: &dyn DirectionsService,
        checkpoints: &[Checkpoint],
        profile: Profile,
    ) -> Result<Vec<[f64; 2]>, TrackerError> {
        let mut waypoints = Vec::with_capacity(checkpoints.len());
        for checkpoint in checkpoints {
            match checkpoint.coordinate() {
                Some(coordinate) => waypoints.push(coordinate),
                None => warn!(
                    "Ignoring checkpoint {:?} with malformed coordinates {:?}",
                    checkpoint.location, checkpoint.coords
                ),
            }
        }
        if waypoints.len() < 2 {
            return Err(TrackerError::InsufficientWaypoints {
                valid: waypoints.len(),
            });
        }
        if waypoints.len() > MAX_WAYPOINTS {
            debug!("Truncating {} waypoints to {}", waypoints.len(), MAX_WAYPOINTS);
            waypoints.truncate(MAX_WAYPOINTS);
        }

        let path = service.directions(profile, &waypoints).await?;
        if path.is_empty() {
            return Err(TrackerError::NoRoutes {
                code: "EmptyGeometry".to_string(),
            });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::test_support::checkpoint;
    use proptest::prelude::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<(Profile, Vec<Coordinate>)>>,
        response: Option<Vec<[f64; 2]>>,
    }

    impl RecordingService {
        fn answering(response: Vec<[f64; 2]>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response: Some(response),
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn calls(&self) -> Vec<(Profile, Vec<Coordinate>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DirectionsService for RecordingService {
        async fn directions(
            &self,
            profile: Profile,
            waypoints: &[Coordinate],
        ) -> Result<Vec<[f64; 2]>, TrackerError> {
            self.calls.lock().unwrap().push((profile, waypoints.to_vec()));
            self.response.clone().ok_or(TrackerError::DirectionsStatus { status: 503 })
        }
    }

    fn route(n: usize) -> Vec<Checkpoint> {
        (0..n)
            .map(|i| checkpoint("March 2, 2025 - 08:15 AM", &format!("Stop {i}"), [33. + i as f64 * 0.1, -112.]))
            .collect()
    }

    fn resolve(resolver: &RouteResolver, checkpoints: &[Checkpoint], transport: &str) -> RoutePath {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(resolver.resolve(checkpoints, transport))
    }

    #[test]
    fn test_profile_normalization() {
        assert_eq!(Profile::from_transport("truck"), Profile::DrivingTraffic);
        assert_eq!(Profile::from_transport("pedestrian"), Profile::Walking);
        assert_eq!(Profile::from_transport("walking"), Profile::Walking);
        assert_eq!(Profile::from_transport("bicycle"), Profile::Cycling);
        assert_eq!(Profile::from_transport("cycling"), Profile::Cycling);
        assert_eq!(Profile::from_transport("driving"), Profile::Driving);
        assert_eq!(Profile::from_transport("driving-traffic"), Profile::DrivingTraffic);
        assert_eq!(Profile::from_transport("plane"), Profile::Driving);
        assert_eq!(Profile::from_transport(""), Profile::Driving);
    }

    #[test]
    fn test_single_checkpoint_never_calls_service() {
        let service = Arc::new(RecordingService::answering(vec![[-112., 33.], [-111., 34.]]));
        let resolver = RouteResolver::new(service.clone());
        let checkpoints = route(1);

        let path = resolve(&resolver, &checkpoints, "truck");

        assert_eq!(path, RoutePath::StraightLine(vec![Coordinate::new(33., -112.)]));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_offline_resolver_draws_straight_line() {
        let checkpoints = vec![
            checkpoint("March 2, 2025 - 08:15 AM", "Phoenix, AZ", [33.4484, -112.074]),
            checkpoint("March 2, 2025 - 09:40 AM", "Apache Junction, AZ", [33.415, -111.545]),
        ];
        let path = resolve(&RouteResolver::offline(), &checkpoints, "truck");
        assert_eq!(
            path,
            RoutePath::StraightLine(vec![
                Coordinate::new(33.4484, -112.074),
                Coordinate::new(33.415, -111.545),
            ])
        );
    }

    #[test]
    fn test_all_malformed_coordinates_give_empty_fallback() {
        let service = Arc::new(RecordingService::answering(vec![[0., 0.], [1., 1.]]));
        let resolver = RouteResolver::new(service.clone());
        let mut checkpoints = route(3);
        for cp in &mut checkpoints {
            cp.coords = vec![];
        }

        let path = resolve(&resolver, &checkpoints, "truck");

        assert!(service.calls().is_empty());
        assert_eq!(path, RoutePath::StraightLine(vec![]));
    }

    #[test]
    fn test_truck_sends_driving_traffic_in_lon_lat_order() {
        let snapped = vec![[-112.074, 33.4484], [-111.9, 33.45], [-111.545, 33.415]];
        let service = Arc::new(RecordingService::answering(snapped.clone()));
        let resolver = RouteResolver::new(service.clone());
        let checkpoints = vec![
            checkpoint("March 2, 2025 - 08:15 AM", "Phoenix, AZ", [33.4484, -112.074]),
            checkpoint("March 2, 2025 - 09:40 AM", "Apache Junction, AZ", [33.415, -111.545]),
        ];

        let path = resolve(&resolver, &checkpoints, "truck");

        assert_eq!(path, RoutePath::Snapped(snapped));
        assert_eq!(path.points()[0], Coordinate::new(33.4484, -112.074));
        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Profile::DrivingTraffic);
        assert_eq!(calls[0].1[0].to_lon_lat(), [-112.074, 33.4484]);
    }

    #[test]
    fn test_waypoints_truncated_to_limit() {
        let service = Arc::new(RecordingService::answering(vec![[0., 0.], [1., 1.]]));
        let resolver = RouteResolver::new(service.clone());

        resolve(&resolver, &route(40), "driving");

        assert_eq!(service.calls()[0].1.len(), MAX_WAYPOINTS);
    }

    #[test]
    fn test_malformed_coordinates_are_dropped() {
        let service = Arc::new(RecordingService::answering(vec![[0., 0.], [1., 1.]]));
        let resolver = RouteResolver::new(service.clone());
        let mut checkpoints = route(3);
        checkpoints[1].coords = vec![33.1];

        resolve(&resolver, &checkpoints, "driving");

        assert_eq!(service.calls()[0].1.len(), 2);
    }

    #[test]
    fn test_too_few_valid_waypoints_falls_back() {
        let service = Arc::new(RecordingService::answering(vec![[0., 0.], [1., 1.]]));
        let resolver = RouteResolver::new(service.clone());
        let mut checkpoints = route(2);
        checkpoints[0].coords = vec![];

        let path = resolve(&resolver, &checkpoints, "driving");

        assert!(service.calls().is_empty());
        assert_eq!(
            path,
            RoutePath::StraightLine(vec![checkpoints[1].coordinate().unwrap()])
        );
    }

    #[test]
    fn test_failing_service_falls_back_to_straight_line() {
        let service = Arc::new(RecordingService::failing());
        let resolver = RouteResolver::new(service.clone());
        let checkpoints = route(4);

        let path = resolve(&resolver, &checkpoints, "truck");

        assert_eq!(service.calls().len(), 1);
        assert_eq!(path, straight_line(&checkpoints));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_empty_geometry_falls_back() {
        let resolver = RouteResolver::new(Arc::new(RecordingService::answering(vec![])));
        let path = resolve(&resolver, &route(2), "driving");
        assert!(!path.is_snapped());
        assert_eq!(path.len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_unknown_transport_routes_as_driving(hint in "[a-z]{1,12}") {
            prop_assume!(!["truck", "walking", "pedestrian", "cycling", "bicycle", "driving"].contains(&hint.as_str()));
            prop_assert_eq!(Profile::from_transport(&hint), Profile::Driving);
        }

        #[test]
        fn prop_failed_lookup_keeps_every_valid_checkpoint(n in 2usize..40) {
            let checkpoints = route(n);
            let resolver = RouteResolver::new(Arc::new(RecordingService::failing()));
            let path = resolve(&resolver, &checkpoints, "truck");
            prop_assert_eq!(path.len(), n);
        }
    }
}
