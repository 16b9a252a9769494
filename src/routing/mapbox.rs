// HTTP client for the Mapbox Directions API

use std::{fmt, time::Duration};

use async_trait::async_trait;
use itertools::Itertools;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::{DirectionsService, Profile};
use crate::{errors::TrackerError, shipment::Coordinate};

pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

pub struct MapboxDirections {
    client: Client,
    base_url: String,
    access_token: String,
}

impl fmt::Debug for MapboxDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapboxDirections")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl MapboxDirections {
    pub fn new(
        base_url: &str,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::DirectionsClientBuild { source: e })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Request URL without the query string, which carries the token.
    pub fn request_url(&self, profile: Profile, waypoints: &[Coordinate]) -> String {
        let path = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .join(";");
        format!("{}/directions/v5/mapbox/{}/{}", self.base_url, profile, path)
    }
}

#[async_trait]
impl DirectionsService for MapboxDirections {
    async fn directions(
        &self,
        profile: Profile,
        waypoints: &[Coordinate],
    ) -> Result<Vec<[f64; 2]>, TrackerError> {
        let url = self.request_url(profile, waypoints);
        debug!("Requesting directions: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("geometries", "geojson"),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TrackerError::DirectionsRequest {
                source: e.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::DirectionsStatus {
                status: status.as_u16(),
            });
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::DirectionsDecode {
                source: e.without_url(),
            })?;

        debug!(
            "Directions response code {:?} with {} route(s)",
            body.code,
            body.routes.len()
        );
        body.routes
            .into_iter()
            .next()
            .map(|route| route.geometry.coordinates)
            .ok_or_else(|| TrackerError::NoRoutes {
                code: body.code.unwrap_or_else(|| "Unknown".to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_uses_lon_lat_pairs() {
        let client =
            MapboxDirections::new("https://api.example.test/", "secret".to_string(), Duration::from_secs(1))
                .unwrap();
        let url = client.request_url(
            Profile::DrivingTraffic,
            &[Coordinate::new(33.4484, -112.074), Coordinate::new(35.0844, -106.6504)],
        );
        assert_eq!(
            url,
            "https://api.example.test/directions/v5/mapbox/driving-traffic/-112.074,33.4484;-106.6504,35.0844"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client =
            MapboxDirections::new(DEFAULT_BASE_URL, "pk.secret".to_string(), Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", client).contains("pk.secret"));
    }

    #[test]
    fn test_response_decoding() {
        let body: DirectionsResponse = serde_json::from_str(
            r#"{"code": "Ok", "routes": [{"geometry": {"type": "LineString", "coordinates": [[-112.07, 33.44], [-111.54, 33.41]]}, "distance": 52000.1}], "waypoints": []}"#,
        )
        .unwrap();
        assert_eq!(body.routes[0].geometry.coordinates[1], [-111.54, 33.41]);

        let empty: DirectionsResponse = serde_json::from_str(r#"{"code": "NoRoute"}"#).unwrap();
        assert!(empty.routes.is_empty());
    }
}
