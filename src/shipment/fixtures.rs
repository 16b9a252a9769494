// Read-only shipment data providers

use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use super::{PastShipment, Shipment};
use crate::errors::TrackerError;

const BUILTIN_SHIPMENTS: &str = include_str!("../../data/shipments.json");

/// Source of the shipments shown on the dashboard.
///
/// The built-in demo catalog and JSON files exported from a tracking system
/// both implement this; the chart preparer and the route resolver only ever
/// see the `Shipment` values it hands out.
pub trait ShipmentSource {
    fn active_shipments(&self) -> &[Shipment];

    fn past_shipments(&self) -> &[PastShipment];

    fn find_active(&self, id: &str) -> Option<&Shipment> {
        self.active_shipments().iter().find(|s| s.id == id)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentCatalog {
    pub active_shipments: Vec<Shipment>,
    pub past_shipments: Vec<PastShipment>,
}

pub struct FixtureSource {
    catalog: ShipmentCatalog,
}

impl FixtureSource {
    pub fn new(catalog: ShipmentCatalog) -> Self {
        Self { catalog }
    }

    /// Demo catalog compiled into the binary.
    pub fn builtin() -> Result<Self, TrackerError> {
        Self::from_json(BUILTIN_SHIPMENTS)
    }

    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        let catalog: ShipmentCatalog = serde_json::from_str(json)
            .map_err(|e| TrackerError::ShipmentDataParseError { source: e })?;
        Ok(Self::new(catalog))
    }

    pub fn from_file(path: &Path) -> Result<Self, TrackerError> {
        let content = fs::read_to_string(path).map_err(|e| TrackerError::ShipmentDataIOError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let source = Self::from_json(&content)?;
        info!(
            "Loaded {:?}, found {} active and {} past shipments",
            path,
            source.catalog.active_shipments.len(),
            source.catalog.past_shipments.len()
        );
        Ok(source)
    }
}

impl ShipmentSource for FixtureSource {
    fn active_shipments(&self) -> &[Shipment] {
        &self.catalog.active_shipments
    }

    fn past_shipments(&self) -> &[PastShipment] {
        &self.catalog.past_shipments
    }
}
