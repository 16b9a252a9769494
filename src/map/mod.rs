// Map glue: checkpoint markers, route overlay and the live canvas lifecycle

use log::{debug, warn};

use crate::{
    routing::RoutePath,
    shipment::{Checkpoint, Coordinate, FreightMode, ReadingKind, Shipment},
};

/// RGB colors used for markers and the route line.
pub mod colors {
    pub const FUTURE: [u8; 3] = [0x9c, 0xa3, 0xaf];
    pub const COMPLETED: [u8; 3] = [0x10, 0xb9, 0x81];
    pub const CURRENT: [u8; 3] = [0x3b, 0x82, 0xf6];
    pub const ROUTE: [u8; 3] = [0x3b, 0x82, 0xf6];
}

pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerState {
    Future,
    Completed,
    Current,
}

impl MarkerState {
    pub fn of(shipment: &Shipment, checkpoint: &Checkpoint) -> Self {
        if shipment.is_current(checkpoint) {
            Self::Current
        } else if checkpoint.completed {
            Self::Completed
        } else {
            Self::Future
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Future => colors::FUTURE,
            Self::Completed => colors::COMPLETED,
            Self::Current => colors::CURRENT,
        }
    }
}

/// Text shown when a marker is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub title: String,
    pub status: String,
    pub time: String,
    /// `(label, formatted value)`; empty when the checkpoint has no readings
    pub readings: Vec<(&'static str, String)>,
}

impl Popup {
    pub fn for_checkpoint(checkpoint: &Checkpoint) -> Self {
        let readings = checkpoint
            .env_data
            .as_ref()
            .map(|reading| {
                ReadingKind::ALL
                    .iter()
                    .map(|kind| (kind.label(), kind.format(kind.value(reading))))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            title: checkpoint.location.clone(),
            status: checkpoint.status.clone(),
            time: checkpoint.time.clone(),
            readings,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub state: MarkerState,
    pub popup: Popup,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStyle {
    pub color: [u8; 3],
    pub width: f32,
    pub opacity: f32,
    pub dashed: bool,
}

impl RouteStyle {
    pub fn for_mode(mode: FreightMode) -> Self {
        Self {
            color: colors::ROUTE,
            width: 3.,
            opacity: 0.7,
            dashed: mode == FreightMode::Air,
        }
    }
}

/// A drawing surface for one shipment's map.
pub trait MapCanvas {
    fn add_marker(&mut self, marker: Marker);

    fn draw_route(&mut self, points: Vec<Coordinate>, style: RouteStyle);

    /// Frees whatever the canvas holds. Called exactly once.
    fn release(&mut self);
}

/// Identity of the selection a route request was made for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteTag {
    pub shipment_id: String,
    pub generation: u64,
}

/// Everything needed to resolve a route off the UI thread.
#[derive(Clone, Debug)]
pub struct RouteRequest {
    pub tag: RouteTag,
    pub checkpoints: Vec<Checkpoint>,
    pub transport_type: String,
}

/// The canvas for the current selection. Releases it on drop.
pub struct MapSession<C: MapCanvas> {
    canvas: C,
    tag: RouteTag,
    style: RouteStyle,
}

impl<C: MapCanvas> MapSession<C> {
    fn open(mut canvas: C, shipment: &Shipment, tag: RouteTag) -> Self {
        let style = RouteStyle::for_mode(shipment.mode);
        for checkpoint in &shipment.checkpoints {
            let Some(position) = checkpoint.coordinate() else {
                warn!(
                    "No marker for {:?}, malformed coordinates {:?}",
                    checkpoint.location, checkpoint.coords
                );
                continue;
            };
            canvas.add_marker(Marker {
                position,
                state: MarkerState::of(shipment, checkpoint),
                popup: Popup::for_checkpoint(checkpoint),
            });
        }
        Self { canvas, tag, style }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn tag(&self) -> &RouteTag {
        &self.tag
    }
}

impl<C: MapCanvas> Drop for MapSession<C> {
    fn drop(&mut self) {
        debug!("Releasing map canvas for {}", self.tag.shipment_id);
        self.canvas.release();
    }
}

/// Owns the single live map canvas and guards it against stale routes.
pub struct MapController<C: MapCanvas, F: FnMut() -> C> {
    factory: F,
    session: Option<MapSession<C>>,
    generation: u64,
}

impl<C: MapCanvas, F: FnMut() -> C> MapController<C, F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: None,
            generation: 0,
        }
    }

    /// Replaces the canvas with a fresh one for `shipment` and returns the
    /// route request to run for it.
    pub fn select(&mut self, shipment: &Shipment) -> RouteRequest {
        // the old canvas goes before the new one exists
        self.session = None;
        self.generation += 1;

        let tag = RouteTag {
            shipment_id: shipment.id.clone(),
            generation: self.generation,
        };
        let canvas = (self.factory)();
        self.session = Some(MapSession::open(canvas, shipment, tag.clone()));

        RouteRequest {
            tag,
            checkpoints: shipment.checkpoints.clone(),
            transport_type: shipment.transport_type.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.session = None;
    }

    /// Draws a resolved route if it belongs to the current selection.
    ///
    /// Returns `false` when the result was discarded as stale.
    pub fn apply_route(&mut self, tag: &RouteTag, path: &RoutePath) -> bool {
        match self.session.as_mut() {
            Some(session) if session.tag == *tag => {
                // nothing drawable when fewer than two checkpoints had usable coordinates
                if path.len() < 2 {
                    debug!("Route for {} has {} point(s), not drawing a line", tag.shipment_id, path.len());
                    return true;
                }
                let style = session.style;
                session.canvas.draw_route(path.points(), style);
                true
            }
            _ => {
                debug!(
                    "Discarding stale route for {} (generation {})",
                    tag.shipment_id, tag.generation
                );
                false
            }
        }
    }

    pub fn session(&self) -> Option<&MapSession<C>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut MapSession<C>> {
        self.session.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::test_support::{checkpoint, reading, shipment};
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct Counters {
        created: usize,
        released: usize,
        live: usize,
        max_live: usize,
    }

    struct RecordingCanvas {
        counters: Rc<RefCell<Counters>>,
        markers: Vec<Marker>,
        routes: Vec<(Vec<Coordinate>, RouteStyle)>,
    }

    impl MapCanvas for RecordingCanvas {
        fn add_marker(&mut self, marker: Marker) {
            self.markers.push(marker);
        }

        fn draw_route(&mut self, points: Vec<Coordinate>, style: RouteStyle) {
            self.routes.push((points, style));
        }

        fn release(&mut self) {
            let mut counters = self.counters.borrow_mut();
            counters.released += 1;
            counters.live -= 1;
        }
    }

    fn controller(
        counters: Rc<RefCell<Counters>>,
    ) -> MapController<RecordingCanvas, impl FnMut() -> RecordingCanvas> {
        MapController::new(move || {
            {
                let mut c = counters.borrow_mut();
                c.created += 1;
                c.live += 1;
                c.max_live = c.max_live.max(c.live);
            }
            RecordingCanvas {
                counters: counters.clone(),
                markers: Vec::new(),
                routes: Vec::new(),
            }
        })
    }

    fn sample_shipment() -> Shipment {
        let mut done = checkpoint("March 2, 2025 - 07:15 PM", "Gallup, NM", [35.5281, -108.7426]);
        done.env_data = Some(reading(10.4, None));
        let mut current = checkpoint("March 2, 2025 - 08:30 PM", "Grants, NM", [35.148, -107.8514]);
        current.completed = false;
        let mut future = checkpoint("March 3, 2025 - 11:30 AM", "Albuquerque, NM", [35.0844, -106.6504]);
        future.completed = false;
        shipment(vec![done, current, future], "Grants, NM")
    }

    #[test]
    fn test_marker_states() {
        let shipment = sample_shipment();
        let states: Vec<MarkerState> = shipment
            .checkpoints
            .iter()
            .map(|cp| MarkerState::of(&shipment, cp))
            .collect();
        assert_eq!(
            states,
            vec![MarkerState::Completed, MarkerState::Current, MarkerState::Future]
        );
    }

    #[test]
    fn test_current_wins_over_completed() {
        let mut shipment = sample_shipment();
        shipment.checkpoints[1].completed = true;
        assert_eq!(
            MarkerState::of(&shipment, &shipment.checkpoints[1]),
            MarkerState::Current
        );
        assert_eq!(MarkerState::Current.color(), colors::CURRENT);
    }

    #[test]
    fn test_popup_shows_na_for_missing_readings() {
        let shipment = sample_shipment();
        let popup = Popup::for_checkpoint(&shipment.checkpoints[0]);
        assert_eq!(popup.title, "Gallup, NM");
        assert_eq!(popup.time, "March 2, 2025 - 07:15 PM");
        assert_eq!(
            popup.readings,
            vec![
                ("Temperature", "10.4°C".to_string()),
                ("Humidity", "40%".to_string()),
                ("Light Level", "120 lux".to_string()),
                ("Battery Life", "N/A".to_string()),
            ]
        );
        assert!(Popup::for_checkpoint(&shipment.checkpoints[1]).readings.is_empty());
    }

    #[test]
    fn test_route_style_by_mode() {
        assert!(RouteStyle::for_mode(FreightMode::Air).dashed);
        assert!(!RouteStyle::for_mode(FreightMode::Land).dashed);
        assert!(!RouteStyle::for_mode(FreightMode::Sea).dashed);
    }

    #[test]
    fn test_select_places_one_marker_per_checkpoint() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters.clone());
        let mut shipment = sample_shipment();
        shipment.checkpoints[2].coords = vec![35.0];

        let request = map.select(&shipment);

        assert_eq!(request.tag.shipment_id, "SH-TEST-0001");
        assert_eq!(request.checkpoints.len(), 3);
        assert_eq!(request.transport_type, "truck");
        assert_eq!(map.session().unwrap().canvas().markers.len(), 2);
    }

    #[test]
    fn test_only_one_canvas_alive_across_selections() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters.clone());
        let shipment = sample_shipment();

        for _ in 0..5 {
            map.select(&shipment);
        }
        assert_eq!(counters.borrow().created, 5);
        assert_eq!(counters.borrow().released, 4);
        assert_eq!(counters.borrow().max_live, 1);

        drop(map);
        assert_eq!(counters.borrow().released, 5);
        assert_eq!(counters.borrow().live, 0);
    }

    #[test]
    fn test_stale_route_is_discarded() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters);
        let first = sample_shipment();
        let mut second = sample_shipment();
        second.id = "SH-TEST-0002".to_string();

        let stale = map.select(&first);
        let fresh = map.select(&second);
        let path = RoutePath::StraightLine(vec![Coordinate::new(35., -108.), Coordinate::new(35.1, -107.)]);

        assert!(!map.apply_route(&stale.tag, &path));
        assert!(map.session().unwrap().canvas().routes.is_empty());
        assert!(map.apply_route(&fresh.tag, &path));
        assert_eq!(map.session().unwrap().canvas().routes.len(), 1);
    }

    #[test]
    fn test_route_without_two_points_draws_no_line() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters);
        let request = map.select(&sample_shipment());

        assert!(map.apply_route(&request.tag, &RoutePath::StraightLine(vec![])));
        assert!(map.apply_route(
            &request.tag,
            &RoutePath::StraightLine(vec![Coordinate::new(35., -108.)])
        ));
        assert!(map.session().unwrap().canvas().routes.is_empty());
    }

    #[test]
    fn test_reselecting_same_shipment_invalidates_older_request() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters);
        let shipment = sample_shipment();

        let older = map.select(&shipment);
        let newer = map.select(&shipment);
        let path = RoutePath::Snapped(vec![[-108., 35.], [-107., 35.1]]);

        assert!(!map.apply_route(&older.tag, &path));
        assert!(map.apply_route(&newer.tag, &path));
        let (points, style) = &map.session().unwrap().canvas().routes[0];
        assert_eq!(points[0], Coordinate::new(35., -108.));
        assert!(!style.dashed);
    }

    #[test]
    fn test_route_after_clear_is_discarded() {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let mut map = controller(counters.clone());
        let request = map.select(&sample_shipment());
        map.clear();
        assert!(!map.apply_route(&request.tag, &RoutePath::StraightLine(vec![])));
        assert_eq!(counters.borrow().live, 0);
    }
}
