//! An in-memory map without any rendering.
//!
//! The viewport follows the tile scale of Kakao maps: at level 1 one pixel
//! covers roughly 0.5 m at the equator, every further level doubles that.

use classmap_core::{
    entities::{LatCoord, LngCoord, MapBbox, MapPoint},
    map::*,
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashSet},
    rc::Rc,
};

const TILE_SIZE: f64 = 256.0;
const MAX_ZOOM: i32 = 20;

#[derive(Debug, Clone)]
pub struct HeadlessMap(Rc<RefCell<State>>);

#[derive(Debug)]
struct State {
    container: String,
    width: u32,
    height: u32,
    view: Option<View>,
    static_view: Option<StaticView>,
    next_id: u64,
    markers: BTreeMap<MarkerId, Marker>,
    overlays: BTreeMap<OverlayId, (MarkerId, OverlayContent)>,
    subscriptions: HashSet<MapEventKind>,
}

#[derive(Debug, Clone, Copy)]
struct View {
    center: MapPoint,
    level: MapLevel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticView {
    pub center: MapPoint,
    pub level: MapLevel,
    pub marker: MapPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: MapPoint,
    pub icon: MarkerIcon,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl HeadlessMap {
    pub fn new(container: impl Into<String>, width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(State {
            container: container.into(),
            width,
            height,
            view: None,
            static_view: None,
            next_id: 0,
            markers: BTreeMap::new(),
            overlays: BTreeMap::new(),
            subscriptions: HashSet::new(),
        })))
    }

    pub fn level(&self) -> Option<MapLevel> {
        self.0.borrow().view.map(|v| v.level)
    }

    pub fn markers(&self) -> Vec<(MarkerId, Marker)> {
        self.0
            .borrow()
            .markers
            .iter()
            .map(|(id, m)| (*id, *m))
            .collect()
    }

    pub fn overlays(&self) -> Vec<(OverlayId, OverlayContent)> {
        self.0
            .borrow()
            .overlays
            .iter()
            .map(|(id, (_, content))| (*id, content.clone()))
            .collect()
    }

    pub fn static_view(&self) -> Option<StaticView> {
        self.0.borrow().static_view
    }

    /// Moves the center as if the user dragged the map.
    pub fn drag_to(&self, center: MapPoint) -> Option<MapEvent> {
        let mut state = self.0.borrow_mut();
        let view = state.view.as_mut()?;
        view.center = center;
        state
            .subscriptions
            .contains(&MapEventKind::DragEnd)
            .then_some(MapEvent::DragEnd)
    }

    pub fn set_level(&self, level: MapLevel) -> Option<MapEvent> {
        let mut state = self.0.borrow_mut();
        let view = state.view.as_mut()?;
        if view.level == level {
            return None;
        }
        view.level = level;
        state
            .subscriptions
            .contains(&MapEventKind::ZoomChanged)
            .then_some(MapEvent::ZoomChanged)
    }

    pub fn click_marker(&self, marker: MarkerId) -> Option<MapEvent> {
        let state = self.0.borrow();
        if !state.markers.contains_key(&marker) {
            return None;
        }
        state
            .subscriptions
            .contains(&MapEventKind::MarkerClick(marker))
            .then_some(MapEvent::MarkerClicked(marker))
    }

    /// Clicks the close control of an overlay.
    pub fn close_overlay(&self, overlay: OverlayId) -> Option<MapEvent> {
        self.0
            .borrow()
            .overlays
            .contains_key(&overlay)
            .then_some(MapEvent::OverlayClosed(overlay))
    }

    fn check_container(state: &State) -> Result<(), MapInitError> {
        if state.container.trim().is_empty() {
            return Err(MapInitError::MissingContainer(state.container.clone()));
        }
        if state.width == 0 || state.height == 0 {
            return Err(MapInitError::Backend(format!(
                "The container '{}' has no size",
                state.container
            )));
        }
        Ok(())
    }
}

/// Degrees of longitude per pixel.
fn lng_deg_per_px(level: MapLevel) -> f64 {
    let zoom = MAX_ZOOM - i32::from(level.to_u8());
    360.0 / (TILE_SIZE * 2f64.powi(zoom))
}

fn viewport(center: MapPoint, level: MapLevel, width: u32, height: u32) -> MapBbox {
    let (lat, lng) = center.to_lat_lng_deg();
    let lng_per_px = lng_deg_per_px(level);
    let lat_per_px = lng_per_px * lat.to_radians().cos();
    let half_lng = lng_per_px * f64::from(width) / 2.0;
    let half_lat = lat_per_px * f64::from(height) / 2.0;
    // The map does not wrap around the antimeridian.
    let sw = MapPoint::from_lat_lng_deg(
        (lat - half_lat).max(LatCoord::min().to_deg()),
        (lng - half_lng).max(LngCoord::min().to_deg()),
    );
    let ne = MapPoint::from_lat_lng_deg(
        (lat + half_lat).min(LatCoord::max().to_deg()),
        (lng + half_lng).min(LngCoord::max().to_deg()),
    );
    MapBbox::new(sw, ne)
}

impl MapSurface for HeadlessMap {
    fn create_map(&mut self, center: MapPoint, level: MapLevel) -> Result<(), MapInitError> {
        let mut state = self.0.borrow_mut();
        Self::check_container(&state)?;
        log::debug!("Create map in '{}' at {center} (level {level})", state.container);
        state.view = Some(View { center, level });
        state.markers.clear();
        state.overlays.clear();
        state.subscriptions.clear();
        Ok(())
    }

    fn has_map(&self) -> bool {
        self.0.borrow().view.is_some()
    }

    fn set_center(&mut self, center: MapPoint) {
        if let Some(view) = self.0.borrow_mut().view.as_mut() {
            view.center = center;
        }
    }

    fn center(&self) -> Option<MapPoint> {
        self.0.borrow().view.map(|v| v.center)
    }

    fn bounds(&self) -> Option<MapBbox> {
        let state = self.0.borrow();
        let View { center, level } = state.view?;
        Some(viewport(center, level, state.width, state.height))
    }

    fn add_marker(&mut self, position: MapPoint, icon: MarkerIcon) -> MarkerId {
        let mut state = self.0.borrow_mut();
        let id = MarkerId::new(state.next_id());
        state.markers.insert(id, Marker { position, icon });
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        let mut state = self.0.borrow_mut();
        state.markers.remove(&marker);
        state.overlays.retain(|_, (anchor, _)| *anchor != marker);
        state
            .subscriptions
            .remove(&MapEventKind::MarkerClick(marker));
    }

    fn show_overlay(&mut self, anchor: MarkerId, content: OverlayContent) -> OverlayId {
        let mut state = self.0.borrow_mut();
        let id = OverlayId::new(state.next_id());
        state.overlays.insert(id, (anchor, content));
        id
    }

    fn hide_overlay(&mut self, overlay: OverlayId) {
        self.0.borrow_mut().overlays.remove(&overlay);
    }

    fn subscribe(&mut self, kind: MapEventKind) {
        self.0.borrow_mut().subscriptions.insert(kind);
    }
}

impl StaticMapSurface for HeadlessMap {
    fn render_static_map(
        &mut self,
        center: MapPoint,
        level: MapLevel,
        marker: MapPoint,
    ) -> Result<(), MapInitError> {
        let mut state = self.0.borrow_mut();
        Self::check_container(&state)?;
        state.static_view = Some(StaticView {
            center,
            level,
            marker,
        });
        Ok(())
    }
}
