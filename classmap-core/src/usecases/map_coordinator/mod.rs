use std::{cell::RefCell, collections::HashMap};

use futures::future::join_all;

use crate::{
    entities::*,
    gateways::{
        classes::ClassSummaryGateway,
        geocode::GeoCodingGateway,
        notify::{UserNotification, UserNotificationGateway},
    },
    map::*,
};

mod generation;
mod overlay;

#[cfg(test)]
mod tests;

pub use self::{
    generation::{Generation, GenerationCounter},
    overlay::OverlayState,
};

const FALLBACK_CENTER_LAT_DEG: f64 = 37.517198;
const FALLBACK_CENTER_LNG_DEG: f64 = 126.891434;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    /// Center of the map if no reference address is given.
    pub fallback_center: MapPoint,
    pub level: MapLevel,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            fallback_center: MapPoint::from_lat_lng_deg(
                FALLBACK_CENTER_LAT_DEG,
                FALLBACK_CENTER_LNG_DEG,
            ),
            level: MapLevel::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Ready {
        center: MapPoint,
        placement: PlacementReport,
    },
    /// The reference address could not be resolved, no map was created.
    AddressNotResolved,
    /// A newer call replaced this one before it completed.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecenterOutcome {
    Recentered(MapPoint),
    AddressNotResolved,
    Superseded,
    NoMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub placed: Vec<ClassId>,
    pub failed: Vec<ClassId>,
    /// Resolved after a newer batch or map replaced this one.
    pub discarded: Vec<ClassId>,
}

enum Placement {
    Placed(ClassId),
    Failed(ClassId),
    Discarded(ClassId),
}

#[derive(Debug, Default)]
struct Markers {
    reference: Option<MarkerId>,
    class_by_marker: HashMap<MarkerId, ClassId>,
    marker_by_class: HashMap<ClassId, MarkerId>,
    overlays: HashMap<ClassId, OverlayState>,
}

/// Keeps a single map in sync with a reference address and a list of
/// class locations and reports the visible area upwards.
///
/// All state is owned by a single task. Asynchronous results that arrive
/// after a newer request of the same kind was issued are discarded.
pub struct MapCoordinator<G, C, M, N> {
    geocoder: G,
    summaries: C,
    notifier: N,
    surface: RefCell<M>,
    settings: MapSettings,
    on_bounds_changed: Box<dyn Fn(BoundingBox)>,
    markers: RefCell<Markers>,
    map_generation: GenerationCounter,
    batch_generation: GenerationCounter,
    center_generation: GenerationCounter,
}

impl<G, C, M, N> MapCoordinator<G, C, M, N>
where
    G: GeoCodingGateway,
    C: ClassSummaryGateway,
    M: MapSurface,
    N: UserNotificationGateway,
{
    pub fn new<F>(
        geocoder: G,
        summaries: C,
        surface: M,
        notifier: N,
        settings: MapSettings,
        on_bounds_changed: F,
    ) -> Self
    where
        F: Fn(BoundingBox) + 'static,
    {
        Self {
            geocoder,
            summaries,
            notifier,
            surface: RefCell::new(surface),
            settings,
            on_bounds_changed: Box::new(on_bounds_changed),
            markers: RefCell::new(Markers::default()),
            map_generation: GenerationCounter::default(),
            batch_generation: GenerationCounter::default(),
            center_generation: GenerationCounter::default(),
        }
    }

    pub fn surface(&self) -> std::cell::Ref<'_, M> {
        self.surface.borrow()
    }

    pub fn reference_marker(&self) -> Option<MarkerId> {
        self.markers.borrow().reference
    }

    pub fn class_marker(&self, class_id: ClassId) -> Option<MarkerId> {
        self.markers.borrow().marker_by_class.get(&class_id).copied()
    }

    pub fn overlay_state(&self, class_id: ClassId) -> Option<OverlayState> {
        self.markers.borrow().overlays.get(&class_id).copied()
    }

    /// Creates a new map centered on the reference address (or the
    /// fallback center if it is empty) and places all class markers.
    pub async fn initialize(
        &self,
        reference_address: &str,
        entries: &[ClassMarkerEntry],
    ) -> Result<InitOutcome, MapInitError> {
        let generation = self.map_generation.advance();
        // Pending recenterings refer to the map that is about to be replaced.
        self.center_generation.advance();

        let center = if reference_address.trim().is_empty() {
            log::debug!("No reference address: center on fallback location");
            self.settings.fallback_center
        } else {
            let resolved = self.geocoder.resolve_address(reference_address).await;
            if !self.map_generation.is_current(generation) {
                log::debug!("Discard resolved reference address '{reference_address}'");
                return Ok(InitOutcome::Superseded);
            }
            match resolved {
                Ok(center) => center,
                Err(err) => {
                    log::warn!("Failed to resolve reference address '{reference_address}': {err}");
                    self.notifier.notify(UserNotification::AddressNotResolved {
                        address: reference_address.to_owned(),
                    });
                    return Ok(InitOutcome::AddressNotResolved);
                }
            }
        };

        {
            let mut surface = self.surface.borrow_mut();
            surface.create_map(center, self.settings.level)?;
            let mut markers = self.markers.borrow_mut();
            *markers = Markers::default();
            markers.reference = Some(surface.add_marker(center, MarkerIcon::Reference));
            surface.subscribe(MapEventKind::DragEnd);
            surface.subscribe(MapEventKind::ZoomChanged);
        }
        log::debug!("Created map centered at {center}");
        self.report_bounds();

        let placement = self.place_class_markers(entries).await;
        Ok(InitOutcome::Ready { center, placement })
    }

    /// Resolves all class addresses concurrently and places a marker for
    /// each resolved one.
    ///
    /// Markers of a previous batch are removed first. Returns after every
    /// resolution has settled.
    pub async fn place_class_markers(&self, entries: &[ClassMarkerEntry]) -> PlacementReport {
        if !self.surface.borrow().has_map() {
            log::warn!("No map found: cannot place {} class markers", entries.len());
            return PlacementReport::default();
        }
        let map_generation = self.map_generation.current();
        let batch_generation = self.batch_generation.advance();
        self.clear_class_markers();

        let placements = entries
            .iter()
            .map(|entry| self.place_class_marker(entry, map_generation, batch_generation));
        let mut report = PlacementReport::default();
        for placement in join_all(placements).await {
            match placement {
                Placement::Placed(id) => report.placed.push(id),
                Placement::Failed(id) => report.failed.push(id),
                Placement::Discarded(id) => report.discarded.push(id),
            }
        }
        log::debug!(
            "Placed {} of {} class markers ({} failed)",
            report.placed.len(),
            entries.len(),
            report.failed.len()
        );
        report
    }

    async fn place_class_marker(
        &self,
        entry: &ClassMarkerEntry,
        map_generation: Generation,
        batch_generation: Generation,
    ) -> Placement {
        let ClassMarkerEntry { class_id, address } = entry;
        let class_id = *class_id;
        let resolved = self.geocoder.resolve_address(address).await;
        if !self.is_current_batch(map_generation, batch_generation) {
            log::debug!("Discard resolved location of class {class_id}");
            return Placement::Discarded(class_id);
        }
        match resolved {
            Ok(pos) => {
                let mut surface = self.surface.borrow_mut();
                let marker = surface.add_marker(pos, MarkerIcon::Class);
                surface.subscribe(MapEventKind::MarkerClick(marker));
                let mut markers = self.markers.borrow_mut();
                if let Some(previous) = markers.marker_by_class.insert(class_id, marker) {
                    log::debug!("Class {class_id} is listed more than once");
                    markers.class_by_marker.remove(&previous);
                    surface.remove_marker(previous);
                }
                markers.class_by_marker.insert(marker, class_id);
                markers.overlays.entry(class_id).or_default();
                Placement::Placed(class_id)
            }
            Err(err) => {
                log::warn!("Failed to resolve location '{address}' of class {class_id}: {err}");
                self.notifier
                    .notify(UserNotification::ClassLocationNotResolved {
                        class_id,
                        address: address.clone(),
                    });
                Placement::Failed(class_id)
            }
        }
    }

    fn clear_class_markers(&self) {
        let mut surface = self.surface.borrow_mut();
        let mut markers = self.markers.borrow_mut();
        for (_, mut state) in markers.overlays.drain() {
            if let Some(overlay) = state.close() {
                surface.hide_overlay(overlay);
            }
        }
        for (marker, _) in markers.class_by_marker.drain() {
            surface.remove_marker(marker);
        }
        markers.marker_by_class.clear();
    }

    fn is_current_batch(&self, map_generation: Generation, batch_generation: Generation) -> bool {
        self.map_generation.is_current(map_generation)
            && self.batch_generation.is_current(batch_generation)
    }

    /// Moves the existing map to the reference address without touching
    /// any markers.
    pub async fn recenter_on(&self, reference_address: &str) -> RecenterOutcome {
        if !self.surface.borrow().has_map() {
            log::warn!("No map found: cannot recenter");
            return RecenterOutcome::NoMap;
        }
        let map_generation = self.map_generation.current();
        let generation = self.center_generation.advance();
        let resolved = self.geocoder.resolve_address(reference_address).await;
        if !self.map_generation.is_current(map_generation)
            || !self.center_generation.is_current(generation)
        {
            log::debug!("Discard resolved center '{reference_address}'");
            return RecenterOutcome::Superseded;
        }
        match resolved {
            Ok(center) => {
                self.surface.borrow_mut().set_center(center);
                RecenterOutcome::Recentered(center)
            }
            Err(err) => {
                log::warn!("Failed to resolve reference address '{reference_address}': {err}");
                self.notifier.notify(UserNotification::AddressNotResolved {
                    address: reference_address.to_owned(),
                });
                RecenterOutcome::AddressNotResolved
            }
        }
    }

    /// Reads the visible area and passes it to the bounds callback.
    pub fn report_bounds(&self) -> Option<BoundingBox> {
        let Some(bbox) = self.surface.borrow().bounds() else {
            log::warn!("No map found: cannot report bounds");
            return None;
        };
        let bounds = BoundingBox::from(bbox);
        (self.on_bounds_changed)(bounds);
        Some(bounds)
    }

    pub async fn handle_event(&self, event: MapEvent) {
        match event {
            MapEvent::DragEnd | MapEvent::ZoomChanged => {
                self.report_bounds();
            }
            MapEvent::MarkerClicked(marker) => {
                let class_id = self.markers.borrow().class_by_marker.get(&marker).copied();
                match class_id {
                    Some(class_id) => self.on_marker_click(marker, class_id).await,
                    None => log::debug!("Ignore click on marker {marker:?}"),
                }
            }
            MapEvent::OverlayClosed(overlay) => self.close_overlay(overlay),
        }
    }

    async fn on_marker_click(&self, marker: MarkerId, class_id: ClassId) {
        let start_loading = self
            .markers
            .borrow_mut()
            .overlays
            .entry(class_id)
            .or_default()
            .begin_loading();
        if !start_loading {
            log::debug!("Overlay of class {class_id} is already loading or open");
            return;
        }
        let map_generation = self.map_generation.current();
        let batch_generation = self.batch_generation.current();

        let fetched = self.summaries.class_summary(class_id).await;
        if !self.is_current_batch(map_generation, batch_generation) {
            log::debug!("Discard summary of class {class_id}");
            return;
        }

        let mut markers = self.markers.borrow_mut();
        let Some(state) = markers.overlays.get_mut(&class_id) else {
            return;
        };
        match fetched {
            Ok(summary) => {
                if *state != OverlayState::Loading {
                    log::debug!("Overlay of class {class_id} is not loading anymore");
                    return;
                }
                let content = OverlayContent::new(class_id, summary);
                let overlay = self.surface.borrow_mut().show_overlay(marker, content);
                let opened = state.open(overlay);
                debug_assert!(opened);
            }
            Err(err) => {
                log::warn!("Failed to fetch summary of class {class_id}: {err}");
                state.abort_loading();
                self.notifier
                    .notify(UserNotification::ClassSummaryUnavailable { class_id });
            }
        }
    }

    fn close_overlay(&self, overlay: OverlayId) {
        let mut markers = self.markers.borrow_mut();
        let state = markers
            .overlays
            .values_mut()
            .find(|state| state.overlay() == Some(overlay));
        match state.and_then(OverlayState::close) {
            Some(overlay) => self.surface.borrow_mut().hide_overlay(overlay),
            None => log::debug!("Overlay {overlay:?} is not open"),
        }
    }
}
