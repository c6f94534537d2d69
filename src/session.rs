//! Scripted interaction with a headless map.

use crate::headless::HeadlessMap;
use anyhow::Result;
use classmap_boundary as json;
use classmap_core::{
    entities::{BoundingBox, ClassId, ClassMarkerEntry, MapPoint},
    gateways::{
        classes::{ClassSummaryGateway, NearbyClassesGateway},
        geocode::GeoCodingGateway,
        notify::UserNotificationGateway,
    },
    map::{MapEvent, MapLevel, MarkerIcon},
    usecases::{InitOutcome, MapCoordinator, MapSettings, RecenterOutcome},
};
use serde_json::json;
use std::{cell::RefCell, collections::VecDeque, fs, io::Write, path::Path, rc::Rc};

#[derive(Debug, Default)]
pub struct Script {
    pub reference_address: String,
    pub entries: Vec<ClassMarkerEntry>,
    pub recenter: Option<String>,
    pub zoom: Option<MapLevel>,
    pub drag: Option<MapPoint>,
    pub clicks: Vec<ClassId>,
    /// Close every open overlay after the clicks.
    pub close_overlays: bool,
    pub query_nearby: bool,
}

/// Reads class locations from a JSON array of `{class_id, location}`.
pub fn read_class_locations(path: &Path) -> Result<Vec<ClassMarkerEntry>> {
    let file = fs::read_to_string(path)?;
    let locations: Vec<json::ClassLocation> = serde_json::from_str(&file)?;
    Ok(locations.into_iter().map(ClassMarkerEntry::from).collect())
}

fn class_ids(ids: &[ClassId]) -> Vec<i64> {
    ids.iter().copied().map(ClassId::to_i64).collect()
}

pub struct Session<G, C, N, W> {
    coordinator: MapCoordinator<G, C, HeadlessMap, N>,
    map: HeadlessMap,
    classes: C,
    reported_bounds: Rc<RefCell<VecDeque<BoundingBox>>>,
    out: W,
}

impl<G, C, N, W> Session<G, C, N, W>
where
    G: GeoCodingGateway,
    C: ClassSummaryGateway + NearbyClassesGateway + Clone,
    N: UserNotificationGateway,
    W: Write,
{
    pub fn new(
        geocoder: G,
        classes: C,
        map: HeadlessMap,
        notifier: N,
        settings: MapSettings,
        out: W,
    ) -> Self {
        let reported_bounds = Rc::new(RefCell::new(VecDeque::new()));
        let on_bounds_changed = {
            let reported_bounds = Rc::clone(&reported_bounds);
            move |bbox: BoundingBox| reported_bounds.borrow_mut().push_back(bbox)
        };
        let coordinator = MapCoordinator::new(
            geocoder,
            classes.clone(),
            map.clone(),
            notifier,
            settings,
            on_bounds_changed,
        );
        Self {
            coordinator,
            map,
            classes,
            reported_bounds,
            out,
        }
    }

    pub async fn run(&mut self, script: Script) -> Result<()> {
        let Script {
            reference_address,
            entries,
            recenter,
            zoom,
            drag,
            clicks,
            close_overlays,
            query_nearby,
        } = script;

        match self
            .coordinator
            .initialize(&reference_address, &entries)
            .await?
        {
            InitOutcome::Ready { center, placement } => {
                let markers: Vec<_> = self
                    .map
                    .markers()
                    .into_iter()
                    .map(|(id, marker)| {
                        json!({
                            "id": id.to_u64(),
                            "position": json::Coordinate::from(marker.position),
                            "reference": marker.icon == MarkerIcon::Reference,
                        })
                    })
                    .collect();
                self.emit(json!({
                    "event": "ready",
                    "center": json::Coordinate::from(center),
                    "markers": markers,
                    "placed": class_ids(&placement.placed),
                    "failed": class_ids(&placement.failed),
                }))?;
            }
            InitOutcome::AddressNotResolved => {
                self.emit(json!({
                    "event": "address-not-resolved",
                    "address": reference_address,
                }))?;
                return Ok(());
            }
            InitOutcome::Superseded => return Ok(()),
        }
        self.flush_bounds(query_nearby).await?;

        if let Some(address) = recenter {
            let event = match self.coordinator.recenter_on(&address).await {
                RecenterOutcome::Recentered(center) => json!({
                    "event": "recentered",
                    "center": json::Coordinate::from(center),
                }),
                RecenterOutcome::AddressNotResolved => json!({
                    "event": "address-not-resolved",
                    "address": address,
                }),
                RecenterOutcome::Superseded | RecenterOutcome::NoMap => json!({
                    "event": "recenter-skipped",
                    "address": address,
                }),
            };
            self.emit(event)?;
        }

        if let Some(level) = zoom {
            let event = self.map.set_level(level);
            self.dispatch(event).await;
            self.flush_bounds(query_nearby).await?;
        }

        if let Some(center) = drag {
            let event = self.map.drag_to(center);
            self.dispatch(event).await;
            self.flush_bounds(query_nearby).await?;
        }

        for class_id in clicks {
            let Some(marker) = self.coordinator.class_marker(class_id) else {
                log::warn!("No marker for class {class_id} on the map");
                continue;
            };
            let event = self.map.click_marker(marker);
            self.dispatch(event).await;
        }

        for (id, overlay) in self.map.overlays() {
            self.emit(json!({
                "event": "overlay",
                "overlay": id.to_u64(),
                "classId": overlay.class_id.to_i64(),
                "title": overlay.title,
                "description": overlay.description,
                "link": overlay.link,
            }))?;
        }

        if close_overlays {
            for (id, _) in self.map.overlays() {
                let event = self.map.close_overlay(id);
                self.dispatch(event).await;
                self.emit(json!({
                    "event": "overlay-closed",
                    "overlay": id.to_u64(),
                }))?;
            }
        }
        Ok(())
    }

    async fn dispatch(&self, event: Option<MapEvent>) {
        if let Some(event) = event {
            self.coordinator.handle_event(event).await;
        }
    }

    async fn flush_bounds(&mut self, query_nearby: bool) -> Result<()> {
        loop {
            let Some(bbox) = self.reported_bounds.borrow_mut().pop_front() else {
                return Ok(());
            };
            self.emit(json!({
                "event": "bounds",
                "bounds": json::MapBounds::from(bbox),
                "level": self.map.level().map(MapLevel::to_u8),
            }))?;
            if !query_nearby {
                continue;
            }
            match self.classes.nearby_classes(&bbox).await {
                Ok(classes) => {
                    let classes: Vec<_> = classes.into_iter().map(json::NearbyClass::from).collect();
                    self.emit(json!({
                        "event": "nearby-classes",
                        "classes": classes,
                    }))?;
                }
                Err(err) => {
                    log::warn!("Failed to query nearby classes: {err}");
                }
            }
        }
    }

    fn emit(&mut self, value: serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)?;
        Ok(())
    }
}
