//! Capabilities of a map rendering backend.
//!
//! A backend owns the visual map instance. Markers and overlays are
//! referred to by opaque handles that are only meaningful to the backend
//! that created them.

use std::fmt;

use thiserror::Error;

use crate::entities::{ClassId, ClassSummary, MapBbox, MapPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

impl MarkerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn to_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn to_u64(self) -> u64 {
        self.0
    }
}

/// Zoom level in the style of Kakao maps: `1` is the most detailed level,
/// larger values show a larger area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MapLevel(u8);

impl MapLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(14);
    pub const DEFAULT: Self = Self(3);

    pub fn try_new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(Self(level))
    }

    pub const fn to_u8(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn zoom_in(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    #[must_use]
    pub fn zoom_out(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }
}

impl Default for MapLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MapLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    /// The location the map was centered on.
    Reference,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub class_id: ClassId,
    pub title: String,
    pub description: String,
    /// Relative link to the detail page of the class.
    pub link: String,
}

impl OverlayContent {
    pub fn new(class_id: ClassId, summary: ClassSummary) -> Self {
        let ClassSummary { name, description } = summary;
        Self {
            class_id,
            title: name,
            description,
            link: format!("/student/class_detail/{class_id}"),
        }
    }
}

/// Events a map backend delivers only after being subscribed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    DragEnd,
    ZoomChanged,
    MarkerClick(MarkerId),
}

/// Input events of the map.
///
/// Clicks on markers and on the close control of an overlay are
/// delivered as their own events and never as a click on the map itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    DragEnd,
    ZoomChanged,
    MarkerClicked(MarkerId),
    OverlayClosed(OverlayId),
}

#[derive(Debug, Error)]
pub enum MapInitError {
    #[error("The map container '{0}' does not exist")]
    MissingContainer(String),
    #[error("The map could not be created: {0}")]
    Backend(String),
}

pub trait MapSurface {
    /// Creates a new map instance, replacing (and discarding) any prior one
    /// including all of its markers and overlays.
    fn create_map(&mut self, center: MapPoint, level: MapLevel) -> Result<(), MapInitError>;

    fn has_map(&self) -> bool;

    fn set_center(&mut self, center: MapPoint);

    fn center(&self) -> Option<MapPoint>;

    /// The visible area or `None` if no map has been created yet.
    fn bounds(&self) -> Option<MapBbox>;

    fn add_marker(&mut self, position: MapPoint, icon: MarkerIcon) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    fn show_overlay(&mut self, anchor: MarkerId, content: OverlayContent) -> OverlayId;

    fn hide_overlay(&mut self, overlay: OverlayId);

    fn subscribe(&mut self, kind: MapEventKind);
}

/// A non-interactive map showing a single location.
pub trait StaticMapSurface {
    fn render_static_map(
        &mut self,
        center: MapPoint,
        level: MapLevel,
        marker: MapPoint,
    ) -> Result<(), MapInitError>;
}
