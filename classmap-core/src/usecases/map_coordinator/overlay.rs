use crate::map::OverlayId;

/// State of the info overlay of a single class marker.
///
/// `Closed -> Loading -> Open -> Closed`. A failed fetch returns
/// from `Loading` to `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Loading,
    Open(OverlayId),
}

impl OverlayState {
    /// Returns `true` if the click should trigger fetching the summary.
    pub fn begin_loading(&mut self) -> bool {
        match self {
            Self::Closed => {
                *self = Self::Loading;
                true
            }
            Self::Loading | Self::Open(_) => false,
        }
    }

    pub fn open(&mut self, overlay: OverlayId) -> bool {
        match self {
            Self::Loading => {
                *self = Self::Open(overlay);
                true
            }
            Self::Closed | Self::Open(_) => false,
        }
    }

    pub fn abort_loading(&mut self) {
        if *self == Self::Loading {
            *self = Self::Closed;
        }
    }

    /// Returns the overlay that has to be removed from the map.
    pub fn close(&mut self) -> Option<OverlayId> {
        match *self {
            Self::Open(overlay) => {
                *self = Self::Closed;
                Some(overlay)
            }
            Self::Closed | Self::Loading => None,
        }
    }

    pub const fn overlay(&self) -> Option<OverlayId> {
        match self {
            Self::Open(overlay) => Some(*overlay),
            Self::Closed | Self::Loading => None,
        }
    }
}
