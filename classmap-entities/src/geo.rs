use std::{fmt, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid latitude '{0}'")]
    Latitude(String),
    #[error("Invalid longitude '{0}'")]
    Longitude(String),
    #[error("Expected {expected} comma separated values: '{input}'")]
    Arity { expected: usize, input: String },
}

/// Latitude in degrees, always within `[-90, 90]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct LatCoord(f64);

impl LatCoord {
    const DEG_MAX: f64 = 90.0;
    const DEG_MIN: f64 = -90.0;

    pub const fn max() -> Self {
        Self(Self::DEG_MAX)
    }

    pub const fn min() -> Self {
        Self(Self::DEG_MIN)
    }

    pub const fn to_deg(self) -> f64 {
        self.0
    }

    pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
        let deg = deg.into();
        (Self::DEG_MIN..=Self::DEG_MAX)
            .contains(&deg)
            .then_some(Self(deg))
    }

    /// Clamps out-of-range values into the valid range.
    ///
    /// NaN is mapped to the equator.
    pub fn saturating_from_deg(deg: f64) -> Self {
        if deg.is_nan() {
            return Self(0.0);
        }
        Self(deg.clamp(Self::DEG_MIN, Self::DEG_MAX))
    }
}

impl fmt::Display for LatCoord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Longitude in degrees, always within `[-180, 180]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct LngCoord(f64);

impl LngCoord {
    const DEG_MAX: f64 = 180.0;
    const DEG_MIN: f64 = -180.0;

    pub const fn max() -> Self {
        Self(Self::DEG_MAX)
    }

    pub const fn min() -> Self {
        Self(Self::DEG_MIN)
    }

    pub const fn to_deg(self) -> f64 {
        self.0
    }

    pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
        let deg = deg.into();
        (Self::DEG_MIN..=Self::DEG_MAX)
            .contains(&deg)
            .then_some(Self(deg))
    }

    pub fn saturating_from_deg(deg: f64) -> Self {
        if deg.is_nan() {
            return Self(0.0);
        }
        Self(deg.clamp(Self::DEG_MIN, Self::DEG_MAX))
    }
}

impl fmt::Display for LngCoord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographical location on a (flat) map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub const fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat.to_deg(), self.lng.to_deg())
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        match (LatCoord::try_from_deg(lat), LngCoord::try_from_deg(lng)) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    /// Panics in debug builds if the degrees are out of range.
    pub fn from_lat_lng_deg(lat: f64, lng: f64) -> Self {
        debug_assert!(Self::try_from_lat_lng_deg(lat, lng).is_some());
        Self::new(
            LatCoord::saturating_from_deg(lat),
            LngCoord::saturating_from_deg(lng),
        )
    }

    fn parse_lat_lng_deg(lat_deg_str: &str, lng_deg_str: &str) -> Result<Self, ParseError> {
        let lat = lat_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LatCoord::try_from_deg)
            .ok_or_else(|| ParseError::Latitude(lat_deg_str.to_owned()))?;
        let lng = lng_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(LngCoord::try_from_deg)
            .ok_or_else(|| ParseError::Longitude(lng_deg_str.to_owned()))?;
        Ok(Self::new(lat, lng))
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat, lng)) = s.split(',').collect_tuple() else {
            return Err(ParseError::Arity {
                expected: 2,
                input: s.to_owned(),
            });
        };
        Self::parse_lat_lng_deg(lat, lng)
    }
}

/// Viewport rectangle given by its south-west and north-east corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    pub const fn southwest(&self) -> MapPoint {
        self.sw
    }

    pub const fn northeast(&self) -> MapPoint {
        self.ne
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}

impl FromStr for MapBbox {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((sw_lat, sw_lng, ne_lat, ne_lng)) = s.split(',').collect_tuple() else {
            return Err(ParseError::Arity {
                expected: 4,
                input: s.to_owned(),
            });
        };
        let sw = MapPoint::parse_lat_lng_deg(sw_lat, sw_lng)?;
        let ne = MapPoint::parse_lat_lng_deg(ne_lat, ne_lng)?;
        Ok(Self::new(sw, ne))
    }
}

/// The visible region as reported to the parent of the map.
///
/// `min_lat <= max_lat` and `min_lng <= max_lng` always hold and the box
/// always covers the original area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl From<MapBbox> for BoundingBox {
    fn from(bbox: MapBbox) -> Self {
        let (sw_lat, sw_lng) = bbox.southwest().to_lat_lng_deg();
        let (ne_lat, ne_lng) = bbox.northeast().to_lat_lng_deg();
        // A box crossing the antimeridian covers the full longitude range.
        let (min_lng, max_lng) = if sw_lng <= ne_lng {
            (sw_lng, ne_lng)
        } else {
            (LngCoord::min().to_deg(), LngCoord::max().to_deg())
        };
        Self {
            min_lat: sw_lat.min(ne_lat),
            max_lat: sw_lat.max(ne_lat),
            min_lng,
            max_lng,
        }
    }
}
