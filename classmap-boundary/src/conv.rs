use super::*;
use classmap_entities as e;

impl From<e::geo::BoundingBox> for MapBounds {
    fn from(from: e::geo::BoundingBox) -> Self {
        let e::geo::BoundingBox {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        } = from;
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }
}

impl From<e::geo::MapPoint> for Coordinate {
    fn from(from: e::geo::MapPoint) -> Self {
        let (latitude, longitude) = from.to_lat_lng_deg();
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<ClassLocation> for e::class::ClassMarkerEntry {
    fn from(from: ClassLocation) -> Self {
        let ClassLocation { class_id, location } = from;
        Self::new(class_id, location)
    }
}

impl From<ClassAdditionalData> for e::class::ClassSummary {
    fn from(from: ClassAdditionalData) -> Self {
        let ClassAdditionalData {
            class_name,
            class_description,
        } = from;
        Self {
            name: class_name,
            description: class_description,
        }
    }
}

impl From<e::class::ClassSummary> for ClassAdditionalData {
    fn from(from: e::class::ClassSummary) -> Self {
        let e::class::ClassSummary { name, description } = from;
        Self {
            class_name: name,
            class_description: description,
        }
    }
}

impl From<NearbyClass> for e::class::NearbyClass {
    fn from(from: NearbyClass) -> Self {
        let NearbyClass {
            class_id,
            class_name,
            description,
            location,
            cost,
            latitude,
            longitude,
            ..
        } = from;
        let pos = latitude
            .zip(longitude)
            .and_then(|(lat, lng)| e::geo::MapPoint::try_from_lat_lng_deg(lat, lng));
        Self {
            id: class_id.into(),
            name: class_name,
            description,
            location,
            cost: cost.filter(|cost| *cost > 0),
            pos,
        }
    }
}

impl From<e::class::NearbyClass> for NearbyClass {
    fn from(from: e::class::NearbyClass) -> Self {
        let e::class::NearbyClass {
            id,
            name,
            description,
            location,
            cost,
            pos,
        } = from;
        let (latitude, longitude) = pos.map(|pos| pos.to_lat_lng_deg()).unzip();
        Self {
            class_id: id.into(),
            class_name: name,
            description,
            location,
            cost,
            latitude,
            longitude,
            target_students: vec![],
            curriculums: vec![],
            content: None,
        }
    }
}
