use super::*;

use crate::gateways::{classes::SummaryFetchError, geocode::GeocodeError};

use async_trait::async_trait;
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
    time::Duration,
};
use tokio::time::{sleep, Instant};

const SEOUL_CITY_HALL: (f64, f64) = (37.566_535, 126.977_969);
const GANGNAM_STATION: (f64, f64) = (37.497_942, 127.027_621);
const HONGDAE: (f64, f64) = (37.556_785, 126.923_774);

#[derive(Default)]
struct MockGeocoder {
    locations: HashMap<String, (MapPoint, Duration)>,
    calls: Cell<usize>,
}

impl MockGeocoder {
    fn with(mut self, address: &str, (lat, lng): (f64, f64), delay_ms: u64) -> Self {
        self.locations.insert(
            address.to_owned(),
            (
                MapPoint::from_lat_lng_deg(lat, lng),
                Duration::from_millis(delay_ms),
            ),
        );
        self
    }
}

#[async_trait(?Send)]
impl GeoCodingGateway for MockGeocoder {
    async fn resolve_address(&self, address: &str) -> Result<MapPoint, GeocodeError> {
        self.calls.set(self.calls.get() + 1);
        match self.locations.get(address) {
            Some((pos, delay)) => {
                sleep(*delay).await;
                Ok(*pos)
            }
            None => {
                sleep(Duration::from_millis(5)).await;
                Err(GeocodeError::NotFound(address.to_owned()))
            }
        }
    }
}

#[derive(Default)]
struct MockSummaries {
    summaries: HashMap<ClassId, ClassSummary>,
    fetched: RefCell<HashMap<ClassId, usize>>,
}

impl MockSummaries {
    fn with(mut self, id: i64, name: &str) -> Self {
        self.summaries.insert(
            ClassId::new(id),
            ClassSummary {
                name: name.to_owned(),
                description: format!("All about {name}"),
            },
        );
        self
    }
}

#[async_trait(?Send)]
impl ClassSummaryGateway for MockSummaries {
    async fn class_summary(&self, id: ClassId) -> Result<ClassSummary, SummaryFetchError> {
        *self.fetched.borrow_mut().entry(id).or_default() += 1;
        sleep(Duration::from_millis(20)).await;
        self.summaries
            .get(&id)
            .cloned()
            .ok_or_else(|| SummaryFetchError::Api(format!("Class {id} not found")))
    }
}

#[derive(Debug, Default)]
struct MockSurface {
    fail_on_create: bool,
    map: Option<(MapPoint, MapLevel)>,
    maps_created: usize,
    markers: HashMap<MarkerId, (MapPoint, MarkerIcon)>,
    overlays: HashMap<OverlayId, (MarkerId, OverlayContent)>,
    subscriptions: HashSet<MapEventKind>,
    next_id: u64,
}

impl MockSurface {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn class_markers(&self) -> Vec<MapPoint> {
        self.markers
            .values()
            .filter(|(_, icon)| *icon == MarkerIcon::Class)
            .map(|(pos, _)| *pos)
            .collect()
    }
}

impl MapSurface for MockSurface {
    fn create_map(&mut self, center: MapPoint, level: MapLevel) -> Result<(), MapInitError> {
        if self.fail_on_create {
            return Err(MapInitError::MissingContainer("map".into()));
        }
        self.map = Some((center, level));
        self.maps_created += 1;
        self.markers.clear();
        self.overlays.clear();
        self.subscriptions.clear();
        Ok(())
    }

    fn has_map(&self) -> bool {
        self.map.is_some()
    }

    fn set_center(&mut self, center: MapPoint) {
        if let Some((_, level)) = self.map {
            self.map = Some((center, level));
        }
    }

    fn center(&self) -> Option<MapPoint> {
        self.map.map(|(center, _)| center)
    }

    fn bounds(&self) -> Option<MapBbox> {
        let (center, level) = self.map?;
        let (lat, lng) = center.to_lat_lng_deg();
        let lat_ext = 0.005 * f64::from(level.to_u8());
        let lng_ext = 0.01 * f64::from(level.to_u8());
        Some(MapBbox::new(
            MapPoint::from_lat_lng_deg(lat - lat_ext, lng - lng_ext),
            MapPoint::from_lat_lng_deg(lat + lat_ext, lng + lng_ext),
        ))
    }

    fn add_marker(&mut self, position: MapPoint, icon: MarkerIcon) -> MarkerId {
        let id = MarkerId::new(self.next_id());
        self.markers.insert(id, (position, icon));
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
        self.subscriptions
            .remove(&MapEventKind::MarkerClick(marker));
    }

    fn show_overlay(&mut self, anchor: MarkerId, content: OverlayContent) -> OverlayId {
        let id = OverlayId::new(self.next_id());
        self.overlays.insert(id, (anchor, content));
        id
    }

    fn hide_overlay(&mut self, overlay: OverlayId) {
        self.overlays.remove(&overlay);
    }

    fn subscribe(&mut self, kind: MapEventKind) {
        self.subscriptions.insert(kind);
    }
}

#[derive(Clone, Default)]
struct MockNotifier(Rc<RefCell<Vec<UserNotification>>>);

impl MockNotifier {
    fn notifications(&self) -> Vec<UserNotification> {
        self.0.borrow().clone()
    }
}

impl UserNotificationGateway for MockNotifier {
    fn notify(&self, notification: UserNotification) {
        self.0.borrow_mut().push(notification);
    }
}

type Coordinator = MapCoordinator<MockGeocoder, MockSummaries, MockSurface, MockNotifier>;

struct Fixture {
    coordinator: Coordinator,
    notifier: MockNotifier,
    reported: Rc<RefCell<Vec<BoundingBox>>>,
}

fn fixture(geocoder: MockGeocoder, summaries: MockSummaries) -> Fixture {
    fixture_with_surface(geocoder, summaries, MockSurface::default())
}

fn fixture_with_surface(
    geocoder: MockGeocoder,
    summaries: MockSummaries,
    surface: MockSurface,
) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let notifier = MockNotifier::default();
    let reported = Rc::new(RefCell::new(vec![]));
    let reported_by_callback = Rc::clone(&reported);
    let coordinator = MapCoordinator::new(
        geocoder,
        summaries,
        surface,
        notifier.clone(),
        MapSettings::default(),
        move |bounds| reported_by_callback.borrow_mut().push(bounds),
    );
    Fixture {
        coordinator,
        notifier,
        reported,
    }
}

fn default_geocoder() -> MockGeocoder {
    MockGeocoder::default()
        .with("Seoul City Hall", SEOUL_CITY_HALL, 10)
        .with("Gangnam Station", GANGNAM_STATION, 30)
        .with("Hongdae", HONGDAE, 50)
}

fn default_summaries() -> MockSummaries {
    MockSummaries::default()
        .with(1, "Pottery")
        .with(2, "Baking")
        .with(3, "Calligraphy")
}

fn pt((lat, lng): (f64, f64)) -> MapPoint {
    MapPoint::from_lat_lng_deg(lat, lng)
}

fn fetch_count(f: &Fixture, id: i64) -> usize {
    f.coordinator
        .summaries
        .fetched
        .borrow()
        .get(&ClassId::new(id))
        .copied()
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn empty_reference_address_centers_on_fallback() {
    let f = fixture(default_geocoder(), default_summaries());
    let outcome = f.coordinator.initialize("", &[]).await.unwrap();
    let fallback = MapPoint::from_lat_lng_deg(37.517198, 126.891434);
    assert_eq!(
        outcome,
        InitOutcome::Ready {
            center: fallback,
            placement: PlacementReport::default(),
        }
    );
    let surface = f.coordinator.surface();
    assert_eq!(surface.center(), Some(fallback));
    let reference = f.coordinator.reference_marker().unwrap();
    assert_eq!(
        surface.markers.get(&reference),
        Some(&(fallback, MarkerIcon::Reference))
    );
    assert_eq!(f.coordinator.geocoder.calls.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn reference_marker_is_placed_at_resolved_coordinate() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("Gangnam Station", &[])
        .await
        .unwrap();
    let surface = f.coordinator.surface();
    let reference = f.coordinator.reference_marker().unwrap();
    assert_eq!(surface.markers[&reference].0, pt(GANGNAM_STATION));
    assert_eq!(surface.center(), Some(pt(GANGNAM_STATION)));
    assert_eq!(surface.map.unwrap().1, MapLevel::DEFAULT);
    assert!(surface.subscriptions.contains(&MapEventKind::DragEnd));
    assert!(surface.subscriptions.contains(&MapEventKind::ZoomChanged));
}

#[tokio::test(start_paused = true)]
async fn bounds_are_reported_once_when_the_map_is_ready() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("Seoul City Hall", &[])
        .await
        .unwrap();
    let reported = f.reported.borrow();
    assert_eq!(reported.len(), 1);
    let bounds = reported[0];
    let center = pt(SEOUL_CITY_HALL);
    assert!(bounds.min_lat < center.lat().to_deg() && center.lat().to_deg() < bounds.max_lat);
    assert!(bounds.min_lng < center.lng().to_deg() && center.lng().to_deg() < bounds.max_lng);
}

#[tokio::test(start_paused = true)]
async fn unresolvable_reference_address_does_not_create_a_map() {
    let f = fixture(default_geocoder(), default_summaries());
    let outcome = f.coordinator.initialize("nowhere", &[]).await.unwrap();
    assert_eq!(outcome, InitOutcome::AddressNotResolved);
    assert!(!f.coordinator.surface().has_map());
    assert_eq!(
        f.notifier.notifications(),
        vec![UserNotification::AddressNotResolved {
            address: "nowhere".into()
        }]
    );
    assert!(f.reported.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn map_init_failure_is_fatal() {
    let surface = MockSurface {
        fail_on_create: true,
        ..Default::default()
    };
    let f = fixture_with_surface(default_geocoder(), default_summaries(), surface);
    let entries = [ClassMarkerEntry::new(1, "Seoul City Hall")];
    let result = f.coordinator.initialize("", &entries).await;
    assert!(matches!(result, Err(MapInitError::MissingContainer(_))));
    assert!(f.coordinator.reference_marker().is_none());
    assert_eq!(f.coordinator.geocoder.calls.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_class_locations_do_not_block_the_others() {
    let f = fixture(default_geocoder(), default_summaries());
    let entries = [
        ClassMarkerEntry::new(1, "Seoul City Hall"),
        ClassMarkerEntry::new(2, "???invalid???"),
    ];
    let outcome = f.coordinator.initialize("", &entries).await.unwrap();
    let InitOutcome::Ready { placement, .. } = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(placement.placed, vec![ClassId::new(1)]);
    assert_eq!(placement.failed, vec![ClassId::new(2)]);
    assert!(placement.discarded.is_empty());
    assert_eq!(
        f.coordinator.surface().class_markers(),
        vec![pt(SEOUL_CITY_HALL)]
    );
    assert_eq!(
        f.notifier.notifications(),
        vec![UserNotification::ClassLocationNotResolved {
            class_id: ClassId::new(2),
            address: "???invalid???".into()
        }]
    );
    assert!(f.coordinator.class_marker(ClassId::new(2)).is_none());
}

#[tokio::test(start_paused = true)]
async fn n_entries_with_k_failures_place_n_minus_k_markers() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator.initialize("", &[]).await.unwrap();
    let entries = [
        ClassMarkerEntry::new(1, "Seoul City Hall"),
        ClassMarkerEntry::new(2, "Gangnam Station"),
        ClassMarkerEntry::new(3, "Hongdae"),
        ClassMarkerEntry::new(4, "unknown 1"),
        ClassMarkerEntry::new(5, "unknown 2"),
    ];
    let report = f.coordinator.place_class_markers(&entries).await;
    assert_eq!(report.placed.len(), 3);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(f.coordinator.surface().class_markers().len(), 3);
    assert_eq!(f.notifier.notifications().len(), 2);
    for id in 1..=3 {
        let marker = f.coordinator.class_marker(ClassId::new(id)).unwrap();
        assert!(f
            .coordinator
            .surface()
            .subscriptions
            .contains(&MapEventKind::MarkerClick(marker)));
        assert_eq!(
            f.coordinator.overlay_state(ClassId::new(id)),
            Some(OverlayState::Closed)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn class_locations_are_resolved_concurrently() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator.initialize("", &[]).await.unwrap();
    let entries = [
        ClassMarkerEntry::new(1, "Seoul City Hall"),
        ClassMarkerEntry::new(2, "Gangnam Station"),
        ClassMarkerEntry::new(3, "Hongdae"),
    ];
    let started = Instant::now();
    let report = f.coordinator.place_class_markers(&entries).await;
    // As long as the slowest lookup (50ms) and not the sum of all (90ms).
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(90));
    assert_eq!(
        report.placed,
        vec![ClassId::new(1), ClassId::new(2), ClassId::new(3)]
    );
    assert_eq!(f.coordinator.surface().class_markers().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn placing_markers_without_a_map_does_nothing() {
    let f = fixture(default_geocoder(), default_summaries());
    let report = f
        .coordinator
        .place_class_markers(&[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await;
    assert_eq!(report, PlacementReport::default());
    assert_eq!(f.coordinator.geocoder.calls.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn a_new_batch_replaces_the_markers_of_the_previous_one() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let old_marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();
    f.coordinator
        .handle_event(MapEvent::MarkerClicked(old_marker))
        .await;
    assert_eq!(f.coordinator.surface().overlays.len(), 1);

    f.coordinator
        .place_class_markers(&[ClassMarkerEntry::new(2, "Gangnam Station")])
        .await;
    let surface = f.coordinator.surface();
    assert_eq!(surface.class_markers(), vec![pt(GANGNAM_STATION)]);
    assert!(!surface.markers.contains_key(&old_marker));
    assert!(surface.overlays.is_empty());
    assert!(f.coordinator.reference_marker().is_some());
    assert!(f.coordinator.class_marker(ClassId::new(1)).is_none());
    assert_eq!(f.coordinator.overlay_state(ClassId::new(1)), None);
}

#[tokio::test(start_paused = true)]
async fn results_of_a_superseded_batch_are_discarded() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator.initialize("", &[]).await.unwrap();
    let slow = [ClassMarkerEntry::new(3, "Hongdae")];
    let fast = [ClassMarkerEntry::new(1, "Seoul City Hall")];
    let (slow_report, fast_report) = tokio::join!(
        f.coordinator.place_class_markers(&slow),
        async {
            sleep(Duration::from_millis(1)).await;
            f.coordinator.place_class_markers(&fast).await
        }
    );
    assert_eq!(slow_report.discarded, vec![ClassId::new(3)]);
    assert!(slow_report.placed.is_empty());
    assert_eq!(fast_report.placed, vec![ClassId::new(1)]);
    assert_eq!(
        f.coordinator.surface().class_markers(),
        vec![pt(SEOUL_CITY_HALL)]
    );
}

#[tokio::test(start_paused = true)]
async fn a_superseded_initialization_does_not_overwrite_the_newer_map() {
    let f = fixture(default_geocoder(), default_summaries());
    let (first, second) = tokio::join!(f.coordinator.initialize("Hongdae", &[]), async {
        sleep(Duration::from_millis(1)).await;
        f.coordinator.initialize("Seoul City Hall", &[]).await
    });
    assert_eq!(first.unwrap(), InitOutcome::Superseded);
    assert!(matches!(second.unwrap(), InitOutcome::Ready { .. }));
    let surface = f.coordinator.surface();
    assert_eq!(surface.maps_created, 1);
    assert_eq!(surface.center(), Some(pt(SEOUL_CITY_HALL)));
}

#[tokio::test(start_paused = true)]
async fn initialize_replaces_the_prior_map() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    f.coordinator
        .initialize("Gangnam Station", &[ClassMarkerEntry::new(2, "Hongdae")])
        .await
        .unwrap();
    let surface = f.coordinator.surface();
    assert_eq!(surface.maps_created, 2);
    assert_eq!(surface.class_markers(), vec![pt(HONGDAE)]);
    assert!(f.coordinator.class_marker(ClassId::new(1)).is_none());
    assert_eq!(f.reported.borrow().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn recenter_moves_the_map_without_recreating_markers() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let markers_before = f.coordinator.surface().markers.clone();
    let outcome = f.coordinator.recenter_on("Gangnam Station").await;
    assert_eq!(outcome, RecenterOutcome::Recentered(pt(GANGNAM_STATION)));
    let surface = f.coordinator.surface();
    assert_eq!(surface.center(), Some(pt(GANGNAM_STATION)));
    assert_eq!(surface.markers, markers_before);
    assert_eq!(surface.maps_created, 1);
}

#[tokio::test(start_paused = true)]
async fn recenter_without_map_or_address() {
    let f = fixture(default_geocoder(), default_summaries());
    assert_eq!(
        f.coordinator.recenter_on("Seoul City Hall").await,
        RecenterOutcome::NoMap
    );
    f.coordinator.initialize("", &[]).await.unwrap();
    assert_eq!(
        f.coordinator.recenter_on("nowhere").await,
        RecenterOutcome::AddressNotResolved
    );
    assert_eq!(f.notifier.notifications().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn the_latest_recenter_wins() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator.initialize("", &[]).await.unwrap();
    let (first, second) = tokio::join!(f.coordinator.recenter_on("Hongdae"), async {
        sleep(Duration::from_millis(1)).await;
        f.coordinator.recenter_on("Seoul City Hall").await
    });
    assert_eq!(first, RecenterOutcome::Superseded);
    assert_eq!(second, RecenterOutcome::Recentered(pt(SEOUL_CITY_HALL)));
    assert_eq!(f.coordinator.surface().center(), Some(pt(SEOUL_CITY_HALL)));
}

#[tokio::test(start_paused = true)]
async fn first_click_fetches_once_and_opens_the_overlay() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();

    f.coordinator
        .handle_event(MapEvent::MarkerClicked(marker))
        .await;
    assert_eq!(fetch_count(&f, 1), 1);
    let state = f.coordinator.overlay_state(ClassId::new(1)).unwrap();
    let overlay = state.overlay().expect("open overlay");
    {
        let surface = f.coordinator.surface();
        let (anchor, content) = &surface.overlays[&overlay];
        assert_eq!(*anchor, marker);
        assert_eq!(content.title, "Pottery");
        assert_eq!(content.link, "/student/class_detail/1");
    }

    f.coordinator
        .handle_event(MapEvent::MarkerClicked(marker))
        .await;
    assert_eq!(fetch_count(&f, 1), 1);
    assert_eq!(f.coordinator.surface().overlays.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clicks_while_loading_do_not_fetch_again() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();
    let click = MapEvent::MarkerClicked(marker);
    tokio::join!(
        f.coordinator.handle_event(click),
        f.coordinator.handle_event(click)
    );
    assert_eq!(fetch_count(&f, 1), 1);
    assert_eq!(f.coordinator.surface().overlays.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn closing_permits_exactly_one_more_fetch() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();
    let click = MapEvent::MarkerClicked(marker);

    f.coordinator.handle_event(click).await;
    let overlay = f
        .coordinator
        .overlay_state(ClassId::new(1))
        .and_then(|state| state.overlay())
        .unwrap();
    f.coordinator
        .handle_event(MapEvent::OverlayClosed(overlay))
        .await;
    assert!(f.coordinator.surface().overlays.is_empty());
    assert_eq!(
        f.coordinator.overlay_state(ClassId::new(1)),
        Some(OverlayState::Closed)
    );

    f.coordinator.handle_event(click).await;
    f.coordinator.handle_event(click).await;
    assert_eq!(fetch_count(&f, 1), 2);
    assert_eq!(f.coordinator.surface().overlays.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_summary_fetch_closes_the_overlay_again() {
    let f = fixture(default_geocoder(), MockSummaries::default());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(7, "Hongdae")])
        .await
        .unwrap();
    let marker = f.coordinator.class_marker(ClassId::new(7)).unwrap();
    f.coordinator
        .handle_event(MapEvent::MarkerClicked(marker))
        .await;
    assert_eq!(
        f.coordinator.overlay_state(ClassId::new(7)),
        Some(OverlayState::Closed)
    );
    assert!(f.coordinator.surface().overlays.is_empty());
    assert_eq!(
        f.notifier.notifications(),
        vec![UserNotification::ClassSummaryUnavailable {
            class_id: ClassId::new(7)
        }]
    );
    // no automatic retry, but the next click fetches again
    assert_eq!(fetch_count(&f, 7), 1);
    f.coordinator
        .handle_event(MapEvent::MarkerClicked(marker))
        .await;
    assert_eq!(fetch_count(&f, 7), 2);
}

#[tokio::test(start_paused = true)]
async fn every_drag_and_zoom_reports_bounds_exactly_once() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator.initialize("", &[]).await.unwrap();
    f.reported.borrow_mut().clear();

    f.coordinator.handle_event(MapEvent::DragEnd).await;
    assert_eq!(f.reported.borrow().len(), 1);
    f.coordinator.handle_event(MapEvent::ZoomChanged).await;
    assert_eq!(f.reported.borrow().len(), 2);
    f.coordinator.handle_event(MapEvent::DragEnd).await;
    assert_eq!(f.reported.borrow().len(), 3);

    for bounds in f.reported.borrow().iter() {
        assert!(bounds.min_lat <= bounds.max_lat);
        assert!(bounds.min_lng <= bounds.max_lng);
    }
}

#[tokio::test(start_paused = true)]
async fn marker_and_overlay_clicks_do_not_report_bounds() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    f.reported.borrow_mut().clear();
    let marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();
    f.coordinator
        .handle_event(MapEvent::MarkerClicked(marker))
        .await;
    let overlay = f
        .coordinator
        .overlay_state(ClassId::new(1))
        .and_then(|state| state.overlay())
        .unwrap();
    f.coordinator
        .handle_event(MapEvent::OverlayClosed(overlay))
        .await;
    assert!(f.reported.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn summary_of_a_replaced_marker_is_discarded() {
    let f = fixture(default_geocoder(), default_summaries());
    f.coordinator
        .initialize("", &[ClassMarkerEntry::new(1, "Seoul City Hall")])
        .await
        .unwrap();
    let marker = f.coordinator.class_marker(ClassId::new(1)).unwrap();
    let entries = [ClassMarkerEntry::new(1, "Seoul City Hall")];
    tokio::join!(
        f.coordinator.handle_event(MapEvent::MarkerClicked(marker)),
        f.coordinator.place_class_markers(&entries)
    );
    assert!(f.coordinator.surface().overlays.is_empty());
    assert_eq!(
        f.coordinator.overlay_state(ClassId::new(1)),
        Some(OverlayState::Closed)
    );
}

#[test]
fn report_bounds_without_map() {
    let f = fixture(default_geocoder(), default_summaries());
    assert_eq!(f.coordinator.report_bounds(), None);
    assert!(f.reported.borrow().is_empty());
}
