use std::cell::RefCell;
use std::rc::Rc;

use catalog::{CatalogError, InMemoryStore, KeyValueStore, StorageError};
use foundation::geo::LatLng;
use foundation::time::ManualClock;
use geocoding::{Place, TransportError};
use pretty_assertions::assert_eq;
use viewer::{
    Effect, Focus, LocateError, NoticeKind, Shortcut, SidePanel, Viewer, ViewerConfig,
};
use viewstate::{LayerType, ProviderId, ViewState};

const PAGE: &str = "https://maps.example/app";

fn viewer_at(query: &str) -> Viewer<InMemoryStore> {
    viewer_with(query, InMemoryStore::new())
}

fn viewer_with<S: KeyValueStore>(query: &str, store: S) -> Viewer<S> {
    let page = format!("{PAGE}{query}");
    Viewer::new(
        ViewerConfig::default(),
        &page,
        store,
        Box::new(ManualClock::new(1_700_000_000_000)),
    )
}

fn paris() -> Place {
    Place {
        id: "1".to_string(),
        name: "Paris".to_string(),
        lat: 48.8566,
        lng: 2.3522,
        display_label: "Paris, Île-de-France, France".to_string(),
        kind: "city".to_string(),
    }
}

/// Store whose writes always fail.
#[derive(Debug, Default)]
struct FullStore;

impl KeyValueStore for FullStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io("quota exceeded".to_string()))
    }
}

#[test]
fn initial_view_comes_from_page_url() {
    let v = viewer_at("?m=esri&t=p&lat=51.5&lng=-0.12&z=12");
    assert_eq!(
        v.view(),
        ViewState {
            provider: ProviderId::Esri,
            layer: LayerType::Plain,
            lat: 51.5,
            lng: -0.12,
            zoom: 12,
        }
    );
    assert!(v.share_link().starts_with("https://maps.example/app?m=esri&t=p"));
}

#[test]
fn garbage_zoom_keeps_valid_coordinates() {
    let v = viewer_at("?lat=10.5&lng=20.25&z=banana");
    let s = v.view();
    assert_eq!((s.lat, s.lng, s.zoom), (10.5, 20.25, 10));
}

#[test]
fn digit_two_selects_mapbox() {
    let mut v = viewer_at("");
    let out = v.handle_key("2", Focus::Document);
    assert_eq!(out.shortcut, Some(Shortcut::SelectProvider(ProviderId::Mapbox)));
    assert_eq!(v.view().provider, ProviderId::Mapbox);
    assert!(v.tile_source().url_template.contains("mapbox"));
}

#[test]
fn s_toggles_layer_once_per_press() {
    let mut v = viewer_at("");
    v.handle_key("s", Focus::Document);
    assert_eq!(v.view().layer, LayerType::Plain);
    v.handle_key("S", Focus::Document);
    assert_eq!(v.view().layer, LayerType::Satellite);
}

#[test]
fn unmapped_key_and_text_focus_leave_view_unchanged() {
    let mut v = viewer_at("");
    let before = v.view();
    assert_eq!(v.handle_key("q", Focus::Document).shortcut, None);
    assert_eq!(v.handle_key("2", Focus::TextEntry).shortcut, None);
    assert_eq!(v.view(), before);
    assert!(v.drain_notices().is_empty());
}

#[test]
fn observers_see_each_change_synchronously() {
    let mut v = viewer_at("");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    v.subscribe(move |state: &ViewState| s.borrow_mut().push(state.provider));

    v.handle_key("5", Focus::Document);
    assert_eq!(*seen.borrow(), vec![ProviderId::Osm]);
    v.handle_key("q", Focus::Document);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn favorite_shortcut_rejects_nearby_duplicate() {
    let mut v = viewer_at("?lat=40.7128&lng=-74.006");
    v.handle_key("f", Focus::Document);
    assert_eq!(v.favorites().len(), 1);
    assert_eq!(v.favorites()[0].name, "Location 40.7128, -74.0060");

    v.on_map_moved(40.71285, -74.00605, 10.0).unwrap();
    let err = v.add_favorite(Some("Again")).unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(_)));
    assert_eq!(v.favorites().len(), 1);

    let notices = v.drain_notices();
    let titles: Vec<&str> = notices.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["Added to favorites", "Already in favorites"]);
}

#[test]
fn map_moves_are_brought_into_range_without_history() {
    let mut v = viewer_at("");
    let s = v.on_map_moved(91.0, 190.0, 18.6).unwrap();
    assert_eq!((s.lat, s.lng, s.zoom), (90.0, -170.0, 18));
    assert_eq!(v.on_map_moved(f64::NAN, 0.0, 3.0), None);
    assert_eq!(v.view(), s);
    assert!(v.history().is_empty());
}

#[test]
fn search_selection_navigates_and_records_history() {
    let mut v = viewer_at("?z=7");
    for (i, t) in [0u64, 100, 200, 300, 400].into_iter().enumerate() {
        v.search_input(&"Paris"[..=i], t);
        assert_eq!(v.poll_search(t), None);
    }
    let req = v.poll_search(900).unwrap();
    assert_eq!(req.query, "Paris");
    assert!(v.complete_search(req.ticket, Ok(vec![paris()])));

    let s = v.select_search_result(0).unwrap();
    assert_eq!((s.lat, s.lng, s.zoom), (48.8566, 2.3522, 7));
    assert_eq!(v.search().query(), "Paris");
    assert_eq!(v.history().len(), 1);
    assert_eq!(v.history()[0].name, "Paris");
}

#[test]
fn failed_search_shows_no_results() {
    let mut v = viewer_at("");
    v.search_input("Atlantis", 0);
    let req = v.poll_search(500).unwrap();
    assert!(v.complete_search(req.ticket, Err(TransportError::Http("offline".into()))));
    assert!(v.search().results().is_empty());
    assert_eq!(v.select_search_result(0), None);
}

#[test]
fn replaying_history_moves_it_to_front() {
    let mut v = viewer_at("");
    v.navigate_to(10.0, 10.0, "A").unwrap();
    v.navigate_to(20.0, 20.0, "B").unwrap();
    let a_id = v.history()[1].id.clone();

    v.replay_history(&a_id).unwrap();
    let names: Vec<&str> = v.history().iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(v.view().center(), LatLng::new(10.0, 10.0));
}

#[test]
fn reset_restores_default_view() {
    let mut v = viewer_at("?m=here&t=p&lat=1&lng=2&z=3");
    let out = v.handle_key("r", Focus::Document);
    assert_eq!(out.shortcut, Some(Shortcut::ResetView));
    assert_eq!(v.view(), ViewState::default());
    assert_eq!(v.drain_notices()[0].title, "View reset");
}

#[test]
fn copy_link_hands_url_to_shell() {
    let mut v = viewer_at("?m=osm#frag");
    let out = v.handle_key("c", Focus::Document);
    assert_eq!(
        out.effect,
        Some(Effect::CopyLink(
            "https://maps.example/app?m=osm&t=s&lat=40.7128&lng=-74.006&z=10".to_string()
        ))
    );
    assert_eq!(v.drain_notices()[0].title, "Link copied");
}

#[test]
fn slash_focuses_search_and_suppresses_default() {
    let mut v = viewer_at("");
    let out = v.handle_key("/", Focus::Document);
    assert!(out.prevent_default);
    assert_eq!(out.effect, Some(Effect::FocusSearch));
}

#[test]
fn history_key_opens_panel_and_escape_closes_everything() {
    let mut v = viewer_at("");
    v.handle_key("h", Focus::Document);
    assert_eq!(v.overlays().panel, Some(SidePanel::History));
    v.overlays_mut().show_shortcuts(true);

    v.handle_key("Escape", Focus::Document);
    assert!(!v.overlays().any_open());
}

#[test]
fn stale_location_fix_is_ignored() {
    let mut v = viewer_at("");
    let first = v.request_location();
    let second = v.request_location();

    assert_eq!(v.complete_location(first, Ok(LatLng::new(1.0, 1.0))), None);
    let s = v.complete_location(second, Ok(LatLng::new(35.0, 139.0))).unwrap();
    assert_eq!(s.center(), LatLng::new(35.0, 139.0));
    assert_eq!(v.history()[0].name, "Current location");
    assert!(!v.is_locating());
}

#[test]
fn location_failure_becomes_error_notice() {
    let mut v = viewer_at("");
    let t = v.request_location();
    assert_eq!(v.complete_location(t, Err(LocateError::PermissionDenied)), None);
    let notices = v.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(v.view(), ViewState::default());
}

#[test]
fn save_failures_are_reported_but_session_continues() {
    let mut v = viewer_with("", FullStore);
    assert!(matches!(
        v.add_favorite(Some("Home")),
        Err(CatalogError::Storage(_))
    ));
    assert_eq!(v.favorites().len(), 1);
    assert_eq!(v.drain_notices()[0].kind, NoticeKind::Error);
}

#[test]
fn corrupt_storage_starts_empty_with_notice() {
    let store = InMemoryStore::new().with_value("satellitesmaps-favorites", "{not json");
    let mut v = viewer_with("", store);
    assert!(v.favorites().is_empty());
    let notices = v.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
}

#[test]
fn removing_and_clearing() {
    let mut v = viewer_at("");
    let fav = v.add_favorite(Some("Home")).unwrap();
    v.navigate_to(1.0, 1.0, "Somewhere").unwrap();
    v.drain_notices();

    assert!(v.remove_favorite(&fav.id));
    assert!(!v.remove_favorite(&fav.id));
    v.clear_history();
    assert!(v.favorites().is_empty());
    assert!(v.history().is_empty());

    let titles: Vec<String> = v.drain_notices().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, ["Removed from favorites", "History cleared"]);
}

#[test]
fn center_tile_follows_provider_and_layer() {
    let mut v = viewer_at("");
    assert_eq!(
        v.center_tile_url(),
        "https://mt1.google.com/vt/lyrs=s&x=301&y=385&z=10"
    );
    v.handle_key("3", Focus::Document);
    v.handle_key("s", Focus::Document);
    assert_eq!(
        v.center_tile_url(),
        "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/10/385/301"
    );
    assert_eq!(v.provider_info().name, "Esri ArcGIS");
}
