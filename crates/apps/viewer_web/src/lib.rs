//! Browser shell for the viewer.
//!
//! Owns the single [`Viewer`] instance for the page and bridges it to
//! browser APIs: the address bar, `localStorage`, timers, geolocation and
//! the console. The page script renders whatever the `*_json` getters
//! return and re-reads them whenever the listener registered with
//! [`set_listener`] fires.

use std::cell::RefCell;
use std::io;
use std::str::FromStr;

use catalog::{InMemoryStore, KeyValueStore, LocalStorageStore, StorageError};
use foundation::geo::LatLng;
use foundation::time::Clock;
use geocoding::{Geocoder, NominatimClient, Place};
use serde::Serialize;
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use viewer::{Focus, LocateError, SHORTCUT_HELP, SidePanel, Viewer, ViewerConfig};
use viewstate::{LayerType, ProviderId, ViewState, url};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug)]
enum BrowserStore {
    Local(LocalStorageStore),
    Memory(InMemoryStore),
}

impl BrowserStore {
    fn new() -> Self {
        match LocalStorageStore::new() {
            Ok(s) => BrowserStore::Local(s),
            Err(err) => {
                tracing::warn!(%err, "localStorage unavailable, places kept for this session only");
                BrowserStore::Memory(InMemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            BrowserStore::Local(s) => s.load(key),
            BrowserStore::Memory(s) => s.load(key),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Local(s) => s.save(key, value),
            BrowserStore::Memory(s) => s.save(key, value),
        }
    }
}

struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

struct App {
    viewer: Viewer<BrowserStore>,
    geocoder: NominatimClient,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static LISTENER: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
}

/// Read access; returns the default before [`init_viewer`] or on teardown.
fn with_app<F, R>(f: F) -> R
where
    F: FnOnce(&App) -> R,
    R: Default,
{
    APP.try_with(|cell| match cell.try_borrow() {
        Ok(slot) => slot.as_ref().map(f).unwrap_or_default(),
        Err(_) => R::default(),
    })
    .unwrap_or_default()
}

/// Mutating access. The page listener is told afterwards, outside the borrow,
/// so it may call straight back in.
fn update_app<F, R>(f: F) -> R
where
    F: FnOnce(&mut App) -> R,
    R: Default,
{
    let out = APP
        .try_with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().map(f).unwrap_or_default(),
            Err(_) => {
                tracing::warn!("viewer busy, call dropped");
                R::default()
            }
        })
        .unwrap_or_default();
    notify_listener();
    out
}

fn notify_listener() {
    let listener = LISTENER
        .try_with(|l| l.borrow().clone())
        .ok()
        .flatten();
    if let Some(f) = listener {
        if let Err(e) = f.call0(&JsValue::NULL) {
            tracing::warn!(error = ?e, "page listener threw");
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        tracing::error!(%e, "serialization failed");
        "null".to_string()
    })
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Rewrites the query string in place, without a new history entry.
fn replace_address_bar(state: &ViewState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let query = format!("?{}", url::encode(state));
    if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&query)) {
        tracing::warn!(error = ?e, "history.replaceState failed");
    }
}

// --- console logging ---

struct ConsoleMakeWriter;

struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // Fails only if a subscriber is already installed (page re-init).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .try_init();
}

// --- lifecycle ---

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Creates the viewer from the current page URL. `config_json` may be `""`.
#[wasm_bindgen]
pub fn init_viewer(config_json: &str) -> Result<(), JsValue> {
    let config = ViewerConfig::from_json(config_json).map_err(js_err)?;
    init_tracing(&config.log_filter);

    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let href = window.location().href()?;

    let geocoder = NominatimClient::new(
        config.search.endpoint.clone(),
        config.search.result_limit,
        config.search.user_agent.clone(),
    );
    let mut viewer = Viewer::new(config, &href, BrowserStore::new(), Box::new(JsClock));
    replace_address_bar(&viewer.view());
    viewer.subscribe(replace_address_bar);

    APP.with(|cell| *cell.borrow_mut() = Some(App { viewer, geocoder }));
    notify_listener();
    Ok(())
}

/// Called with no arguments after every state change.
#[wasm_bindgen]
pub fn set_listener(listener: Option<js_sys::Function>) {
    LISTENER.with(|l| *l.borrow_mut() = listener);
}

// --- view ---

#[wasm_bindgen]
pub fn view_json() -> String {
    with_app(|app| to_json(&app.viewer.view()))
}

#[wasm_bindgen]
pub fn select_provider(code: &str) -> Result<(), JsValue> {
    let provider = ProviderId::from_str(code).map_err(js_err)?;
    match update_app(|app| app.viewer.select_provider(provider).err()) {
        Some(err) => Err(js_err(err)),
        None => Ok(()),
    }
}

#[wasm_bindgen]
pub fn set_layer(code: &str) -> Result<(), JsValue> {
    let layer = LayerType::from_str(code).map_err(js_err)?;
    match update_app(|app| app.viewer.set_layer(layer).err()) {
        Some(err) => Err(js_err(err)),
        None => Ok(()),
    }
}

/// Pan/zoom end reported by the map widget.
#[wasm_bindgen]
pub fn on_map_moved(lat: f64, lng: f64, zoom: f64) {
    update_app(|app| app.viewer.on_map_moved(lat, lng, zoom));
}

/// Returns the `KeyOutcome` as JSON; the page applies its `effect`.
#[wasm_bindgen]
pub fn on_key(key: &str, in_text_entry: bool) -> String {
    let focus = if in_text_entry {
        Focus::TextEntry
    } else {
        Focus::Document
    };
    update_app(|app| to_json(&app.viewer.handle_key(key, focus)))
}

#[wasm_bindgen]
pub fn reset_view() {
    update_app(|app| app.viewer.reset_view().ok());
}

#[wasm_bindgen]
pub fn share_link() -> String {
    with_app(|app| app.viewer.share_link())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileLayer {
    url_template: String,
    attribution: &'static str,
    max_zoom: u8,
    subdomains: &'static [&'static str],
}

/// Tile layer for the current provider and layer, credentials filled in.
#[wasm_bindgen]
pub fn tile_layer_json() -> String {
    with_app(|app| {
        let source = app.viewer.tile_source();
        to_json(&TileLayer {
            url_template: source.keyed_template(&app.viewer.config().tiles),
            attribution: source.attribution,
            max_zoom: source.max_zoom,
            subdomains: source.subdomains,
        })
    })
}

#[wasm_bindgen]
pub fn provider_info_json() -> String {
    with_app(|app| to_json(&app.viewer.provider_info()))
}

// --- overlays ---

#[wasm_bindgen]
pub fn overlays_json() -> String {
    with_app(|app| to_json(&app.viewer.overlays()))
}

/// Header button: `"favorites"` or `"history"`.
#[wasm_bindgen]
pub fn toggle_panel(kind: &str) -> Result<(), JsValue> {
    let panel = match kind {
        "favorites" => SidePanel::Favorites,
        "history" => SidePanel::History,
        other => return Err(js_err(format!("unknown panel {other:?}"))),
    };
    update_app(|app| app.viewer.overlays_mut().toggle_panel(panel));
    Ok(())
}

#[wasm_bindgen]
pub fn set_shortcuts_dialog(open: bool) {
    update_app(|app| app.viewer.overlays_mut().show_shortcuts(open));
}

#[wasm_bindgen]
pub fn set_provider_info_dialog(open: bool) {
    update_app(|app| app.viewer.overlays_mut().show_provider_info(open));
}

#[wasm_bindgen]
pub fn close_overlays() {
    update_app(|app| app.viewer.overlays_mut().close_all());
}

#[derive(Serialize)]
struct HelpRow {
    key: &'static str,
    action: &'static str,
}

#[wasm_bindgen]
pub fn shortcut_help_json() -> String {
    let rows: Vec<HelpRow> = SHORTCUT_HELP
        .iter()
        .map(|&(key, action)| HelpRow { key, action })
        .collect();
    to_json(&rows)
}

// --- favorites and history ---

#[wasm_bindgen]
pub fn favorites_json() -> String {
    with_app(|app| to_json(app.viewer.favorites()))
}

#[wasm_bindgen]
pub fn history_json() -> String {
    with_app(|app| to_json(app.viewer.history()))
}

/// Returns whether a favorite was added.
#[wasm_bindgen]
pub fn add_favorite(name: Option<String>) -> bool {
    update_app(|app| app.viewer.add_favorite(name.as_deref()).is_ok())
}

#[wasm_bindgen]
pub fn remove_favorite(id: &str) -> bool {
    update_app(|app| app.viewer.remove_favorite(id))
}

#[wasm_bindgen]
pub fn clear_history() {
    update_app(|app| app.viewer.clear_history());
}

#[wasm_bindgen]
pub fn replay_favorite(id: &str) -> bool {
    update_app(|app| app.viewer.replay_favorite(id).is_some())
}

#[wasm_bindgen]
pub fn replay_history(id: &str) -> bool {
    update_app(|app| app.viewer.replay_history(id).is_some())
}

// --- search ---

#[derive(Serialize)]
struct SearchView<'a> {
    query: &'a str,
    loading: bool,
    results: &'a [Place],
}

#[wasm_bindgen]
pub fn search_json() -> String {
    with_app(|app| {
        let s = app.viewer.search();
        to_json(&SearchView {
            query: s.query(),
            loading: s.is_loading(),
            results: s.results(),
        })
    })
}

/// Search-box input. The lookup runs once typing pauses.
#[wasm_bindgen]
pub fn search_input(text: &str) {
    let now = js_sys::Date::now() as u64;
    let due = update_app(|app| Some(app.viewer.search_input(text, now)));
    if let Some(due) = due {
        schedule_search_poll(due.saturating_sub(now));
    }
}

#[wasm_bindgen]
pub fn select_search_result(index: usize) -> bool {
    update_app(|app| app.viewer.select_search_result(index).is_some())
}

fn schedule_search_poll(delay_ms: u64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(poll_search);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        tracing::warn!(error = ?e, "setTimeout failed");
    }
}

fn poll_search() {
    let now = js_sys::Date::now() as u64;
    let (request, retry_at) = update_app(|app| {
        let request = app
            .viewer
            .poll_search(now)
            .map(|req| (req, app.geocoder.clone()));
        (request, app.viewer.search().deadline())
    });

    let Some((request, geocoder)) = request else {
        // Timer fired a little early for the latest keystroke.
        if let Some(due) = retry_at {
            schedule_search_poll(due.saturating_sub(now).max(1));
        }
        return;
    };

    spawn_local(async move {
        let outcome = geocoder.search(&request.query).await;
        update_app(|app| app.viewer.complete_search(request.ticket, outcome));
    });
}

// --- geolocation ---

#[wasm_bindgen]
pub fn locate() {
    let Some(ticket) = update_app(|app| Some(app.viewer.request_location())) else {
        return;
    };

    let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
    let Some(geolocation) = geolocation else {
        update_app(|app| app.viewer.complete_location(ticket, Err(LocateError::Unsupported)));
        return;
    };

    let on_fix = Closure::once_into_js(move |position: JsValue| {
        let outcome = read_coords(&position).ok_or(LocateError::Unavailable);
        update_app(|app| {
            app.viewer.complete_location(ticket, outcome);
        });
    });
    let on_error = Closure::once_into_js(move |error: JsValue| {
        let code = js_sys::Reflect::get(&error, &JsValue::from_str("code"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(2.0) as u16;
        update_app(|app| {
            app.viewer
                .complete_location(ticket, Err(LocateError::from_code(code)));
        });
    });

    if let Err(e) = geolocation
        .get_current_position_with_error_callback(on_fix.unchecked_ref(), Some(on_error.unchecked_ref()))
    {
        tracing::warn!(error = ?e, "getCurrentPosition failed");
        update_app(|app| app.viewer.complete_location(ticket, Err(LocateError::Unavailable)));
    }
}

fn read_coords(position: &JsValue) -> Option<LatLng> {
    let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let lat = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude"))
        .ok()?
        .as_f64()?;
    let lng = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude"))
        .ok()?
        .as_f64()?;
    Some(LatLng::new(lat, lng))
}

// --- notices ---

/// Pending notices as JSON, oldest first. Each is returned once.
#[wasm_bindgen]
pub fn drain_notices_json() -> String {
    let notices = APP
        .try_with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => slot
                .as_mut()
                .map(|app| app.viewer.drain_notices())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        })
        .unwrap_or_default();
    to_json(&notices)
}
