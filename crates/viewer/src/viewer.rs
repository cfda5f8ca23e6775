use catalog::{
    CatalogError, CatalogOptions, FavoriteEntry, HistoryEntry, KeyValueStore, PlacesCatalog,
    StorageError,
};
use foundation::geo::{LatLng, clamp_lat, wrap_lng};
use foundation::time::Clock;
use geocoding::{Place, SearchRequest, SearchSession, TransportError};
use runtime::event_bus::ObserverId;
use runtime::task::{TaskSlot, Ticket};
use serde::Serialize;
use tiles::{ProviderInfo, TileCoord, TileSource, provider_info, resolve};
use viewstate::{
    InvalidStateError, LayerType, MAX_ZOOM, MIN_ZOOM, ProviderId, ViewState, ViewStore,
    ViewUpdate, url,
};

use crate::config::ViewerConfig;
use crate::locate::{CURRENT_LOCATION_NAME, LocateError};
use crate::notice::{Notice, Notices};
use crate::overlay::{Overlays, SidePanel};
use crate::shortcuts::{Focus, Shortcut, dispatch};

/// Something the shell has to do on the viewer's behalf after a key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Effect {
    FocusSearch,
    CopyLink(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    pub shortcut: Option<Shortcut>,
    pub prevent_default: bool,
    pub effect: Option<Effect>,
}

/// The viewer: one view store, one places catalog, one search box.
///
/// Every method runs to completion on the caller's thread. Asynchronous work
/// (geocoding, geolocation) is started by the shell with a [`Ticket`] from
/// here and handed back through the matching `complete_*` method, which
/// drops results for superseded tickets.
#[derive(Debug)]
pub struct Viewer<S> {
    config: ViewerConfig,
    page_url: String,
    view: ViewStore,
    places: PlacesCatalog<S>,
    search: SearchSession,
    locating: TaskSlot,
    overlays: Overlays,
    notices: Notices,
}

impl<S: KeyValueStore> Viewer<S> {
    /// Starts a viewer for the page at `page_url`, taking the initial view
    /// from its query string.
    pub fn new(config: ViewerConfig, page_url: &str, storage: S, clock: Box<dyn Clock>) -> Self {
        let initial = url::decode(query_of(page_url));
        let view = ViewStore::new(initial).unwrap_or_else(|err| {
            tracing::warn!(%err, "decoded view is invalid, using defaults");
            ViewStore::default()
        });

        let options = CatalogOptions {
            keys: config.storage.clone(),
            history_limit: config.history_limit,
        };
        let (places, load_errors) = PlacesCatalog::open(storage, options, clock);

        let mut notices = Notices::default();
        for err in load_errors {
            notices.push(storage_notice("Saved places could not be loaded", &err));
        }

        let search = SearchSession::new(config.search.debounce_ms, config.search.min_query_chars);

        let state = view.get();
        tracing::info!(
            provider = %state.provider,
            layer = %state.layer,
            lat = state.lat,
            lng = state.lng,
            zoom = state.zoom,
            "viewer started"
        );

        Self {
            config,
            page_url: page_url.to_string(),
            view,
            places,
            search,
            locating: TaskSlot::new(),
            overlays: Overlays::default(),
            notices,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn view(&self) -> ViewState {
        self.view.get()
    }

    pub fn favorites(&self) -> &[FavoriteEntry] {
        self.places.favorites()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.places.history()
    }

    pub fn places(&self) -> &PlacesCatalog<S> {
        &self.places
    }

    /// Registers a view observer. It runs synchronously inside every
    /// successful view change, in registration order.
    pub fn subscribe(&mut self, observer: impl FnMut(&ViewState) + 'static) -> ObserverId {
        self.view.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.view.unsubscribe(id)
    }

    // --- view ---

    pub fn update(&mut self, update: ViewUpdate) -> Result<ViewState, InvalidStateError> {
        self.view.update(update)
    }

    pub fn select_provider(&mut self, provider: ProviderId) -> Result<ViewState, InvalidStateError> {
        self.update(ViewUpdate::new().provider(provider))
    }

    pub fn set_layer(&mut self, layer: LayerType) -> Result<ViewState, InvalidStateError> {
        self.update(ViewUpdate::new().layer(layer))
    }

    pub fn toggle_layer(&mut self) -> Result<ViewState, InvalidStateError> {
        let layer = self.view().layer.toggled();
        self.set_layer(layer)
    }

    /// Pan/zoom reported by the rendering surface.
    ///
    /// Values are brought into range here (latitude clamped, longitude
    /// wrapped, zoom rounded and clamped) so the store never sees a map
    /// position it would reject. Does not record history.
    pub fn on_map_moved(&mut self, lat: f64, lng: f64, zoom: f64) -> Option<ViewState> {
        if !(lat.is_finite() && lng.is_finite() && zoom.is_finite()) {
            tracing::warn!(lat, lng, zoom, "ignoring non-finite map position");
            return None;
        }
        let zoom = zoom.round().clamp(f64::from(MIN_ZOOM), f64::from(MAX_ZOOM)) as u8;
        let update = ViewUpdate::new()
            .center(clamp_lat(lat), wrap_lng(lng))
            .zoom(zoom);
        self.update(update)
            .inspect_err(|err| tracing::warn!(%err, "map move rejected"))
            .ok()
    }

    /// Centres the map on a chosen place and records the visit.
    ///
    /// Provider, layer and zoom are kept.
    pub fn navigate_to(
        &mut self,
        lat: f64,
        lng: f64,
        name: impl Into<String>,
    ) -> Result<ViewState, InvalidStateError> {
        let state = self.update(ViewUpdate::new().center(lat, lng))?;
        if let Err(err) = self.places.record_visit(&state, name) {
            self.notices.push(storage_notice("History not saved", &err));
        }
        Ok(state)
    }

    /// Back to the default view.
    pub fn reset_view(&mut self) -> Result<ViewState, InvalidStateError> {
        let state = self.update(ViewUpdate::from(ViewState::default()))?;
        self.notices.push(Notice::info(
            "View reset",
            "Back to the starting location.",
        ));
        Ok(state)
    }

    /// The page URL with the current view encoded in its query string.
    pub fn share_link(&self) -> String {
        url::share_url(&self.page_url, &self.view())
    }

    pub fn tile_source(&self) -> TileSource {
        let state = self.view();
        resolve(state.provider, state.layer)
    }

    /// URL of the tile under the map centre at the current zoom.
    pub fn center_tile_url(&self) -> String {
        let state = self.view();
        let coord = TileCoord::containing(state.lat, state.lng, state.zoom);
        self.tile_source().tile_url(coord, &self.config.tiles)
    }

    pub fn provider_info(&self) -> ProviderInfo {
        provider_info(self.view().provider)
    }

    // --- favorites and history ---

    /// Saves the current view as a favorite. Without a name (or with a blank
    /// one) it is named after its coordinates.
    pub fn add_favorite(&mut self, name: Option<&str>) -> Result<FavoriteEntry, CatalogError> {
        let state = self.view();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_favorite_name(&state));

        match self.places.add_favorite(&state, name) {
            Ok(entry) => {
                self.notices
                    .push(Notice::info("Added to favorites", entry.name.clone()));
                Ok(entry)
            }
            Err(CatalogError::Duplicate(dup)) => {
                self.notices.push(Notice::info(
                    "Already in favorites",
                    format!("{} is already saved.", dup.existing_name),
                ));
                Err(dup.into())
            }
            Err(CatalogError::Storage(err)) => {
                self.notices.push(storage_notice("Favorite not saved", &err));
                Err(err.into())
            }
        }
    }

    /// Returns whether a favorite with `id` existed.
    pub fn remove_favorite(&mut self, id: &str) -> bool {
        match self.places.remove_favorite(id) {
            Ok(false) => false,
            Ok(true) => {
                self.notices.push(Notice::info(
                    "Removed from favorites",
                    "The place was removed.",
                ));
                true
            }
            Err(err) => {
                self.notices.push(storage_notice("Favorite removal not saved", &err));
                true
            }
        }
    }

    pub fn clear_history(&mut self) {
        match self.places.clear_history() {
            Ok(()) => self
                .notices
                .push(Notice::info("History cleared", "All visits were removed.")),
            Err(err) => self
                .notices
                .push(storage_notice("History clearing not saved", &err)),
        }
    }

    pub fn replay_favorite(&mut self, id: &str) -> Option<ViewState> {
        let fav = self.places.favorite(id)?.clone();
        self.navigate_logged(fav.lat, fav.lng, fav.name)
    }

    pub fn replay_history(&mut self, id: &str) -> Option<ViewState> {
        let entry = self.places.history_entry(id)?.clone();
        self.navigate_logged(entry.lat, entry.lng, entry.name)
    }

    // --- search ---

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    /// New search-box text at `now_ms`. Returns when [`Viewer::poll_search`]
    /// should run next.
    pub fn search_input(&mut self, text: &str, now_ms: u64) -> u64 {
        self.search.set_query(text, now_ms)
    }

    pub fn poll_search(&mut self, now_ms: u64) -> Option<SearchRequest> {
        self.search.poll(now_ms)
    }

    pub fn complete_search(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<Place>, TransportError>,
    ) -> bool {
        self.search.complete(ticket, outcome)
    }

    pub fn select_search_result(&mut self, index: usize) -> Option<ViewState> {
        let place = self.search.select(index)?;
        self.navigate_logged(place.lat, place.lng, place.name)
    }

    // --- geolocation ---

    /// Starts a location request, superseding any earlier one.
    pub fn request_location(&mut self) -> Ticket {
        self.locating.begin()
    }

    pub fn is_locating(&self) -> bool {
        self.locating.is_busy()
    }

    pub fn complete_location(
        &mut self,
        ticket: Ticket,
        outcome: Result<LatLng, LocateError>,
    ) -> Option<ViewState> {
        if !self.locating.finish(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale location fix");
            return None;
        }
        let fix = match outcome {
            Ok(fix) => fix,
            Err(err) => {
                tracing::warn!(%err, "geolocation failed");
                self.notices.push(Notice::error(
                    "Location error",
                    format!("Could not get your location: {err}."),
                ));
                return None;
            }
        };

        match self.navigate_to(fix.lat, fix.lng, CURRENT_LOCATION_NAME) {
            Ok(state) => {
                self.notices.push(Notice::info(
                    "Location found",
                    "Navigating to your current location.",
                ));
                Some(state)
            }
            Err(err) => {
                tracing::warn!(%err, "geolocation fix out of range");
                self.notices.push(Notice::error("Location error", err.to_string()));
                None
            }
        }
    }

    // --- overlays and keys ---

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    pub fn handle_key(&mut self, key: &str, focus: Focus) -> KeyOutcome {
        let Some(shortcut) = dispatch(key, focus) else {
            return KeyOutcome::default();
        };
        tracing::debug!(key, ?shortcut, "shortcut");

        let mut effect = None;
        match shortcut {
            Shortcut::SelectProvider(provider) => {
                if let Err(err) = self.select_provider(provider) {
                    tracing::warn!(%err, "provider change rejected");
                }
            }
            Shortcut::ToggleLayer => {
                if let Err(err) = self.toggle_layer() {
                    tracing::warn!(%err, "layer toggle rejected");
                }
            }
            Shortcut::AddFavorite => {
                if let Err(err) = self.add_favorite(None) {
                    tracing::debug!(%err, "favorite shortcut had no effect");
                }
            }
            Shortcut::OpenHistory => self.overlays.open_panel(SidePanel::History),
            Shortcut::ResetView => {
                if let Err(err) = self.reset_view() {
                    tracing::warn!(%err, "reset rejected");
                }
            }
            Shortcut::CopyLink => {
                let link = self.share_link();
                self.notices
                    .push(Notice::info("Link copied", "URL copied to the clipboard."));
                effect = Some(Effect::CopyLink(link));
            }
            Shortcut::FocusSearch => effect = Some(Effect::FocusSearch),
            Shortcut::CloseOverlays => self.overlays.close_all(),
        }

        KeyOutcome {
            shortcut: Some(shortcut),
            prevent_default: shortcut.prevents_default(),
            effect,
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn navigate_logged(&mut self, lat: f64, lng: f64, name: String) -> Option<ViewState> {
        self.navigate_to(lat, lng, name)
            .inspect_err(|err| tracing::warn!(%err, "navigation rejected"))
            .ok()
    }
}

/// Name given to a favorite saved without one.
pub fn default_favorite_name(state: &ViewState) -> String {
    format!("Location {:.4}, {:.4}", state.lat, state.lng)
}

fn storage_notice(title: &str, err: &StorageError) -> Notice {
    Notice::error(title, err.to_string())
}

fn query_of(page_url: &str) -> &str {
    let without_fragment = page_url.split('#').next().unwrap_or(page_url);
    without_fragment.split_once('?').map_or("", |(_, q)| q)
}
