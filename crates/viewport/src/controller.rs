use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use foundation::geo::Coordinate;
use foundation::pollutant::PollutantKey;
use foundation::time::TimeRange;
use heatmap::layer::{HeatLayerSpec, LayerHandle, LayerKind, TileLayerSpec};
use heatmap::projector::project;
use parking_lot::Mutex;
use providers::pollution::PollutionDataProvider;
use tracing::{debug, info, warn};

use crate::surface::MapSurface;
use crate::teardown::TeardownGuard;

/// Fallback viewport center (Vienna) used before any place is selected.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 48.20807,
    lon: 16.37320,
};
pub const DEFAULT_ZOOM: u8 = 17;

/// How one `recenter` cycle resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecenterOutcome {
    /// The fetch result was applied; `layers` heat layers were added.
    Applied { layers: usize },
    /// A newer recenter superseded this one; its result was discarded.
    DroppedStale,
    /// The fetch failed; the overlay set stays empty. Logged, not retried.
    Failed,
    /// The controller was torn down before the result could be applied.
    TornDown,
}

/// Process-local viewport state. Mutated exclusively by the controller.
#[derive(Debug)]
struct ViewportState {
    center: Coordinate,
    zoom: u8,
    time_range: TimeRange,
    base: Option<LayerHandle>,
    heat: Vec<(PollutantKey, LayerHandle)>,
}

/// Owns the map surface's overlay set and orchestrates the recenter cycle:
/// clear previous overlays, fetch samples, project, add one heat layer per
/// pollutant.
///
/// At most one outstanding fetch's result is ever applied: every recenter
/// bumps a monotonically increasing generation counter and captures it;
/// a result is applied only if its captured generation is still current
/// at resolution time (latest-request-wins).
pub struct ViewportController {
    surface: Arc<dyn MapSurface>,
    provider: Arc<dyn PollutionDataProvider>,
    state: Mutex<ViewportState>,
    generation: AtomicU64,
    torn_down: AtomicBool,
    guard: TeardownGuard,
}

impl ViewportController {
    pub fn new(surface: Arc<dyn MapSurface>, provider: Arc<dyn PollutionDataProvider>) -> Self {
        Self {
            surface,
            provider,
            state: Mutex::new(ViewportState {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
                time_range: TimeRange::none(),
                base: None,
                heat: Vec::new(),
            }),
            generation: AtomicU64::new(0),
            torn_down: AtomicBool::new(false),
            guard: TeardownGuard::new(),
        }
    }

    /// Creates the base map surface and triggers the first recenter.
    pub async fn initialize(
        &self,
        initial_center: Coordinate,
        initial_zoom: u8,
    ) -> RecenterOutcome {
        if self.torn_down.load(Ordering::SeqCst) {
            return RecenterOutcome::TornDown;
        }

        let base = self.surface.add_tile_layer(TileLayerSpec::osm());
        {
            let mut state = self.state.lock();
            state.center = initial_center;
            state.zoom = initial_zoom;
            state.base = Some(base);
        }
        info!(
            lat = initial_center.lat,
            lon = initial_center.lon,
            zoom = initial_zoom,
            "viewport initialized"
        );
        self.recenter(initial_center).await
    }

    /// Clears the previous overlays, fetches samples for `new_center` and
    /// the stored time range, and adds one heat layer per pollutant key.
    ///
    /// Within one cycle, layer-clear happens-before the fetch, which
    /// happens-before layer-add. Across overlapping cycles the newest
    /// generation wins; stale results are dropped. Failures are logged
    /// and leave the (already cleared) overlay state untouched.
    pub async fn recenter(&self, new_center: Coordinate) -> RecenterOutcome {
        if self.torn_down.load(Ordering::SeqCst) {
            return RecenterOutcome::TornDown;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let range = {
            let mut state = self.state.lock();
            state.center = new_center;
            state.heat.clear();
            state.time_range
        };

        let removed = self.surface.remove_layers_of_kind(LayerKind::Heat);
        debug!(
            generation,
            removed,
            lat = new_center.lat,
            lon = new_center.lon,
            "recentering viewport"
        );

        let result = self.provider.fetch_map(new_center, range).await;

        if self.torn_down.load(Ordering::SeqCst) {
            return RecenterOutcome::TornDown;
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping stale fetch result");
            return RecenterOutcome::DroppedStale;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "map data fetch failed; overlays stay empty");
                return RecenterOutcome::Failed;
            }
        };

        let mut heat = Vec::with_capacity(response.samples_by_pollutant.len());
        for (key, samples) in &response.samples_by_pollutant {
            let points = project(samples);
            let max_weight = response
                .stats_by_pollutant
                .get(key)
                .map(|s| s.max)
                .unwrap_or_else(|| samples.iter().map(|s| s.value).fold(0.0, f64::max));

            let handle = self
                .surface
                .add_heat_layer(HeatLayerSpec::new(key.clone(), points, max_weight));
            heat.push((key.clone(), handle));
        }

        let layers = heat.len();
        self.state.lock().heat = heat;
        info!(generation, layers, "viewport overlays applied");
        RecenterOutcome::Applied { layers }
    }

    /// Stores the time-range filter for subsequent fetches.
    ///
    /// This deliberately does NOT trigger a fetch: callers apply a new
    /// range by invoking [`ViewportController::recenter`].
    pub fn set_time_range(&self, range: TimeRange) {
        self.state.lock().time_range = range;
    }

    pub fn time_range(&self) -> TimeRange {
        self.state.lock().time_range
    }

    pub fn center(&self) -> Coordinate {
        self.state.lock().center
    }

    pub fn zoom(&self) -> u8 {
        self.state.lock().zoom
    }

    /// Teardown guard for subscriptions and timers owned by collaborators.
    pub fn guard(&self) -> &TeardownGuard {
        &self.guard
    }

    /// Tears the viewport down: releases every layer handle, discards any
    /// in-flight fetch result, and fires the teardown guard exactly once.
    /// No overlay update can occur afterwards.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        // Invalidate in-flight generations before touching the surface.
        self.generation.fetch_add(1, Ordering::SeqCst);

        let (base, heat) = {
            let mut state = self.state.lock();
            (state.base.take(), std::mem::take(&mut state.heat))
        };
        self.surface.remove_layers_of_kind(LayerKind::Heat);
        if let Some(handle) = base {
            self.surface.release(handle);
        }
        let subscriptions = self.guard.release_all();
        info!(
            layers = heat.len(),
            subscriptions, "viewport torn down"
        );
    }
}
