use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use controls::driver::SuggestDriver;
use controls::suggest::DEBOUNCE_INTERVAL;
use controls::time_range::{TimeRangeMode, TimeRangeSelector};
use foundation::geo::Coordinate;
use heatmap::gradient::gradient_color;
use providers::geocode::HttpGeoSuggestClient;
use providers::memory::{MemoryGeoSuggest, MemoryPollutionProvider};
use providers::pollution::{HttpPollutionClient, PollutionDataProvider};
use providers::GeoSuggestProvider;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewport::controller::{ViewportController, DEFAULT_CENTER, DEFAULT_ZOOM};
use viewport::surface::RecordingSurface;

/// Headless viewer: resolves a place, recenters the viewport on it with
/// the configured time-range filter, and logs the resulting overlay set.
///
/// Without `POLLUTION_API_URL`/`GEOCODER_URL` it runs fully offline on
/// the in-memory providers.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let place = env::var("PLACE_QUERY").unwrap_or_else(|_| "Vienna".to_string());
    let zoom = env_var_u8("VIEWPORT_ZOOM", DEFAULT_ZOOM);

    let pollution: Arc<dyn PollutionDataProvider> = match env::var("POLLUTION_API_URL") {
        Ok(url) => match HttpPollutionClient::with_default_client(url) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                warn!(error = %err, "pollution client setup failed; using in-memory data");
                Arc::new(MemoryPollutionProvider::with_demo_data(DEFAULT_CENTER))
            }
        },
        Err(_) => Arc::new(MemoryPollutionProvider::with_demo_data(DEFAULT_CENTER)),
    };

    let geocoder: Arc<dyn GeoSuggestProvider> = match env::var("GEOCODER_URL") {
        Ok(url) => match HttpGeoSuggestClient::with_default_client(url) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                warn!(error = %err, "geocoder setup failed; using in-memory places");
                Arc::new(demo_places())
            }
        },
        Err(_) => Arc::new(demo_places()),
    };

    let surface = Arc::new(RecordingSurface::new());
    let controller = Arc::new(ViewportController::new(surface.clone(), pollution));

    // Observation window: both dates optional, whole days inclusive.
    let mut selector = TimeRangeSelector::new();
    selector.set_mode(TimeRangeMode::DateRange);
    selector.set_start_date(env_var_date("START_DATE"));
    selector.set_end_date(env_var_date("END_DATE"));
    controller.set_time_range(selector.range());

    // Type the place query through the suggest box and pick the top hit.
    let driver = SuggestDriver::new(geocoder);
    {
        let driver = driver.clone();
        controller.guard().defer(move || driver.abort());
    }
    driver.input(&place);
    tokio::time::sleep(DEBOUNCE_INTERVAL + Duration::from_millis(200)).await;

    let center = match driver.select(0) {
        Some(coordinate) => {
            info!(lat = coordinate.lat, lon = coordinate.lon, %place, "place resolved");
            coordinate
        }
        None => {
            warn!(%place, "no suggestion for place; falling back to default center");
            DEFAULT_CENTER
        }
    };

    let outcome = controller.initialize(center, zoom).await;
    info!(?outcome, "initial recenter finished");

    for layer in surface.heat_layers() {
        info!(
            pollutant = layer.pollutant.as_str(),
            points = layer.points.len(),
            max_weight = layer.max_weight,
            peak_color = gradient_color(layer.max_weight, layer.max_weight),
            "heat layer"
        );
    }

    controller.teardown();
}

fn demo_places() -> MemoryGeoSuggest {
    MemoryGeoSuggest::new(vec![
        providers::geocode::SuggestionCandidate {
            display_name: "Vienna, Austria".to_string(),
            coordinate: DEFAULT_CENTER,
        },
        providers::geocode::SuggestionCandidate {
            display_name: "Madrid, Spain".to_string(),
            coordinate: Coordinate::new(40.4168, -3.7038),
        },
        providers::geocode::SuggestionCandidate {
            display_name: "New York, United States".to_string(),
            coordinate: Coordinate::new(40.7128, -74.0060),
        },
    ])
}

fn env_var_u8(key: &str, default: u8) -> u8 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_date(key: &str) -> Option<NaiveDate> {
    let raw = env::var(key).ok()?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(%key, %raw, %err, "ignoring unparseable date");
            None
        }
    }
}
