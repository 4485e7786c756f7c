use std::collections::BTreeMap;

use foundation::geo::Coordinate;
use foundation::pollutant::PollutantKey;
use foundation::sample::{PollutantSample, PollutantStats};
use foundation::time::TimeRange;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::{BoxFuture, REQUEST_TIMEOUT};

/// One complete fetch result for a viewport center.
///
/// Owned exclusively by the fetch that produced it; a newer fetch
/// supersedes it, nothing mutates it in place. `BTreeMap` keeps
/// per-pollutant iteration order stable.
#[derive(Debug, Clone, PartialEq)]
pub struct MapResponse {
    pub center: Coordinate,
    pub radius_km: f64,
    pub time_range: TimeRange,
    pub samples_by_pollutant: BTreeMap<PollutantKey, Vec<PollutantSample>>,
    pub stats_by_pollutant: BTreeMap<PollutantKey, PollutantStats>,
}

/// Trait for pollutant-data providers.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait PollutionDataProvider: Send + Sync {
    /// Fetch samples and summary statistics around `center`, filtered by
    /// `range` (either bound may be absent).
    fn fetch_map(
        &self,
        center: Coordinate,
        range: TimeRange,
    ) -> BoxFuture<'_, Result<MapResponse, ProviderError>>;
}

#[derive(Debug, Deserialize)]
struct ProductStatsDto {
    mean_value: f64,
    min_value: f64,
    max_value: f64,
    data_points: u64,
    units: String,
}

/// Wire shape of the pollutant-data endpoint:
/// `{ latitude, longitude, radius_km, start_date, end_date,
///    map_data: { key: [[lat, lon, value], ...] },
///    products: { key: { mean_value, min_value, max_value, data_points, units } } }`
#[derive(Debug, Deserialize)]
struct MapResponseDto {
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    #[serde(default)]
    map_data: BTreeMap<String, Vec<[f64; 3]>>,
    #[serde(default)]
    products: BTreeMap<String, ProductStatsDto>,
}

/// Decodes a raw map payload into the domain response.
///
/// Exposed at crate level so payload handling stays testable without a
/// live endpoint.
pub(crate) fn decode_map_payload(
    bytes: &[u8],
    range: TimeRange,
) -> Result<MapResponse, ProviderError> {
    if bytes.is_empty() {
        return Err(ProviderError::EmptyResponseBody);
    }

    let dto: MapResponseDto = serde_json::from_slice(bytes)
        .map_err(|e| ProviderError::network_with_source("undecodable map payload", e))?;

    let mut samples_by_pollutant = BTreeMap::new();
    for (key, rows) in dto.map_data {
        let samples = rows
            .into_iter()
            .map(|[lat, lon, value]| PollutantSample::new(lat, lon, value))
            .collect();
        samples_by_pollutant.insert(PollutantKey::new(key), samples);
    }

    let mut stats_by_pollutant = BTreeMap::new();
    for (key, stats) in dto.products {
        stats_by_pollutant.insert(
            PollutantKey::new(key),
            PollutantStats {
                mean: stats.mean_value,
                min: stats.min_value,
                max: stats.max_value,
                sample_count: stats.data_points,
                units: stats.units,
            },
        );
    }

    Ok(MapResponse {
        center: Coordinate::new(dto.latitude, dto.longitude),
        radius_km: dto.radius_km,
        time_range: range,
        samples_by_pollutant,
        stats_by_pollutant,
    })
}

/// HTTP pollutant-data client (`GET {base}/api/map/current`).
pub struct HttpPollutionClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPollutionClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Builds a client with the standard bounded request timeout.
    pub fn with_default_client(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::network_with_source("client construction failed", e))?;
        Ok(Self::new(base_url, client))
    }

    fn query_params(center: Coordinate, range: TimeRange) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", center.lat.to_string()),
            ("lon", center.lon.to_string()),
        ];
        if let Some(start) = range.start {
            params.push(("start_date", start.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()));
        }
        if let Some(end) = range.end {
            params.push(("end_date", end.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()));
        }
        params
    }
}

impl PollutionDataProvider for HttpPollutionClient {
    fn fetch_map(
        &self,
        center: Coordinate,
        range: TimeRange,
    ) -> BoxFuture<'_, Result<MapResponse, ProviderError>> {
        let url = format!("{}/api/map/current", self.base_url.trim_end_matches('/'));
        Box::pin(async move {
            if !center.is_valid() {
                return Err(ProviderError::MalformedCoordinate {
                    raw: format!("{},{}", center.lat, center.lon),
                });
            }

            debug!(lat = center.lat, lon = center.lon, "fetching map data");
            let resp = self
                .client
                .get(&url)
                .query(&Self::query_params(center, range))
                .send()
                .await
                .map_err(ProviderError::from_transport)?;

            if !resp.status().is_success() {
                return Err(ProviderError::network(format!(
                    "map data request failed: {}",
                    resp.status()
                )));
            }

            let bytes = resp.bytes().await.map_err(ProviderError::from_transport)?;
            decode_map_payload(&bytes, range)
        })
    }
}
