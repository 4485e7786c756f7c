use foundation::geo::Coordinate;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::{BoxFuture, REQUEST_TIMEOUT};

/// One ranked place candidate for a text fragment.
///
/// Ephemeral: lives only for the duration of one suggestion list render.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCandidate {
    pub display_name: String,
    pub coordinate: Coordinate,
}

/// Trait for place-search providers.
///
/// Candidates come back in provider rank order; callers must not
/// re-rank them locally.
pub trait GeoSuggestProvider: Send + Sync {
    fn suggest(
        &self,
        query: &str,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<SuggestionCandidate>, ProviderError>>;
}

/// Wire shape of a place-search row. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct PlaceDto {
    display_name: String,
    lat: String,
    lon: String,
}

fn candidate_from_place(place: PlaceDto) -> Result<SuggestionCandidate, ProviderError> {
    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| ProviderError::MalformedCoordinate {
            raw: place.lat.clone(),
        })?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| ProviderError::MalformedCoordinate {
            raw: place.lon.clone(),
        })?;

    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        return Err(ProviderError::MalformedCoordinate {
            raw: format!("{},{}", place.lat, place.lon),
        });
    }

    Ok(SuggestionCandidate {
        display_name: place.display_name,
        coordinate,
    })
}

/// Decodes a place-search payload, preserving provider rank order.
pub(crate) fn decode_place_payload(
    bytes: &[u8],
    limit: usize,
) -> Result<Vec<SuggestionCandidate>, ProviderError> {
    if bytes.is_empty() {
        return Err(ProviderError::EmptyResponseBody);
    }

    let places: Vec<PlaceDto> = serde_json::from_slice(bytes)
        .map_err(|e| ProviderError::network_with_source("undecodable place payload", e))?;

    places
        .into_iter()
        .take(limit)
        .map(candidate_from_place)
        .collect()
}

/// HTTP place-search client against a Nominatim-style endpoint
/// (`GET {base}/search?q=...&format=json&limit=N`).
pub struct HttpGeoSuggestClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGeoSuggestClient {
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
}

impl GeoSuggestProvider for HttpGeoSuggestClient {
    fn suggest(
        &self,
        query: &str,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<SuggestionCandidate>, ProviderError>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let query = query.to_string();
        Box::pin(async move {
            debug!(query = %query, limit, "querying place search");
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("q", query.as_str()),
                    ("format", "json"),
                    ("limit", &limit.to_string()),
                ])
                .send()
                .await
                .map_err(ProviderError::from_transport)?;

            if !resp.status().is_success() {
                return Err(ProviderError::network(format!(
                    "place search failed: {}",
                    resp.status()
                )));
            }

            let bytes = resp.bytes().await.map_err(ProviderError::from_transport)?;
            decode_place_payload(&bytes, limit)
        })
    }
}
