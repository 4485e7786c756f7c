use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use foundation::geo::{Coordinate, GeoBounds};
use foundation::pollutant::PollutantKey;
use foundation::sample::{PollutantSample, PollutantStats};
use foundation::time::TimeRange;

use crate::error::ProviderError;
use crate::geocode::{GeoSuggestProvider, SuggestionCandidate};
use crate::pollution::{MapResponse, PollutionDataProvider};
use crate::BoxFuture;

/// Units reported by the TEMPO-style products served in memory.
pub const DEFAULT_UNITS: &str = "molecules/cm^2";

/// In-memory pollutant-data provider for tests and offline runs.
///
/// Serves a fixed sample set, filtered to the bounding box around the
/// requested center, with summary statistics computed from the samples
/// that survive the filter. Tracks how many fetches were issued so
/// tests can assert call counts.
pub struct MemoryPollutionProvider {
    samples: BTreeMap<PollutantKey, Vec<PollutantSample>>,
    radius_km: f64,
    calls: AtomicUsize,
}

impl MemoryPollutionProvider {
    pub fn new(samples: BTreeMap<PollutantKey, Vec<PollutantSample>>) -> Self {
        Self {
            samples,
            radius_km: 50.0,
            calls: AtomicUsize::new(0),
        }
    }

    /// A small fixed dataset with the default TEMPO product set.
    pub fn with_demo_data(center: Coordinate) -> Self {
        let mut samples = BTreeMap::new();
        for (key, scale) in [("no2", 1.0), ("hcho", 0.5), ("o3", 2.0)] {
            let rows = vec![
                PollutantSample::new(center.lat, center.lon, 1.0 * scale),
                PollutantSample::new(center.lat + 0.1, center.lon - 0.1, 2.0 * scale),
                PollutantSample::new(center.lat - 0.1, center.lon + 0.1, 3.0 * scale),
            ];
            samples.insert(PollutantKey::new(key), rows);
        }
        Self::new(samples)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PollutionDataProvider for MemoryPollutionProvider {
    fn fetch_map(
        &self,
        center: Coordinate,
        range: TimeRange,
    ) -> BoxFuture<'_, Result<MapResponse, ProviderError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if !center.is_valid() {
                return Err(ProviderError::MalformedCoordinate {
                    raw: format!("{},{}", center.lat, center.lon),
                });
            }

            let bounds = GeoBounds::around(center, self.radius_km);
            let mut samples_by_pollutant = BTreeMap::new();
            let mut stats_by_pollutant = BTreeMap::new();
            for (key, rows) in &self.samples {
                let rows: Vec<PollutantSample> = rows
                    .iter()
                    .copied()
                    .filter(|s| bounds.contains(Coordinate::new(s.lat, s.lon)))
                    .collect();
                if let Some(stats) = PollutantStats::from_samples(&rows, DEFAULT_UNITS) {
                    stats_by_pollutant.insert(key.clone(), stats);
                    samples_by_pollutant.insert(key.clone(), rows);
                }
            }

            Ok(MapResponse {
                center,
                radius_km: self.radius_km,
                time_range: range,
                samples_by_pollutant,
                stats_by_pollutant,
            })
        })
    }
}

/// In-memory place-search provider: case-insensitive substring match over
/// a fixed candidate list, preserving list order.
pub struct MemoryGeoSuggest {
    entries: Vec<SuggestionCandidate>,
    calls: AtomicUsize,
}

impl MemoryGeoSuggest {
    pub fn new(entries: Vec<SuggestionCandidate>) -> Self {
        Self {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoSuggestProvider for MemoryGeoSuggest {
    fn suggest(
        &self,
        query: &str,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<SuggestionCandidate>, ProviderError>> {
        let needle = query.trim().to_lowercase();
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let hits = self
                .entries
                .iter()
                .filter(|c| c.display_name.to_lowercase().contains(&needle))
                .take(limit)
                .cloned()
                .collect();
            Ok(hits)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryGeoSuggest, MemoryPollutionProvider};
    use crate::geocode::{GeoSuggestProvider, SuggestionCandidate};
    use crate::pollution::PollutionDataProvider;
    use foundation::geo::Coordinate;
    use foundation::time::TimeRange;

    fn madrid() -> Coordinate {
        Coordinate::new(40.4168, -3.7038)
    }

    #[tokio::test]
    async fn demo_data_has_three_products_with_stats() {
        let provider = MemoryPollutionProvider::with_demo_data(madrid());
        let res = provider
            .fetch_map(madrid(), TimeRange::none())
            .await
            .unwrap();

        let keys: Vec<_> = res
            .samples_by_pollutant
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["hcho", "no2", "o3"]);

        for (key, stats) in &res.stats_by_pollutant {
            let samples = &res.samples_by_pollutant[key];
            assert_eq!(stats.sample_count as usize, samples.len());
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn samples_outside_the_query_radius_are_filtered_out() {
        let provider = MemoryPollutionProvider::with_demo_data(madrid());
        // Vienna is well outside the 50 km box around the Madrid samples.
        let res = provider
            .fetch_map(Coordinate::new(48.20807, 16.3732), TimeRange::none())
            .await
            .unwrap();
        assert!(res.samples_by_pollutant.is_empty());
        assert!(res.stats_by_pollutant.is_empty());
    }

    #[tokio::test]
    async fn invalid_center_is_rejected() {
        let provider = MemoryPollutionProvider::with_demo_data(madrid());
        let res = provider
            .fetch_map(Coordinate::new(120.0, 0.0), TimeRange::none())
            .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn suggest_matches_substring_in_order() {
        let provider = MemoryGeoSuggest::new(vec![
            SuggestionCandidate {
                display_name: "Madrid, Spain".to_string(),
                coordinate: madrid(),
            },
            SuggestionCandidate {
                display_name: "Madridejos, Spain".to_string(),
                coordinate: Coordinate::new(39.4689, -3.5312),
            },
            SuggestionCandidate {
                display_name: "Vienna, Austria".to_string(),
                coordinate: Coordinate::new(48.20807, 16.3732),
            },
        ]);

        let hits = provider.suggest("madrid", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].display_name, "Madrid, Spain");
        assert_eq!(provider.calls(), 1);
    }
}
