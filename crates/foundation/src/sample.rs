use serde::{Deserialize, Serialize};

/// Raw spatial pollutant sample as returned by a data provider.
///
/// The data convention is `(lat, lon, value)` with `value >= 0`.
/// Samples are immutable once returned; rendering works on projected
/// copies, never on the originals.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantSample {
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
}

impl PollutantSample {
    pub fn new(lat: f64, lon: f64, value: f64) -> Self {
        Self { lat, lon, value }
    }
}

/// Summary statistics for one pollutant in a map response.
///
/// Invariant: `min <= mean <= max` and `sample_count >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sample_count: u64,
    pub units: String,
}

impl PollutantStats {
    /// Computes stats from raw samples. Empty input yields `None`.
    pub fn from_samples(samples: &[PollutantSample], units: impl Into<String>) -> Option<Self> {
        let first = samples.first()?.value;
        let mut min = first;
        let mut max = first;
        let mut sum = 0.0;
        for s in samples {
            min = min.min(s.value);
            max = max.max(s.value);
            sum += s.value;
        }
        Some(Self {
            mean: sum / samples.len() as f64,
            min,
            max,
            sample_count: samples.len() as u64,
            units: units.into(),
        })
    }
}
