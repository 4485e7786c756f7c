use foundation::sample::PollutantSample;

/// Renderable weighted point in the `(x, y)` convention: `x = lon`, `y = lat`.
///
/// Derived from a [`PollutantSample`], never persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

/// Reorders raw `(lat, lon, value)` samples into the `(x, y, weight)`
/// convention expected by the rendering layer.
///
/// Pure and order-preserving: input index `i` maps to output index `i`.
pub fn project(samples: &[PollutantSample]) -> Vec<HeatPoint> {
    samples
        .iter()
        .map(|s| HeatPoint {
            x: s.lon,
            y: s.lat,
            weight: s.value,
        })
        .collect()
}
