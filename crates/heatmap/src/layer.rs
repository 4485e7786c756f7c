use foundation::pollutant::PollutantKey;

use crate::projector::HeatPoint;

/// Opaque handle to a layer added to a map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

/// Tag distinguishing overlay layers from the base background layer.
///
/// Overlays are cleared by kind, never by enumerating the full layer set,
/// so layers of other kinds are left undisturbed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    BaseTile,
    Heat,
}

/// Base background tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub max_zoom: u8,
}

impl TileLayerSpec {
    pub fn new(url_template: impl Into<String>, max_zoom: u8) -> Self {
        Self {
            url_template: url_template.into(),
            max_zoom,
        }
    }

    /// Standard OpenStreetMap raster tiles.
    pub fn osm() -> Self {
        Self::new("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", 18)
    }
}

/// Rendering options shared by every heat layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatStyle {
    pub min_opacity: f64,
    pub max_zoom: u8,
}

impl Default for HeatStyle {
    fn default() -> Self {
        Self {
            min_opacity: 0.4,
            max_zoom: 15,
        }
    }
}

/// One heat overlay: projected points plus the normalization ceiling.
///
/// `max_weight` is the pollutant's `max` statistic; the renderer divides
/// each weight by it before looking up the fixed gradient scale.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayerSpec {
    pub pollutant: PollutantKey,
    pub points: Vec<HeatPoint>,
    pub max_weight: f64,
    pub style: HeatStyle,
}

impl HeatLayerSpec {
    pub fn new(pollutant: PollutantKey, points: Vec<HeatPoint>, max_weight: f64) -> Self {
        Self {
            pollutant,
            points,
            max_weight,
            style: HeatStyle::default(),
        }
    }
}
