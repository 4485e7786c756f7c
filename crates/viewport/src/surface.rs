use heatmap::layer::{HeatLayerSpec, LayerHandle, LayerKind, TileLayerSpec};
use parking_lot::Mutex;

/// The single map surface and its overlay-layer set.
///
/// Mutated exclusively by [`crate::ViewportController`]; no other
/// component may add or remove layers directly. Implementations must be
/// `Send + Sync` and internally synchronized, so all methods take `&self`.
pub trait MapSurface: Send + Sync {
    fn add_tile_layer(&self, spec: TileLayerSpec) -> LayerHandle;

    fn add_heat_layer(&self, spec: HeatLayerSpec) -> LayerHandle;

    /// Removes every layer tagged with `kind`, leaving layers of other
    /// kinds untouched. Returns the number of layers removed.
    fn remove_layers_of_kind(&self, kind: LayerKind) -> usize;

    /// Releases one layer by handle. Returns `true` if it was present.
    fn release(&self, handle: LayerHandle) -> bool;
}

/// One layer as held by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceLayer {
    Tile {
        handle: LayerHandle,
        spec: TileLayerSpec,
    },
    Heat {
        handle: LayerHandle,
        spec: HeatLayerSpec,
    },
}

impl SurfaceLayer {
    pub fn handle(&self) -> LayerHandle {
        match self {
            SurfaceLayer::Tile { handle, .. } => *handle,
            SurfaceLayer::Heat { handle, .. } => *handle,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            SurfaceLayer::Tile { .. } => LayerKind::BaseTile,
            SurfaceLayer::Heat { .. } => LayerKind::Heat,
        }
    }
}

#[derive(Debug, Default)]
struct RecordingInner {
    next_id: u64,
    layers: Vec<SurfaceLayer>,
}

/// In-memory map surface that records every layer operation.
///
/// Used by tests and by headless runs; real renderers implement
/// [`MapSurface`] against their own layer machinery.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    inner: Mutex<RecordingInner>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> Vec<SurfaceLayer> {
        self.inner.lock().layers.clone()
    }

    pub fn count_of_kind(&self, kind: LayerKind) -> usize {
        self.inner
            .lock()
            .layers
            .iter()
            .filter(|l| l.kind() == kind)
            .count()
    }

    pub fn heat_layers(&self) -> Vec<HeatLayerSpec> {
        self.inner
            .lock()
            .layers
            .iter()
            .filter_map(|l| match l {
                SurfaceLayer::Heat { spec, .. } => Some(spec.clone()),
                SurfaceLayer::Tile { .. } => None,
            })
            .collect()
    }

    fn allocate(inner: &mut RecordingInner) -> LayerHandle {
        let handle = LayerHandle(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        handle
    }
}

impl MapSurface for RecordingSurface {
    fn add_tile_layer(&self, spec: TileLayerSpec) -> LayerHandle {
        let mut inner = self.inner.lock();
        let handle = Self::allocate(&mut inner);
        inner.layers.push(SurfaceLayer::Tile { handle, spec });
        handle
    }

    fn add_heat_layer(&self, spec: HeatLayerSpec) -> LayerHandle {
        let mut inner = self.inner.lock();
        let handle = Self::allocate(&mut inner);
        inner.layers.push(SurfaceLayer::Heat { handle, spec });
        handle
    }

    fn remove_layers_of_kind(&self, kind: LayerKind) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.layers.len();
        inner.layers.retain(|l| l.kind() != kind);
        before - inner.layers.len()
    }

    fn release(&self, handle: LayerHandle) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.layers.len();
        inner.layers.retain(|l| l.handle() != handle);
        before != inner.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{MapSurface, RecordingSurface};
    use foundation::pollutant::PollutantKey;
    use heatmap::layer::{HeatLayerSpec, LayerKind, TileLayerSpec};

    #[test]
    fn removal_by_kind_preserves_other_kinds() {
        let surface = RecordingSurface::new();
        let base = surface.add_tile_layer(TileLayerSpec::osm());
        surface.add_heat_layer(HeatLayerSpec::new(PollutantKey::new("no2"), vec![], 1.0));
        surface.add_heat_layer(HeatLayerSpec::new(PollutantKey::new("o3"), vec![], 1.0));

        let removed = surface.remove_layers_of_kind(LayerKind::Heat);
        assert_eq!(removed, 2);
        assert_eq!(surface.count_of_kind(LayerKind::BaseTile), 1);
        assert_eq!(surface.layers()[0].handle(), base);
    }

    #[test]
    fn release_removes_exactly_one_layer() {
        let surface = RecordingSurface::new();
        let base = surface.add_tile_layer(TileLayerSpec::osm());
        assert!(surface.release(base));
        assert!(!surface.release(base));
        assert!(surface.layers().is_empty());
    }
}
