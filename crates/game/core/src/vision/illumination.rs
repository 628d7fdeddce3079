//! Light sources and the per-cell light overlay.
//!
//! Each cell keeps a count of the active sources covering it, so moving or
//! removing one source never darkens cells another source still lights.

use std::collections::BTreeMap;

use crate::grid::GridDimensions;
use crate::state::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(pub u32);

/// Lights every cell within `range` Manhattan steps of its center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IlluminationSource {
    pub center: Option<Position>,
    pub range: u32,
    pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LightMap {
    dimensions: Option<GridDimensions>,
    counts: Vec<u16>,
    sources: BTreeMap<LightId, IlluminationSource>,
    next_id: u32,
}

impl LightMap {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions: Some(dimensions),
            counts: vec![0; dimensions.cell_count()],
            ..Self::default()
        }
    }

    /// Rebuilds the overlay for a board of `dimensions`, keeping all sources.
    pub fn resize(&mut self, dimensions: GridDimensions) {
        self.dimensions = Some(dimensions);
        self.counts = vec![0; dimensions.cell_count()];
        let active: Vec<_> = self.sources.values().copied().filter(|s| s.active).collect();
        for source in active {
            self.paint(source, true);
        }
    }

    pub fn add(&mut self, center: Option<Position>, range: u32) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;
        let source = IlluminationSource {
            center,
            range,
            active: true,
        };
        self.sources.insert(id, source);
        self.paint(source, true);
        id
    }

    pub fn source(&self, id: LightId) -> Option<&IlluminationSource> {
        self.sources.get(&id)
    }

    pub fn sources(&self) -> impl Iterator<Item = (LightId, &IlluminationSource)> {
        self.sources.iter().map(|(id, source)| (*id, source))
    }

    /// Replaces a source, retracting its old neighborhood before lighting the
    /// new one. Returns true if anything about the source changed.
    fn update(&mut self, id: LightId, edit: impl FnOnce(&mut IlluminationSource)) -> bool {
        let Some(old) = self.sources.get(&id).copied() else {
            return false;
        };
        let mut new = old;
        edit(&mut new);
        if new == old {
            return false;
        }
        if old.active {
            self.paint(old, false);
        }
        if new.active {
            self.paint(new, true);
        }
        self.sources.insert(id, new);
        true
    }

    pub fn move_to(&mut self, id: LightId, center: Option<Position>) -> bool {
        self.update(id, |source| source.center = center)
    }

    pub fn set_range(&mut self, id: LightId, range: u32) -> bool {
        self.update(id, |source| source.range = range)
    }

    pub fn set_active(&mut self, id: LightId, active: bool) -> bool {
        self.update(id, |source| source.active = active)
    }

    pub fn remove(&mut self, id: LightId) -> bool {
        match self.sources.remove(&id) {
            Some(source) => {
                if source.active {
                    self.paint(source, false);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_lit(&self, position: Position) -> bool {
        self.index(position)
            .and_then(|index| self.counts.get(index))
            .is_some_and(|count| *count > 0)
    }

    fn index(&self, position: Position) -> Option<usize> {
        let dimensions = self.dimensions?;
        dimensions
            .contains(position)
            .then(|| position.y as usize * dimensions.width as usize + position.x as usize)
    }

    fn paint(&mut self, source: IlluminationSource, lit: bool) {
        let Some(center) = source.center else {
            return;
        };
        let range = source.range as i32;
        for dy in -range..=range {
            let span = range - dy.abs();
            for dx in -span..=span {
                let Some(index) = self.index(center.offset(dx, dy)) else {
                    continue;
                };
                if let Some(count) = self.counts.get_mut(index) {
                    *count = if lit {
                        count.saturating_add(1)
                    } else {
                        count.saturating_sub(1)
                    };
                }
            }
        }
    }
}
