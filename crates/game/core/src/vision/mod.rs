//! Fog of war: per-unit vision cones over a shared light overlay.
//!
//! Every living unit owns a cone recomputed on each pass. Only player cones
//! feed the shared `visible` flags; enemy cones answer [`VisionSystem::can_see_unit`]
//! for AI targeting. Hidden units standing in light are revealed by the pass.
mod cone;
mod illumination;

pub use cone::{compute_cone, in_forward_arc};
pub use illumination::{IlluminationSource, LightId, LightMap};

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::{CellFlags, Grid};
use crate::state::{Faction, Position, Roster, StatusEffectKind, UnitId, UnitState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisionPhase {
    /// No board attached yet.
    Uninitialized,
    /// Board attached but it has no cells yet.
    Initializing,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisionStatus {
    Updated,
    /// The system is not ready; nothing was computed.
    NotReady,
    /// A pass was already running; this request was dropped.
    Dropped,
}

/// Result of one [`VisionSystem::update_vision`] request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisionReport {
    pub status: VisionStatus,
    pub visible_cells: usize,
    /// Hidden units revealed by light during the pass.
    pub revealed: Vec<UnitId>,
}

impl VisionReport {
    fn skipped(status: VisionStatus) -> Self {
        Self {
            status,
            visible_cells: 0,
            revealed: Vec::new(),
        }
    }

    pub fn is_updated(&self) -> bool {
        self.status == VisionStatus::Updated
    }

    /// True if the pass changed any unit's stealth state.
    pub fn stealth_changed(&self) -> bool {
        !self.revealed.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct VisionSystem {
    phase: VisionPhase,
    width: usize,
    visible: Vec<bool>,
    lights: LightMap,
    cones: BTreeMap<UnitId, BTreeSet<Position>>,
    updating: bool,
}

impl Default for VisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionSystem {
    pub fn new() -> Self {
        Self {
            phase: VisionPhase::Uninitialized,
            width: 0,
            visible: Vec::new(),
            lights: LightMap::default(),
            cones: BTreeMap::new(),
            updating: false,
        }
    }

    /// Attaches the board. The system becomes ready once the board has cells.
    pub fn initialize(&mut self, grid: &Grid) -> VisionPhase {
        self.phase = VisionPhase::Initializing;
        let dimensions = grid.dimensions();
        self.width = dimensions.width as usize;
        self.visible = vec![false; grid.cell_count()];
        self.lights.resize(dimensions);
        self.cones.clear();
        if grid.cell_count() > 0 {
            self.phase = VisionPhase::Ready;
        }
        self.phase
    }

    pub fn phase(&self) -> VisionPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == VisionPhase::Ready
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn lights(&self) -> &LightMap {
        &self.lights
    }

    /// Callers must run [`update_vision`](Self::update_vision) after editing lights.
    pub fn lights_mut(&mut self) -> &mut LightMap {
        &mut self.lights
    }

    /// Recomputes fog of war from scratch.
    ///
    /// Stealth removals made by the pass do not trigger further passes; they
    /// are reported once in [`VisionReport::revealed`].
    pub fn update_vision(&mut self, grid: &mut Grid, roster: &mut Roster) -> VisionReport {
        if !self.is_ready() {
            return VisionReport::skipped(VisionStatus::NotReady);
        }
        if self.updating {
            return VisionReport::skipped(VisionStatus::Dropped);
        }
        self.updating = true;

        self.visible.iter_mut().for_each(|v| *v = false);
        self.cones.clear();

        for unit in roster.iter_living() {
            let Some(position) = unit.position else {
                continue;
            };
            if unit.faction == Faction::Player {
                self.mark_visible(position);
            }
        }

        for unit in roster.iter_living() {
            let Some(position) = unit.position else {
                continue;
            };
            let cone = compute_cone(grid, &self.lights, position, unit.facing, unit.vision_range);
            if unit.faction == Faction::Player {
                for cell in &cone {
                    self.mark_visible(*cell);
                }
            }
            self.cones.insert(unit.id, cone);
        }

        let dimensions = grid.dimensions();
        for y in 0..dimensions.height as i32 {
            for x in 0..dimensions.width as i32 {
                let cell = Position::new(x, y);
                grid.set_flag(cell, CellFlags::VISIBLE, self.is_tile_visible(cell));
                grid.set_flag(cell, CellFlags::ILLUMINATED, self.is_tile_illuminated(cell));
            }
        }

        let mut revealed = Vec::new();
        for unit in roster.iter_mut() {
            if !unit.is_alive() || !unit.is_hidden() {
                continue;
            }
            if unit.position.is_some_and(|p| self.lights.is_lit(p)) {
                unit.statuses.remove(StatusEffectKind::Hidden);
                revealed.push(unit.id);
            }
        }

        self.updating = false;
        VisionReport {
            status: VisionStatus::Updated,
            visible_cells: self.visible.iter().filter(|v| **v).count(),
            revealed,
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 || self.width == 0 {
            return None;
        }
        let (x, y) = (position.x as usize, position.y as usize);
        if x >= self.width {
            return None;
        }
        let index = y * self.width + x;
        (index < self.visible.len()).then_some(index)
    }

    fn mark_visible(&mut self, position: Position) {
        if let Some(index) = self.index(position) {
            self.visible[index] = true;
        }
    }

    /// Fog state of a cell from the last pass. Out of bounds is never visible.
    pub fn is_tile_visible(&self, position: Position) -> bool {
        self.index(position).is_some_and(|index| self.visible[index])
    }

    pub fn is_tile_illuminated(&self, position: Position) -> bool {
        self.lights.is_lit(position)
    }

    /// Cells `unit` saw in the last pass.
    pub fn cone(&self, unit: UnitId) -> Option<&BTreeSet<Position>> {
        self.cones.get(&unit)
    }

    /// Whether `observer`'s last cone contains a detectable `target`.
    ///
    /// Dead targets and hidden targets on unlit cells are never seen.
    pub fn can_see_unit(&self, observer: UnitId, target: &UnitState) -> bool {
        if !target.is_alive() {
            return false;
        }
        let Some(position) = target.position else {
            return false;
        };
        if target.is_hidden() && !self.is_tile_illuminated(position) {
            return false;
        }
        self.cones
            .get(&observer)
            .is_some_and(|cone| cone.contains(&position))
    }
}
