//! Budgeted reachability search for moving and attacking in one turn.
//!
//! Cells are settled cheapest-first from a binary heap. Every settled cell is
//! first tried as a launch cell for the selected action, then expanded into
//! its walkable, empty neighbors. Attack targets never feed the movement
//! frontier, and move destinations and attack targets are reported as two
//! separate sets. A ground attack's target tiles are never move destinations
//! for that action.
mod sight;

pub use sight::{Omniscient, TargetSight};

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::action::ActionDescriptor;
use crate::grid::{CellId, Grid, SearchArena};
use crate::los::has_line_of_sight;
use crate::state::{Position, Roster, UnitId, UnitState};

/// An empty cell the unit can walk to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveDestination {
    pub cell: Position,
    pub cost: u32,
    /// Cells entered on the way, ending with `cell`. The origin is excluded.
    pub path: Vec<Position>,
}

/// A cell the unit can hit after walking to `launch`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackTarget {
    pub cell: Position,
    pub launch: Position,
    /// Cells entered to reach the launch cell; empty when attacking in place.
    pub launch_path: Vec<Position>,
    pub movement_cost: u32,
    /// Movement plus the action's flat cost.
    pub cost: u32,
    pub occupant: Option<UnitId>,
}

/// Legal move destinations and attack targets for one unit and action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reachability {
    pub unit: Option<UnitId>,
    pub origin: Option<Position>,
    pub budget: u32,
    /// In settle order, cheapest first.
    pub moves: Vec<MoveDestination>,
    pub attacks: Vec<AttackTarget>,
}

impl Reachability {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty()
    }

    pub fn move_to(&self, cell: Position) -> Option<&MoveDestination> {
        self.moves.iter().find(|m| m.cell == cell)
    }

    pub fn attack_at(&self, cell: Position) -> Option<&AttackTarget> {
        self.attacks.iter().find(|a| a.cell == cell)
    }

    pub fn move_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.moves.iter().map(|m| m.cell)
    }

    pub fn attack_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.attacks.iter().map(|a| a.cell)
    }
}

/// Inputs of one search.
#[derive(Clone, Copy, Debug)]
pub struct SearchQuery<'a> {
    pub searcher: &'a UnitState,
    pub origin: Option<Position>,
    /// Negative budgets yield empty results.
    pub budget: i64,
    pub action: Option<&'a ActionDescriptor>,
}

impl<'a> SearchQuery<'a> {
    /// Query from the unit's current cell with its remaining action points.
    pub fn for_unit(searcher: &'a UnitState, action: Option<&'a ActionDescriptor>) -> Self {
        Self {
            searcher,
            origin: searcher.position,
            budget: i64::from(searcher.action_points.current),
            action,
        }
    }
}

/// Runs a search. The arena is reset first, so it may hold any prior state.
///
/// Invalid inputs (no origin, no action, origin off the board, negative
/// budget) produce an empty result.
pub fn compute_reachable(
    grid: &Grid,
    arena: &mut SearchArena,
    roster: &Roster,
    sight: &dyn TargetSight,
    query: SearchQuery<'_>,
) -> Reachability {
    arena.reset(grid);

    let (Some(origin), Some(action)) = (query.origin, query.action) else {
        return Reachability::empty();
    };
    let Some(origin_id) = grid.cell_id(origin) else {
        return Reachability::empty();
    };
    if query.budget < 0 {
        return Reachability::empty();
    }
    let budget = u32::try_from(query.budget).unwrap_or(u32::MAX);

    let mut search = Search {
        grid,
        arena,
        roster,
        sight,
        searcher: query.searcher,
        action,
        budget,
        origin_id,
        los_cache: HashMap::new(),
        settled: Vec::new(),
        targets: Vec::new(),
    };
    search.run();
    search.finish(origin)
}

struct Search<'a> {
    grid: &'a Grid,
    arena: &'a mut SearchArena,
    roster: &'a Roster,
    sight: &'a dyn TargetSight,
    searcher: &'a UnitState,
    action: &'a ActionDescriptor,
    budget: u32,
    origin_id: CellId,
    los_cache: HashMap<(CellId, CellId), bool>,
    settled: Vec<CellId>,
    targets: Vec<(CellId, CellId, Option<UnitId>)>,
}

impl Search<'_> {
    fn run(&mut self) {
        if let Some(state) = self.arena.get_mut(self.origin_id) {
            state.visited = true;
            state.distance = 0;
        }

        let mut heap = BinaryHeap::new();
        let mut sequence = 0u64;
        heap.push(Reverse((0u32, sequence, self.origin_id)));

        while let Some(Reverse((cost, _, id))) = heap.pop() {
            let Some(state) = self.arena.get(id) else {
                continue;
            };
            if cost > state.distance {
                continue;
            }
            let Some(position) = self.grid.cell(id).map(|cell| cell.position) else {
                continue;
            };

            if id != self.origin_id {
                self.settled.push(id);
                if let Some(state) = self.arena.get_mut(id) {
                    state.selectable = true;
                }
            }

            if self.action.is_targeted()
                && cost.saturating_add(self.action.action_point_cost) <= self.budget
            {
                self.discover_targets(id, position, cost);
            }

            for next in self.grid.neighbors(position) {
                let (Some(next_id), Some(cell)) = (self.grid.cell_id(next), self.grid.cell_at(next))
                else {
                    continue;
                };
                if !cell.is_enterable() {
                    continue;
                }
                let next_cost = cost.saturating_add(cell.movement_cost);
                if next_cost > self.budget {
                    continue;
                }
                let Some(state) = self.arena.get_mut(next_id) else {
                    continue;
                };
                if state.visited && next_cost >= state.distance {
                    continue;
                }
                state.visited = true;
                state.distance = next_cost;
                state.parent = Some(id);
                sequence += 1;
                heap.push(Reverse((next_cost, sequence, next_id)));
            }
        }
    }

    fn discover_targets(&mut self, launch_id: CellId, launch: Position, movement_cost: u32) {
        if self.action.targets_enemies_only {
            let roster = self.roster;
            for target in roster.iter_living() {
                if !self.searcher.is_hostile_to(target) {
                    continue;
                }
                let Some(cell) = target.position else {
                    continue;
                };
                if !self.sight.can_target(self.searcher, target) {
                    continue;
                }
                self.try_target(launch_id, launch, cell, movement_cost, Some(target.id));
            }
        } else if self.action.can_target_empty_tiles {
            // Later launch cells can only add targets the board still has.
            if self.targets.len() >= self.grid.cell_count() {
                return;
            }
            let dims = self.grid.dimensions();
            let last_x = i32::try_from(dims.width).unwrap_or(i32::MAX).saturating_sub(1);
            let last_y = i32::try_from(dims.height).unwrap_or(i32::MAX).saturating_sub(1);
            let range = i32::try_from(self.action.max_range).unwrap_or(i32::MAX);

            // Diamond around the launch cell, clipped to the board.
            let top = launch.y.saturating_sub(range).max(0);
            let bottom = launch.y.saturating_add(range).min(last_y);
            for y in top..=bottom {
                let span = range - (y - launch.y).abs();
                let left = launch.x.saturating_sub(span).max(0);
                let right = launch.x.saturating_add(span).min(last_x);
                for x in left..=right {
                    let cell = Position::new(x, y);
                    if cell == launch {
                        continue;
                    }
                    let occupant = self.grid.occupant(cell);
                    self.try_target(launch_id, launch, cell, movement_cost, occupant);
                }
            }
        }
    }

    fn try_target(
        &mut self,
        launch_id: CellId,
        launch: Position,
        cell: Position,
        movement_cost: u32,
        occupant: Option<UnitId>,
    ) {
        let Some(cell_id) = self.grid.cell_id(cell) else {
            return;
        };
        if self
            .arena
            .get(cell_id)
            .is_none_or(|state| state.attack_cost.is_some())
        {
            return;
        }
        if !self.action.in_range(launch, cell) {
            return;
        }
        if self.action.requires_line_of_sight && !self.line_of_sight(launch_id, cell_id) {
            return;
        }

        let cost = movement_cost.saturating_add(self.action.action_point_cost);
        if let Some(state) = self.arena.get_mut(cell_id) {
            state.attack_cost = Some(cost);
            state.launch_parent = Some(launch_id);
            state.selectable = true;
        }
        self.targets.push((cell_id, launch_id, occupant));
    }

    fn line_of_sight(&mut self, a: CellId, b: CellId) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(cached) = self.los_cache.get(&key) {
            return *cached;
        }
        let (Some(from), Some(to)) = (self.grid.cell(a), self.grid.cell(b)) else {
            return false;
        };
        let seen = has_line_of_sight(self.grid, from.position, to.position);
        self.los_cache.insert(key, seen);
        seen
    }

    fn path_to(&self, id: CellId) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.origin_id {
            let Some(cell) = self.grid.cell(current) else {
                break;
            };
            path.push(cell.position);
            match self.arena.get(current).and_then(|state| state.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    fn finish(self, origin: Position) -> Reachability {
        let position = |id: CellId| self.grid.cell(id).map(|cell| cell.position);
        let distance = |id: CellId| self.arena.get(id).map_or(0, |state| state.distance);

        // Tiles a ground attack can hit are chosen as targets, not walked to.
        let ground = self.action.can_target_empty_tiles;
        let is_target = |id: CellId| {
            self.arena
                .get(id)
                .is_some_and(|state| state.attack_cost.is_some())
        };

        let moves = self
            .settled
            .iter()
            .filter(|id| !(ground && is_target(**id)))
            .filter_map(|id| {
                Some(MoveDestination {
                    cell: position(*id)?,
                    cost: distance(*id),
                    path: self.path_to(*id),
                })
            })
            .collect();

        let attacks = self
            .targets
            .iter()
            .filter_map(|(cell_id, launch_id, occupant)| {
                let movement_cost = distance(*launch_id);
                Some(AttackTarget {
                    cell: position(*cell_id)?,
                    launch: position(*launch_id)?,
                    launch_path: self.path_to(*launch_id),
                    movement_cost,
                    cost: movement_cost + self.action.action_point_cost,
                    occupant: *occupant,
                })
            })
            .collect();

        Reachability {
            unit: Some(self.searcher.id),
            origin: Some(origin),
            budget: self.budget,
            moves,
            attacks,
        }
    }
}
