use super::{CellId, Grid};

/// Per-cell scratch fields written by one reachability search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub visited: bool,
    pub selectable: bool,
    /// Previous cell on the cheapest movement path.
    pub parent: Option<CellId>,
    /// Cell the unit attacks this cell from.
    pub launch_parent: Option<CellId>,
    /// Accumulated movement cost from the origin.
    pub distance: u32,
    /// Movement plus action cost when the cell is an attack target.
    pub attack_cost: Option<u32>,
}

/// Side array of [`SearchState`] indexed by [`CellId`].
#[derive(Clone, Debug, Default)]
pub struct SearchArena {
    states: Vec<SearchState>,
}

impl SearchArena {
    pub fn new(grid: &Grid) -> Self {
        Self {
            states: vec![SearchState::default(); grid.cell_count()],
        }
    }

    /// Clears every scratch field and sizes the arena for `grid`.
    ///
    /// Must run before each search; calling it twice is harmless.
    pub fn reset(&mut self, grid: &Grid) {
        self.states.clear();
        self.states.resize(grid.cell_count(), SearchState::default());
    }

    pub fn get(&self, id: CellId) -> Option<&SearchState> {
        self.states.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut SearchState> {
        self.states.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_idempotent() {
        let grid = Grid::open(3, 3);
        let mut arena = SearchArena::new(&grid);
        if let Some(state) = arena.get_mut(CellId(4)) {
            state.visited = true;
            state.distance = 7;
        }

        arena.reset(&grid);
        let once = arena.states.clone();
        arena.reset(&grid);

        assert_eq!(arena.states, once);
        assert!(arena.states.iter().all(|s| *s == SearchState::default()));
        assert_eq!(arena.len(), 9);
    }
}
