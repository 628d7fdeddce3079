use crate::state::{Faction, UnitState};
use crate::vision::VisionSystem;

/// Decides whether a searcher may pick a unit as an attack target.
pub trait TargetSight {
    fn can_target(&self, searcher: &UnitState, target: &UnitState) -> bool;
}

/// Treats every living unit as detectable. Used when no vision is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Omniscient;

impl TargetSight for Omniscient {
    fn can_target(&self, _searcher: &UnitState, target: &UnitState) -> bool {
        target.is_alive()
    }
}

/// Players target through the shared fog; AI units through their own cone.
/// Hidden units stay untargetable unless they stand in light.
impl TargetSight for VisionSystem {
    fn can_target(&self, searcher: &UnitState, target: &UnitState) -> bool {
        match searcher.faction {
            Faction::Player => target.position.is_some_and(|position| {
                target.is_alive()
                    && self.is_tile_visible(position)
                    && (!target.is_hidden() || self.is_tile_illuminated(position))
            }),
            Faction::Enemy => self.can_see_unit(searcher.id, target),
        }
    }
}
