//! ASCII rendering of the board as the player side sees it.
//!
//! Rows are printed north to south. Glyphs:
//! - `#` wall, `~` sight-blocking smoke, `.` visible floor, blank for fog
//! - `*` lit floor, `o` move destination, `x` attack target
//! - unit initials: upper case for players, lower case for enemies

use std::collections::BTreeSet;

use tactics_core::{Encounter, Faction, Position, Reachability};

pub fn render(encounter: &Encounter, reach: Option<&Reachability>) -> String {
    let moves: BTreeSet<Position> = reach.map(|r| r.move_cells().collect()).unwrap_or_default();
    let attacks: BTreeSet<Position> = reach
        .map(|r| r.attack_cells().collect())
        .unwrap_or_default();

    let dimensions = encounter.grid().dimensions();
    let mut out = String::new();
    for y in (0..dimensions.height as i32).rev() {
        for x in 0..dimensions.width as i32 {
            out.push(glyph(encounter, Position::new(x, y), &moves, &attacks));
        }
        out.push('\n');
    }
    out
}

fn glyph(
    encounter: &Encounter,
    position: Position,
    moves: &BTreeSet<Position>,
    attacks: &BTreeSet<Position>,
) -> char {
    let Some(cell) = encounter.grid().cell_at(position) else {
        return ' ';
    };
    if !cell.is_walkable() {
        return '#';
    }
    if attacks.contains(&position) {
        return 'x';
    }
    let visible = encounter.is_tile_visible(position);
    if let Some(unit) = cell.occupant.and_then(|id| encounter.unit(id)) {
        let friendly = unit.faction == Faction::Player;
        if friendly || (visible && !unit.is_hidden()) {
            let initial = unit.name.chars().next().unwrap_or('?');
            return if friendly {
                initial.to_ascii_uppercase()
            } else {
                initial.to_ascii_lowercase()
            };
        }
    }
    if moves.contains(&position) {
        return 'o';
    }
    if cell.blocks_vision() {
        return '~';
    }
    if !visible {
        return ' ';
    }
    if encounter.is_tile_illuminated(position) {
        '*'
    } else {
        '.'
    }
}
