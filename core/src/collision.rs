use smallvec::SmallVec;

use crate::*;

pub type Contacts = SmallVec<[usize; 5]>;

pub const GHOST_BASE_BONUS: u32 = 200;

/// Same cell, or swapping cells head-on within the same tick.
pub fn in_contact(player: &Motion, ghost: &Motion, maze: &Maze) -> bool {
    if player.position == ghost.position {
        return true;
    }

    player.is_moving
        && ghost.is_moving
        && player.direction.is_opposite_of(ghost.direction)
        && player.transit_target(maze) == ghost.position
        && ghost.transit_target(maze) == player.position
}

/// Indices into `ghosts` touching the player, in roster order.
pub fn find_contacts(player: &Motion, ghosts: &[Ghost], maze: &Maze) -> Contacts {
    ghosts
        .iter()
        .enumerate()
        .filter(|(_, ghost)| in_contact(player, &ghost.motion, maze))
        .map(|(index, _)| index)
        .collect()
}

/// Points for the `eaten`-th ghost of one power window: 200, 400, 800, ...
pub fn ghost_bonus(eaten: u32) -> u32 {
    let doublings = eaten.saturating_sub(1);
    match 1u32.checked_shl(doublings) {
        Some(factor) => GHOST_BASE_BONUS.saturating_mul(factor),
        None => u32::MAX,
    }
}
