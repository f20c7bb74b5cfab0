//! Approximate placement for nodes added between layout passes.

use crate::config::PlacementConfig;
use crate::types::Position;

/// Initial position of a new child given its parent and existing sibling count.
///
/// The child sits one column to the right of the parent. Each new sibling
/// steps down by `y_offset`, and the group is shifted up by half the span of
/// the siblings already present so the fan stays roughly centered on the
/// parent.
pub fn place_child(parent: Position, sibling_count: usize, config: &PlacementConfig) -> Position {
    let k = sibling_count as f64;
    let span = sibling_count.saturating_sub(1) as f64 * config.y_offset;
    Position::new(
        parent.x + config.x_offset,
        parent.y + k * config.y_offset - span / 2.0,
    )
}
