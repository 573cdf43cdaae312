use super::competing::Competitor;
use crate::plan::{ColorPriority, ConflictMatrix, RoomColor};

/// Last drawn or placed wins: the competitor with the largest creation time.
///
/// Equal times fall back to the larger room id in [`RoomId::natural_cmp`]
/// order, so the outcome never depends on the order rooms are listed in.
///
/// [`RoomId::natural_cmp`]: crate::plan::RoomId::natural_cmp
#[must_use]
pub fn chronological(competitors: &[Competitor<'_>]) -> Option<RoomColor> {
    competitors
        .iter()
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.room.natural_cmp(b.room))
        })
        .map(|c| c.color)
}

/// The first color of `priority` present among `colors`.
#[must_use]
pub fn by_priority(colors: &[RoomColor], priority: &ColorPriority) -> Option<RoomColor> {
    priority.first_among(colors)
}

/// The matrix rule for exactly two competing colors, in either order.
#[must_use]
pub fn by_matrix(colors: &[RoomColor], matrix: &ConflictMatrix) -> Option<RoomColor> {
    match colors {
        [a, b] => matrix.lookup(*a, *b),
        _ => None,
    }
}
