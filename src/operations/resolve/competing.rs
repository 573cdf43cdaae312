use super::OverrideLookup;
use crate::math::{classify_overlap, OverlapKind};
use crate::plan::{Edge, Room, RoomColor, RoomId};

/// One room's claim on a wall segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Competitor<'a> {
    pub room: &'a RoomId,
    pub color: RoomColor,
    pub created_at: u64,
}

/// Rooms present at `edge`: the segment meets their rectangle, and they are
/// either the owner or share a true (non-tangent) overlap with the owner.
#[must_use]
pub fn competing_rooms<'a>(edge: &Edge, owner: &Room, rooms: &'a [Room]) -> Vec<&'a Room> {
    let owner_rect = owner.rect();
    rooms
        .iter()
        .filter(|r| edge.meets_rect(&r.rect()))
        .filter(|r| {
            r.id == owner.id
                || matches!(
                    classify_overlap(&owner_rect, &r.rect()),
                    OverlapKind::Overlapping(_)
                )
        })
        .collect()
}

/// Competing colors at `edge`, in room order.
///
/// The owner contributes its override when one applies; every other room
/// contributes its plain color.
#[must_use]
pub fn competitors<'a>(
    edge: &Edge,
    owner: &Room,
    rooms: &'a [Room],
    overrides: &OverrideLookup<'_>,
) -> Vec<Competitor<'a>> {
    competing_rooms(edge, owner, rooms)
        .into_iter()
        .map(|r| {
            let color = if r.id == owner.id {
                overrides.owner_override(edge).unwrap_or(r.color)
            } else {
                r.color
            };
            Competitor {
                room: &r.id,
                color,
                created_at: r.created_at,
            }
        })
        .collect()
}

/// Distinct colors among `competitors`, in discovery order.
#[must_use]
pub fn distinct_colors(competitors: &[Competitor<'_>]) -> Vec<RoomColor> {
    let mut colors = Vec::new();
    for c in competitors {
        if !colors.contains(&c.color) {
            colors.push(c.color);
        }
    }
    colors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::segment::SegmentRoomEdges;
    use crate::plan::Side;

    fn room(id: &str, x: i32, y: i32, color: RoomColor, created_at: u64) -> Room {
        Room {
            id: RoomId::from(id),
            name: String::new(),
            x,
            y,
            width: 4,
            height: 4,
            color,
            created_at,
            conditions: Vec::new(),
        }
    }

    #[test]
    fn overlapping_neighbour_competes_on_shared_strip() {
        let a = room("a", 0, 0, RoomColor::Red, 1);
        let b = room("b", 3, 0, RoomColor::Blue, 2);
        let rooms = [a.clone(), b];
        let edges = SegmentRoomEdges::new(&a).execute(&rooms);
        let east = edges.iter().find(|e| e.side == Side::East).unwrap();
        let ids: Vec<_> = competing_rooms(east, &a, &rooms)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);

        let north_left = edges.iter().find(|e| e.id.as_str() == "a-north-0").unwrap();
        assert_eq!(competing_rooms(north_left, &a, &rooms).len(), 1);
    }

    #[test]
    fn tangent_neighbour_does_not_compete() {
        let a = room("a", 0, 0, RoomColor::Red, 1);
        let b = room("b", 4, 0, RoomColor::Blue, 2);
        let rooms = [a.clone(), b];
        let edges = SegmentRoomEdges::new(&a).execute(&rooms);
        let east = edges.iter().find(|e| e.side == Side::East).unwrap();
        assert_eq!(competing_rooms(east, &a, &rooms).len(), 1);
    }

    #[test]
    fn owner_override_only_applies_to_owner() {
        let a = room("a", 0, 0, RoomColor::Red, 1);
        let b = room("b", 3, 0, RoomColor::Blue, 2);
        let rooms = [a.clone(), b];
        let mut east = SegmentRoomEdges::new(&a)
            .execute(&rooms)
            .into_iter()
            .find(|e| e.side == Side::East)
            .unwrap();
        east.color_override = Some(RoomColor::Yellow);
        let cs = competitors(&east, &a, &rooms, &OverrideLookup::EdgeOnly);
        assert_eq!(cs[0].color, RoomColor::Yellow);
        assert_eq!(cs[1].color, RoomColor::Blue);
        assert_eq!(distinct_colors(&cs), vec![RoomColor::Yellow, RoomColor::Blue]);
    }
}
