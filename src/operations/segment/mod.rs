mod regenerate;
mod room_edges;

pub use regenerate::RegenerateEdges;
pub use room_edges::SegmentRoomEdges;
