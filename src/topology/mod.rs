pub mod directed_edge;
pub mod edge;
pub mod edge_end;
pub mod edge_star;
pub mod geometry_graph;
pub mod label;
pub mod node;
pub mod planar_graph;
pub mod segment_intersector;

pub use directed_edge::{DirEdgeId, DirectedEdge};
pub use edge::{Edge, EdgeId, EdgeIntersection, EdgeIntersectionList};
pub use edge_end::{EdgeEnd, Quadrant};
pub use edge_star::{is_area_labelling_consistent, label_edge_star, DirectedEdgeStar};
pub use geometry_graph::{ComponentIndex, GeometryGraph};
pub use label::{Label, Location, Position, TopologyLocation};
pub use node::{CoordKey, Node, NodeMap};
pub use planar_graph::PlanarGraph;
pub use segment_intersector::{
    EdgeHandle, EdgeSetIntersector, EdgeSetIntersectorKind, IntersectionSummary, NodingOutcome,
    SegmentIntersector, SimpleEdgeSetIntersector, SweepLineEdgeSetIntersector,
};
