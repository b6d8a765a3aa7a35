pub mod assembler;
pub mod geojson;
pub mod resolution;
pub mod sampler;
pub mod segment;

pub use assembler::{assemble, QuerySpec};
pub use geojson::{FeatureCollection, TrackFeature, TrackProperties};
pub use resolution::Resolution;
pub use sampler::{build_line_segments, LineSegment};
pub use segment::{segment_range, TimeWindow};
