pub mod runner;

pub use runner::{
    PipelineError, RawTrackRequest, TrackPipeline, TrackRequest, ValidationError,
};
