pub mod curator;
pub mod composer;
pub mod pipeline;

pub use curator::{Curator, SUMMARY_FAILED_NOTE};
pub use composer::{truncate_graphemes, PostComposer};
pub use pipeline::{PublishPipeline, RunOutcome, Stage};
