//! Document upload: validation, text extraction, progress and the pipeline
//! that ties them to storage and the repositories.

pub mod extraction;
pub mod pipeline;
pub mod progress;
pub mod validation;
