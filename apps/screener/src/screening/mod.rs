// Batch screening: multipart uploads in, ranked report out.

pub mod handlers;
pub mod pipeline;
