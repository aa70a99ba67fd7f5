//! Question-to-SQL orchestration
//!
//! One `ask` turn flows retrieve → assemble → generate → sanitize →
//! execute, each stage a separate module with the orchestrator in
//! [`pipeline`]. Training and maintenance of the context index also go
//! through the orchestrator so callers never touch the store directly.

pub mod pipeline;
pub mod prompt;
pub mod retrieve;
pub mod sanitize;

pub use pipeline::{SqlPipeline, TrainingStats};
pub use prompt::assemble_prompt;
pub use retrieve::retrieve;
pub use sanitize::sanitize_response;
