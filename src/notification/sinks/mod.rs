//! 具体 sink 实现

pub mod memory;
pub mod tracing_sink;
#[cfg(feature = "desktop")]
pub mod desktop;

pub use memory::{MemorySink, SubmissionRecord, DEFAULT_LOG_LIMIT};
pub use tracing_sink::TracingSink;
#[cfg(feature = "desktop")]
pub use desktop::DesktopSink;
