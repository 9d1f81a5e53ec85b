//! Container I/O: record sources, cloud sinks, and the JSONL file format.

pub mod error;
pub mod jsonl;
pub mod memory;
pub mod traits;

pub use error::{SinkError, SourceError};
pub use jsonl::{JsonlReader, JsonlWriter};
pub use memory::MemorySink;
pub use traits::{CloudSink, PacketSource};
