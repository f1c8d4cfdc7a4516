// Public API exports
pub mod batcher;
pub mod error;
pub mod generator;
pub mod request;

// Re-export main types for convenience
pub use batcher::{Batcher, Batches};
pub use error::GenerateError;

pub use request::{Document, FLUSH_REQUEST_ID, Mode, Payload, Request, RequestBody};

pub use generator::{
    AdvisorySink, DocIdSource, GeneratorConfig, InputType, MIME_TYPE_ADVICE, RawItem,
    RequestGenerator, TracingSink, generate, index, search, train,
};
