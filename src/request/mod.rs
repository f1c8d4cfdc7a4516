mod document;
mod message;
mod mode;


pub use document::{Document, Payload};
pub use message::{FLUSH_REQUEST_ID, Request, RequestBody};
pub use mode::Mode;
