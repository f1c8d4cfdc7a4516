use thiserror::Error;

/// Terminal failure of a request generation run.
///
/// Requests yielded before the error stay valid; nothing is yielded after it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("\"top_k: {top_k}\" is not a valid number")]
    InvalidArgument { top_k: i64 },
}
