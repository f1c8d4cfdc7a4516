/// Advice shown once per run when buffers are sent without a MIME type
pub const MIME_TYPE_ADVICE: &str = "binary data is best sent with a mime_type; \
     without one the receiver falls back to MIME sniffing";

/// Receiver for non-fatal advisories raised during generation.
///
/// Delivery is fire-and-forget: a sink has no way to fail the run.
pub trait AdvisorySink: Send {
    fn advise(&self, message: &str);
}

/// Default sink, forwards advisories to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AdvisorySink for TracingSink {
    fn advise(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}
