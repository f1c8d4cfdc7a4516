use super::{Document, Mode};
use serde::{Deserialize, Serialize};

/// Fixed id of the TRAIN flush request, independent of the running counter
pub const FLUSH_REQUEST_ID: u64 = 1;

/// One unit of work sent downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub request_id: u64,
    /// Mode-qualified body; serialized under the mode's name
    #[serde(flatten)]
    pub body: RequestBody,
}

/// Mode-specific request fields.
///
/// Each mode owns its document list, so the target list is picked by
/// matching on the variant rather than by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestBody {
    Index {
        docs: Vec<Document>,
    },
    Train {
        docs: Vec<Document>,
        #[serde(default, skip_serializing_if = "is_false")]
        flush: bool,
    },
    Search {
        docs: Vec<Document>,
        top_k: u64,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl RequestBody {
    /// Empty body for `mode`. `top_k` is only kept for SEARCH.
    pub fn for_mode(mode: Mode, top_k: u64) -> Self {
        match mode {
            Mode::Index => RequestBody::Index { docs: Vec::new() },
            Mode::Train => RequestBody::Train {
                docs: Vec::new(),
                flush: false,
            },
            Mode::Search => RequestBody::Search {
                docs: Vec::new(),
                top_k,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            RequestBody::Index { .. } => Mode::Index,
            RequestBody::Train { .. } => Mode::Train,
            RequestBody::Search { .. } => Mode::Search,
        }
    }

    pub fn docs(&self) -> &[Document] {
        match self {
            RequestBody::Index { docs }
            | RequestBody::Train { docs, .. }
            | RequestBody::Search { docs, .. } => docs,
        }
    }

    pub fn docs_mut(&mut self) -> &mut Vec<Document> {
        match self {
            RequestBody::Index { docs }
            | RequestBody::Train { docs, .. }
            | RequestBody::Search { docs, .. } => docs,
        }
    }
}

impl Request {
    pub fn new(request_id: u64, body: RequestBody) -> Self {
        Self { request_id, body }
    }

    /// The TRAIN terminal request: no documents, flush set
    pub fn flush() -> Self {
        Self {
            request_id: FLUSH_REQUEST_ID,
            body: RequestBody::Train {
                docs: Vec::new(),
                flush: true,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.body.mode()
    }

    pub fn docs(&self) -> &[Document] {
        self.body.docs()
    }

    pub fn docs_mut(&mut self) -> &mut Vec<Document> {
        self.body.docs_mut()
    }

    pub fn is_flush(&self) -> bool {
        matches!(self.body, RequestBody::Train { flush: true, .. })
    }

    pub fn top_k(&self) -> Option<u64> {
        match self.body {
            RequestBody::Search { top_k, .. } => Some(top_k),
            _ => None,
        }
    }
}
