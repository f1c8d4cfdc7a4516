use serde::{Deserialize, Serialize};

/// One processed input item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Sequential or random identifier, assigned by the generator
    #[serde(default)]
    pub doc_id: u64,
    /// Always 1.0 for generated documents
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// MIME type of a buffer payload, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub payload: Payload,
}

/// The content carried by a document. Exactly one representation per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Raw bytes (hex-encoded on the wire)
    Buffer(#[serde(with = "hex::serde")] Vec<u8>),
    /// A `data:` URI
    DataUri(String),
    /// A path the receiver resolves itself
    FilePath(String),
}

fn default_weight() -> f32 {
    1.0
}

impl Document {
    pub fn new(payload: Payload) -> Self {
        Self {
            doc_id: 0,
            weight: default_weight(),
            mime_type: None,
            payload,
        }
    }

    pub fn buffer(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn data_uri(&self) -> Option<&str> {
        match &self.payload {
            Payload::DataUri(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        match &self.payload {
            Payload::FilePath(path) => Some(path),
            _ => None,
        }
    }
}
