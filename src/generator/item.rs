use crate::request::Document;

/// One raw input item before it becomes a document
#[derive(Debug, Clone, PartialEq)]
pub enum RawItem {
    Bytes(Vec<u8>),
    Text(String),
    /// A pre-built record, copied verbatim
    Document(Document),
}

impl RawItem {
    /// Bytes for a buffer payload; text is UTF-8 encoded
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RawItem::Bytes(bytes) => bytes,
            RawItem::Text(text) => text.into_bytes(),
            RawItem::Document(doc) => doc.buffer().map(<[u8]>::to_vec).unwrap_or_default(),
        }
    }

    /// Text for a URI or path payload; bytes are decoded lossily
    pub fn into_text(self) -> String {
        match self {
            RawItem::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            RawItem::Text(text) => text,
            RawItem::Document(doc) => doc
                .data_uri()
                .or_else(|| doc.file_path())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<Vec<u8>> for RawItem {
    fn from(bytes: Vec<u8>) -> Self {
        RawItem::Bytes(bytes)
    }
}

impl From<&[u8]> for RawItem {
    fn from(bytes: &[u8]) -> Self {
        RawItem::Bytes(bytes.to_vec())
    }
}

impl From<String> for RawItem {
    fn from(text: String) -> Self {
        RawItem::Text(text)
    }
}

impl From<&str> for RawItem {
    fn from(text: &str) -> Self {
        RawItem::Text(text.to_string())
    }
}

impl From<Document> for RawItem {
    fn from(doc: Document) -> Self {
        RawItem::Document(doc)
    }
}

/// Borrowed records are cloned, so the caller's copy stays untouched
impl From<&Document> for RawItem {
    fn from(doc: &Document) -> Self {
        RawItem::Document(doc.clone())
    }
}
