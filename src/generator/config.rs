use crate::request::Mode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How raw input items are turned into document payloads. Fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    Buffer,
    DataUri,
    FilePath,
    Protobuf,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputType::Buffer => "buffer",
            InputType::DataUri => "data_uri",
            InputType::FilePath => "file_path",
            InputType::Protobuf => "protobuf",
        };
        f.write_str(name)
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "buffer" => Ok(InputType::Buffer),
            "data_uri" | "datauri" => Ok(InputType::DataUri),
            "file_path" | "filepath" => Ok(InputType::FilePath),
            "protobuf" => Ok(InputType::Protobuf),
            other => Err(format!("unknown input type: {}", other)),
        }
    }
}

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Items per request; 0 puts the whole input in one request
    pub batch_size: usize,
    pub first_doc_id: u64,
    pub first_request_id: u64,
    /// Draw doc ids uniformly from the u32 range instead of counting
    pub random_doc_id: bool,
    pub mode: Mode,
    /// Only read in SEARCH mode; must be positive there
    pub top_k: i64,
    pub input_type: InputType,
    pub mime_type: Option<String>,
}

pub const DEFAULT_TOP_K: i64 = 50;

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 0,
            first_doc_id: 0,
            first_request_id: 0,
            random_doc_id: false,
            mode: Mode::Index,
            top_k: DEFAULT_TOP_K,
            input_type: InputType::Buffer,
            mime_type: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn first_doc_id(mut self, id: u64) -> Self {
        self.first_doc_id = id;
        self
    }

    pub fn first_request_id(mut self, id: u64) -> Self {
        self.first_request_id = id;
        self
    }

    pub fn random_doc_id(mut self, random: bool) -> Self {
        self.random_doc_id = random;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Whether a non-empty MIME type was configured
    pub fn has_mime_type(&self) -> bool {
        self.mime_type.as_deref().is_some_and(|m| !m.is_empty())
    }
}
