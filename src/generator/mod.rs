mod advisory;
mod config;
mod ids;
mod item;


pub use advisory::{AdvisorySink, MIME_TYPE_ADVICE, TracingSink};
pub use config::{DEFAULT_TOP_K, GeneratorConfig, InputType};
pub use ids::DocIdSource;
pub use item::RawItem;

use crate::batcher::{Batcher, Batches};
use crate::error::GenerateError;
use crate::request::{Document, Mode, Payload, Request, RequestBody};
use rand::RngCore;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Batching,
    Flush,
    Done,
}

/// Lazy request producer over an input sequence.
///
/// Each call to `next` pulls one batch from the input and yields one
/// complete request. In TRAIN mode a flush request follows the last batch.
/// After an error the iterator is finished.
pub struct RequestGenerator<I: Iterator> {
    batches: Batches<I>,
    config: GeneratorConfig,
    next_request_id: u64,
    doc_ids: DocIdSource,
    sink: Box<dyn AdvisorySink>,
    mime_advised: bool,
    state: State,
}

impl<I> RequestGenerator<I>
where
    I: Iterator,
    I::Item: Into<RawItem>,
{
    pub fn new<T>(items: T, config: GeneratorConfig) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let doc_ids = if config.random_doc_id {
            DocIdSource::random()
        } else {
            DocIdSource::sequential(config.first_doc_id)
        };

        Self {
            batches: Batcher::new(config.batch_size).batches(items),
            next_request_id: config.first_request_id,
            doc_ids,
            sink: Box::new(TracingSink),
            mime_advised: false,
            state: State::Batching,
            config,
        }
    }

    /// Replace the advisory sink (defaults to `TracingSink`)
    pub fn with_sink(mut self, sink: impl AdvisorySink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Inject the random source for doc ids. Ignored unless `random_doc_id` is set.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        if self.config.random_doc_id {
            self.doc_ids = DocIdSource::with_rng(rng);
        }
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_request(&mut self, batch: Vec<I::Item>) -> Result<Request, GenerateError> {
        // Checked per batch, not once per run
        let top_k = match self.config.mode {
            Mode::Search if self.config.top_k <= 0 => {
                return Err(GenerateError::InvalidArgument {
                    top_k: self.config.top_k,
                });
            }
            Mode::Search => self.config.top_k as u64,
            _ => 0,
        };

        // Wraps at u64::MAX
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);

        let mut body = RequestBody::for_mode(self.config.mode, top_k);
        let docs = body.docs_mut();
        docs.reserve(batch.len());
        for item in batch {
            docs.push(self.build_document(item.into()));
        }

        Ok(Request::new(request_id, body))
    }

    fn build_document(&mut self, item: RawItem) -> Document {
        let mut doc = match (self.config.input_type, item) {
            (_, RawItem::Document(record)) => record,
            (InputType::DataUri, item) => Document::new(Payload::DataUri(item.into_text())),
            (InputType::FilePath, item) => Document::new(Payload::FilePath(item.into_text())),
            (InputType::Buffer, item) => {
                self.advise_missing_mime_type();
                let mut doc = Document::new(Payload::Buffer(item.into_bytes()));
                doc.mime_type = self.config.mime_type.clone().filter(|m| !m.is_empty());
                doc
            }
            (InputType::Protobuf, item) => Document::new(Payload::Buffer(item.into_bytes())),
        };

        doc.doc_id = self.doc_ids.next_id();
        doc.weight = 1.0;
        doc
    }

    fn advise_missing_mime_type(&mut self) {
        if self.mime_advised || self.config.has_mime_type() {
            return;
        }
        self.mime_advised = true;
        self.sink.advise(MIME_TYPE_ADVICE);
    }
}

impl<I> Iterator for RequestGenerator<I>
where
    I: Iterator,
    I::Item: Into<RawItem>,
{
    type Item = Result<Request, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::Flush => {
                    self.state = State::Done;
                    debug!("emitting train flush request");
                    return Some(Ok(Request::flush()));
                }
                State::Batching => {}
            }

            let Some(batch) = self.batches.next() else {
                self.state = if self.config.mode == Mode::Train {
                    State::Flush
                } else {
                    State::Done
                };
                continue;
            };

            return match self.build_request(batch) {
                Ok(request) => {
                    debug!(
                        request_id = request.request_id,
                        mode = %request.mode(),
                        docs = request.docs().len(),
                        "built request"
                    );
                    Some(Ok(request))
                }
                Err(err) => {
                    self.state = State::Done;
                    Some(Err(err))
                }
            };
        }
    }
}

/// Generate requests in the configured mode
pub fn generate<T>(items: T, config: GeneratorConfig) -> RequestGenerator<T::IntoIter>
where
    T: IntoIterator,
    T::Item: Into<RawItem>,
{
    RequestGenerator::new(items, config)
}

/// Generate indexing requests
pub fn index<T>(items: T, config: GeneratorConfig) -> RequestGenerator<T::IntoIter>
where
    T: IntoIterator,
    T::Item: Into<RawItem>,
{
    generate(items, config.mode(Mode::Index))
}

/// Generate training requests, ending with the flush request
pub fn train<T>(items: T, config: GeneratorConfig) -> RequestGenerator<T::IntoIter>
where
    T: IntoIterator,
    T::Item: Into<RawItem>,
{
    generate(items, config.mode(Mode::Train))
}

/// Generate search requests
pub fn search<T>(items: T, config: GeneratorConfig) -> RequestGenerator<T::IntoIter>
where
    T: IntoIterator,
    T::Item: Into<RawItem>,
{
    generate(items, config.mode(Mode::Search))
}
