//! Request/response wrapper around the Darja segmenter.
//!
//! [`SegmentationService`] validates a request, normalizes its text, segments
//! it against the shared lexicon and hands the category buckets to an
//! optional [`CategorySink`]. Sink failures are logged and counted but never
//! change the response.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use darja_segmenter::{
    ArabicNormalizer, CategoryBuckets, Lexicon, SegmentationOutput, Segmenter, SegmenterConfig,
};
use darja_storage::CategorySink;
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl SegmentRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentResponse {
    pub segmented: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiError::Internal(_) => ErrorKind::InternalError,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// JSON wire form of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Success(SegmentResponse),
    Failure { error: ErrorBody },
}

impl From<Result<SegmentResponse, ApiError>> for Reply {
    fn from(result: Result<SegmentResponse, ApiError>) -> Self {
        match result {
            Ok(response) => Reply::Success(response),
            Err(err) => Reply::Failure {
                error: ErrorBody {
                    kind: err.kind(),
                    message: err.to_string(),
                },
            },
        }
    }
}

const ENCODING_FAILURE_REPLY: &str =
    r#"{"error":{"kind":"internal_error","message":"failed to encode reply"}}"#;

/// Shared entry point for every front end.
#[derive(Clone)]
pub struct SegmentationService {
    lexicon: Arc<RwLock<Arc<Lexicon>>>,
    normalizer: ArabicNormalizer,
    config: SegmenterConfig,
    sink: Option<Arc<dyn CategorySink>>,
}

impl SegmentationService {
    /// Create a service over `lexicon` with default normalization, rules and no sink.
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon: Arc::new(RwLock::new(Arc::new(lexicon))),
            normalizer: ArabicNormalizer::default(),
            config: SegmenterConfig::default(),
            sink: None,
        }
    }

    /// Replace the segmenter configuration.
    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the normalizer applied before segmentation.
    pub fn with_normalizer(mut self, normalizer: ArabicNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Persist category buckets to `sink` after each request.
    pub fn with_sink(mut self, sink: Arc<dyn CategorySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> SegmenterConfig {
        self.config
    }

    /// Snapshot of the current lexicon.
    pub fn lexicon(&self) -> Result<Arc<Lexicon>, ApiError> {
        let guard = self
            .lexicon
            .read()
            .map_err(|_| ApiError::Internal("lexicon lock poisoned".into()))?;
        Ok(Arc::clone(&guard))
    }

    /// Swap in a new lexicon. Calls already running keep their snapshot.
    pub fn reload_lexicon(&self, lexicon: Lexicon) -> Result<(), ApiError> {
        let mut guard = self
            .lexicon
            .write()
            .map_err(|_| ApiError::Internal("lexicon lock poisoned".into()))?;
        info!(
            roots = lexicon.root_count(),
            terminals = lexicon.terminal_count(),
            "reloaded lexicon"
        );
        *guard = Arc::new(lexicon);
        Ok(())
    }

    fn segmenter(&self) -> Result<Segmenter, ApiError> {
        Ok(Segmenter::new(self.lexicon()?).with_config(self.config))
    }

    /// Normalize and segment `text` without persisting anything.
    pub fn analyze(&self, text: &str) -> Result<SegmentationOutput, ApiError> {
        let normalized = self.normalizer.normalize(text);
        let segmenter = self.segmenter()?;
        let output = catch_panic(|| segmenter.segment(&normalized))
            .map_err(|msg| ApiError::Internal(format!("segmentation panicked: {msg}")))?;
        record_words(&output.buckets);
        Ok(output)
    }

    /// Validate, segment and persist one text, returning the full output.
    pub fn segment_text(&self, text: &str) -> Result<SegmentationOutput, ApiError> {
        let result = self.process(text);
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.outcome(),
        };
        counter!("darja_requests_total", "outcome" => outcome).increment(1);
        result
    }

    fn process(&self, text: &str) -> Result<SegmentationOutput, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput("text must not be empty".into()));
        }
        let output = self.analyze(text)?;
        debug!(words = output.words.len(), "segmented request");
        self.persist(&output.buckets);
        Ok(output)
    }

    /// Handle a typed request.
    pub fn segment(&self, request: SegmentRequest) -> Result<SegmentResponse, ApiError> {
        let Some(text) = request.text else {
            counter!("darja_requests_total", "outcome" => "invalid_input").increment(1);
            return Err(ApiError::InvalidInput("missing text".into()));
        };
        let output = self.segment_text(&text)?;
        Ok(SegmentResponse {
            segmented: output.text,
        })
    }

    /// Segment many texts in parallel and persist their merged buckets once.
    ///
    /// Blank texts produce an empty output in their slot.
    pub fn segment_batch<S>(&self, texts: &[S]) -> Result<Vec<SegmentationOutput>, ApiError>
    where
        S: AsRef<str>,
    {
        let normalized: Vec<String> = texts
            .iter()
            .map(|text| self.normalizer.normalize(text.as_ref()))
            .collect();
        let segmenter = self.segmenter()?;
        let outputs = catch_panic(|| segmenter.segment_batch(&normalized))
            .map_err(|msg| ApiError::Internal(format!("segmentation panicked: {msg}")))?;

        let mut merged = CategoryBuckets::new();
        for output in &outputs {
            merged.merge(output.buckets.clone());
        }
        record_words(&merged);
        info!(texts = outputs.len(), words = merged.len(), "segmented batch");
        self.persist(&merged);
        Ok(outputs)
    }

    /// Handle one JSON request body and produce the JSON reply.
    pub fn handle_json(&self, body: &str) -> String {
        let result = match serde_json::from_str::<SegmentRequest>(body) {
            Ok(request) => self.segment(request),
            Err(err) => {
                counter!("darja_requests_total", "outcome" => "invalid_input").increment(1);
                Err(ApiError::InvalidInput(format!("malformed request: {err}")))
            }
        };
        encode_reply(&Reply::from(result))
    }

    fn persist(&self, buckets: &CategoryBuckets) {
        let Some(sink) = &self.sink else {
            return;
        };
        let error = match catch_panic(|| sink.persist(buckets)) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(msg) => format!("sink panicked: {msg}"),
        };
        counter!("darja_sink_failures_total", "sink" => sink.sink_type()).increment(1);
        warn!(sink = sink.sink_type(), %error, "failed to persist category buckets");
    }
}

/// Run `f`, turning a panic into its message.
fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|msg| msg.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}

fn record_words(buckets: &CategoryBuckets) {
    for (category, words) in buckets.iter() {
        counter!("darja_words_total", "category" => category.name()).increment(words.len() as u64);
    }
}

/// Serialize a reply, falling back to a fixed internal error.
pub fn encode_reply(reply: &Reply) -> String {
    match serde_json::to_string(reply) {
        Ok(encoded) => encoded,
        Err(err) => {
            warn!(error = %err, "failed to encode reply");
            ENCODING_FAILURE_REPLY.to_string()
        }
    }
}
