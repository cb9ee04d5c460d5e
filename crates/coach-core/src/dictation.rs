//! Speech-to-text port.
//!
//! Dictation is an optional capability injected into the chat controller.
//! Environments without a speech backend get [`UnsupportedDictation`], which
//! reports itself as unsupported so the UI can show a notice instead of
//! failing.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors from a dictation backend.
#[derive(Debug, Error)]
pub enum DictationError {
    #[error("speech recognition is not supported in this environment")]
    Unsupported,

    #[error("failed to start dictation: {0}")]
    Launch(String),

    #[error("dictation failed: {0}")]
    Failed(String),

    #[error("no speech was recognized")]
    NoSpeech,
}

/// A speech recognizer that captures one utterance per `listen` call.
///
/// There is no separate stop call. A capture ends when the backend
/// decides the utterance is over, or when the caller drops the `listen`
/// future; backends must release the microphone on drop.
pub trait Dictation: Send + Sync {
    /// Whether this backend can actually listen.
    fn is_supported(&self) -> bool;

    /// Capture one utterance and return its transcript. Cancel by dropping.
    fn listen(&self) -> impl Future<Output = Result<String, DictationError>> + Send;
}

/// Object-safe version of [`Dictation`] with boxed futures.
pub trait DictationDyn: Send + Sync {
    fn is_supported(&self) -> bool;

    fn listen_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, DictationError>> + Send + 'a>>;
}

impl<T: Dictation> DictationDyn for T {
    fn is_supported(&self) -> bool {
        Dictation::is_supported(self)
    }

    fn listen_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<String, DictationError>> + Send + 'a>> {
        Box::pin(self.listen())
    }
}

/// Type-erased dictation backend chosen at startup.
pub struct BoxDictation {
    inner: Box<dyn DictationDyn + Send + Sync>,
}

impl BoxDictation {
    pub fn new<T: Dictation + 'static>(dictation: T) -> Self {
        Self {
            inner: Box::new(dictation),
        }
    }

    /// A backend that is never available.
    pub fn unsupported() -> Self {
        Self::new(UnsupportedDictation)
    }

    pub fn is_supported(&self) -> bool {
        self.inner.is_supported()
    }

    pub async fn listen(&self) -> Result<String, DictationError> {
        self.inner.listen_boxed().await
    }
}

/// Null object used when no speech backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDictation;

impl Dictation for UnsupportedDictation {
    fn is_supported(&self) -> bool {
        false
    }

    async fn listen(&self) -> Result<String, DictationError> {
        Err(DictationError::Unsupported)
    }
}
