//! Interview session client.
//!
//! `InterviewClient` wraps a `BoxLlmProvider` with the interviewer persona.
//! Hosted model APIs are stateless, so the client owns the conversation
//! history and resends it on every turn. A turn is committed to history only
//! once its reply has streamed in completely.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use pin_project_lite::pin_project;
use thiserror::Error;
use tracing::{Instrument, Span, debug, error, info_span, warn};

use coach_types::chat::Report;
use coach_types::config::ProviderSettings;
use coach_types::interview::InterviewConfiguration;
use coach_types::llm::{CompletionRequest, LlmError, Message, StreamEvent};

use crate::llm::box_provider::BoxLlmProvider;

use super::prompt::{KICKOFF_MESSAGE, report_prompt, system_instruction};

pub const START_EMPTY_FALLBACK: &str = "Error starting interview.";
pub const START_FAILURE_FALLBACK: &str =
    "I'm having trouble connecting to the interview server. Please check your connection.";
pub const REPORT_EMPTY_FALLBACK: &str = "Could not generate report.";
pub const REPORT_FAILURE_FALLBACK: &str = "Error analyzing interview data.";

/// Errors from session client operations that cannot be absorbed into
/// fallback text.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("interview session not initialized: call start() first")]
    Uninitialized,
}

/// A lazy, single-pass stream of reply fragments for one turn.
pub type TurnStream<'a> = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send + 'a>>;

/// Sampling settings applied to every request in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from(&ProviderSettings::default())
    }
}

impl From<&ProviderSettings> for ModelSettings {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Client for a single interview session.
pub struct InterviewClient {
    provider: BoxLlmProvider,
    config: InterviewConfiguration,
    settings: ModelSettings,
    system: String,
    /// `None` until `start()` has run.
    history: Option<Vec<Message>>,
}

impl InterviewClient {
    pub fn new(
        provider: BoxLlmProvider,
        config: InterviewConfiguration,
        settings: ModelSettings,
    ) -> Self {
        let system = system_instruction(&config);
        Self {
            provider,
            config,
            settings,
            system,
            history: None,
        }
    }

    pub fn configuration(&self) -> &InterviewConfiguration {
        &self.config
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.history.is_some()
    }

    /// Messages committed to the conversation so far.
    pub fn history(&self) -> &[Message] {
        self.history.as_deref().unwrap_or_default()
    }

    /// Open the session and return the interviewer's first message.
    ///
    /// Never fails: an empty reply or a transport error is turned into
    /// fallback text. The session counts as initialized afterwards either
    /// way, so the candidate can still reply.
    pub async fn start(&mut self) -> String {
        let kickoff = Message::user(KICKOFF_MESSAGE);
        let request = self.request(vec![kickoff.clone()], false);

        let span = info_span!(
            "gen_ai.start",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
        );

        match self.provider.complete(&request).instrument(span).await {
            Ok(response) if !response.content.trim().is_empty() => {
                self.history = Some(vec![kickoff, Message::assistant(response.content.clone())]);
                response.content
            }
            Ok(_) => {
                warn!("interviewer returned an empty opening message");
                self.history = Some(Vec::new());
                START_EMPTY_FALLBACK.to_string()
            }
            Err(e) => {
                error!(error = %e, "failed to start interview session");
                self.history = Some(Vec::new());
                START_FAILURE_FALLBACK.to_string()
            }
        }
    }

    /// Send one candidate message and stream the interviewer's reply.
    ///
    /// Fragments with no text are skipped. A transport failure, or a reply
    /// that ends without any text, is yielded as the stream's last item. The
    /// exchange is appended to history only when the stream runs to
    /// completion with a non-empty reply.
    pub fn send_turn(&mut self, text: &str) -> Result<TurnStream<'_>, SessionError> {
        let Some(history) = self.history.as_mut() else {
            return Err(SessionError::Uninitialized);
        };

        let mut messages = history.clone();
        messages.push(Message::user(text));
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(self.system.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            stream: true,
        };

        let span = info_span!(
            "gen_ai.turn",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.messages = request.messages.len(),
        );
        let mut events = InSpan {
            inner: self.provider.stream(request),
            span,
        };
        let user_text = text.to_string();

        Ok(Box::pin(async_stream::stream! {
            let mut reply = String::new();
            let mut stop_reason = None;
            while let Some(event) = events.next().await {
                match event {
                    Ok(StreamEvent::TextDelta { text }) => {
                        if text.is_empty() {
                            continue;
                        }
                        reply.push_str(&text);
                        yield Ok(text);
                    }
                    Ok(StreamEvent::Usage(usage)) => {
                        debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "turn usage"
                        );
                    }
                    Ok(StreamEvent::MessageDelta { stop_reason: reason }) => {
                        stop_reason = Some(reason);
                    }
                    Ok(StreamEvent::Done) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "interview turn failed mid-stream");
                        yield Err(e);
                        return;
                    }
                }
            }
            if reply.trim().is_empty() {
                warn!(?stop_reason, "interview turn produced no text");
                yield Err(LlmError::EmptyReply { stop_reason });
                return;
            }
            history.push(Message::user(user_text));
            history.push(Message::assistant(reply));
        }))
    }

    /// Produce a feedback report for a transcript. Stateless: does not read
    /// or modify the session history. Never fails.
    pub async fn generate_report(&self, transcript: &str) -> Report {
        let prompt = report_prompt(transcript, &self.config.role);
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            system: None,
            max_tokens: self.settings.max_tokens,
            temperature: None,
            stream: false,
        };

        let span = info_span!(
            "gen_ai.report",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
        );

        match self.provider.complete(&request).instrument(span).await {
            Ok(response) if !response.content.trim().is_empty() => Report::new(response.content),
            Ok(_) => {
                warn!("report request returned no text");
                Report::new(REPORT_EMPTY_FALLBACK)
            }
            Err(e) => {
                error!(error = %e, "failed to generate interview report");
                Report::new(REPORT_FAILURE_FALLBACK)
            }
        }
    }

    fn request(&self, messages: Vec<Message>, stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(self.system.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            stream,
        }
    }
}

pin_project! {
    /// Keeps a tracing span entered while the wrapped stream is polled.
    struct InSpan<S> {
        #[pin]
        inner: S,
        span: Span,
    }
}

impl<S: Stream> Stream for InSpan<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let _enter = this.span.enter();
        this.inner.poll_next(cx)
    }
}
