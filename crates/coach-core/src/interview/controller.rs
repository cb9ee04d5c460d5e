//! Chat controller state machine.
//!
//! `ChatState` holds everything the chat view renders and exposes the state
//! transitions as synchronous event methods. `InterviewController` drives
//! those events from the session client and the dictation backend.
//!
//! Turn protocol: guard, append the user message, enter typing, stream
//! fragments into a single in-flight model message, then release it. At most
//! one turn is in flight; ending the interview while a reply is pending is
//! rejected.

use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, error, info};

use coach_types::chat::{ChatMessage, Report, SessionStatus, transcript};
use coach_types::interview::InterviewConfiguration;

use crate::dictation::{BoxDictation, DictationError};

use super::client::{InterviewClient, SessionError};

/// System notice appended when a streamed reply fails.
pub const STREAM_ERROR_NOTICE: &str = "An error occurred while getting the response.";

/// Notice shown when no interviewer backend could be set up.
pub const CONNECT_FAILURE_NOTICE: &str = "Failed to connect to the interviewer. Please try again.";

/// Errors from controller actions. All of them leave the state unchanged
/// except where noted on the variant.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("the interviewer is still responding")]
    TurnInFlight,

    #[error("the interview has already ended")]
    SessionCompleted,

    #[error("speech recognition is not supported in this environment")]
    DictationUnsupported,

    /// The listening flag has been cleared.
    #[error(transparent)]
    Dictation(#[from] DictationError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How a `send` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank draft; nothing happened.
    Ignored,
    Completed,
    /// The reply failed; partial text was kept and a notice appended.
    Failed,
}

/// Observable chat state.
#[derive(Debug, Clone)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    status: SessionStatus,
    typing: bool,
    draft: String,
    streaming: Option<usize>,
    report: Option<Report>,
    listening: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Fresh state: active, with the opening request pending.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            status: SessionStatus::Active,
            typing: true,
            draft: String::new(),
            streaming: None,
            report: None,
            listening: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// True while a request to the interviewer is pending.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// The model message currently receiving fragments, if any.
    pub fn streaming_message(&self) -> Option<&ChatMessage> {
        self.streaming.and_then(|idx| self.messages.get(idx))
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Append dictated text to the draft, space-separated.
    pub fn append_to_draft(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(text);
    }

    /// The opening request finished (with real or fallback text).
    pub fn on_opened(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::model(text));
        self.typing = false;
    }

    /// Guard and start a turn from the current draft.
    ///
    /// Returns the text to send, or `None` when the draft is blank (a
    /// no-op). On success the user message is appended, typing is set, and
    /// the draft is cleared.
    pub fn begin_turn(&mut self) -> Result<Option<String>, ControllerError> {
        if self.draft.trim().is_empty() {
            return Ok(None);
        }
        if self.status == SessionStatus::Completed {
            return Err(ControllerError::SessionCompleted);
        }
        if self.typing {
            return Err(ControllerError::TurnInFlight);
        }

        let text = std::mem::take(&mut self.draft);
        self.messages.push(ChatMessage::user(text.clone()));
        self.typing = true;
        Ok(Some(text))
    }

    /// A reply fragment arrived. The first one creates the model message;
    /// later ones extend it.
    pub fn on_fragment(&mut self, fragment: &str) {
        match self.streaming.and_then(|idx| self.messages.get_mut(idx)) {
            Some(message) => message.text.push_str(fragment),
            None => {
                self.messages.push(ChatMessage::model(fragment));
                self.streaming = Some(self.messages.len() - 1);
            }
        }
    }

    /// The reply finished; the in-flight message is released.
    pub fn on_turn_complete(&mut self) {
        self.streaming = None;
        self.typing = false;
    }

    /// The reply failed. Partial text stays; a system notice follows it.
    pub fn on_turn_failed(&mut self) {
        self.streaming = None;
        self.messages.push(ChatMessage::system(STREAM_ERROR_NOTICE));
        self.typing = false;
    }

    /// Guard and start ending the interview. Returns the transcript to
    /// send to the report request.
    pub fn begin_end_interview(&mut self) -> Result<String, ControllerError> {
        if self.status == SessionStatus::Completed {
            return Err(ControllerError::SessionCompleted);
        }
        if self.typing {
            return Err(ControllerError::TurnInFlight);
        }

        self.status = SessionStatus::Completed;
        self.typing = true;
        Ok(transcript(&self.messages))
    }

    pub fn on_report(&mut self, report: Report) {
        self.report = Some(report);
        self.typing = false;
    }

    fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }
}

/// Holds the listening flag for the duration of one capture.
struct ListeningGuard<'a> {
    state: &'a mut ChatState,
}

impl<'a> ListeningGuard<'a> {
    fn new(state: &'a mut ChatState) -> Self {
        state.set_listening(true);
        Self { state }
    }
}

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        self.state.set_listening(false);
    }
}

/// Drives one interview session.
pub struct InterviewController {
    client: InterviewClient,
    state: ChatState,
    dictation: BoxDictation,
}

impl InterviewController {
    pub fn new(client: InterviewClient, dictation: BoxDictation) -> Self {
        Self {
            client,
            state: ChatState::new(),
            dictation,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn configuration(&self) -> &InterviewConfiguration {
        self.client.configuration()
    }

    pub fn dictation_supported(&self) -> bool {
        self.dictation.is_supported()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.set_draft(text);
    }

    /// Start the session and show the interviewer's opening message.
    pub async fn open(&mut self) {
        let opening = self.client.start().await;
        info!(round = %self.client.configuration().round, "interview opened");
        self.state.on_opened(opening);
    }

    /// Send the current draft and stream the reply into the state.
    ///
    /// `on_update` is called after the user message is appended, after
    /// every fragment, and once the turn has settled.
    pub async fn send<F>(&mut self, mut on_update: F) -> Result<TurnOutcome, ControllerError>
    where
        F: FnMut(&ChatState),
    {
        let Some(text) = self.state.begin_turn()? else {
            return Ok(TurnOutcome::Ignored);
        };
        on_update(&self.state);

        let mut stream = match self.client.send_turn(&text) {
            Ok(stream) => stream,
            Err(e) => {
                self.state.on_turn_failed();
                on_update(&self.state);
                return Err(e.into());
            }
        };

        let mut failed = false;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    self.state.on_fragment(&fragment);
                    on_update(&self.state);
                }
                Err(e) => {
                    error!(error = %e, "interviewer reply failed");
                    failed = true;
                    break;
                }
            }
        }
        drop(stream);

        let outcome = if failed {
            self.state.on_turn_failed();
            TurnOutcome::Failed
        } else {
            self.state.on_turn_complete();
            TurnOutcome::Completed
        };
        on_update(&self.state);
        debug!(?outcome, messages = self.state.messages().len(), "turn settled");

        Ok(outcome)
    }

    /// Finish the interview and generate the feedback report.
    pub async fn end_interview(&mut self) -> Result<Report, ControllerError> {
        let transcript = self.state.begin_end_interview()?;
        info!(
            messages = self.state.messages().len(),
            "ending interview, generating report"
        );
        let report = self.client.generate_report(&transcript).await;
        self.state.on_report(report.clone());
        Ok(report)
    }

    /// Capture one dictated utterance and append it to the draft.
    ///
    /// Dropping the returned future stops listening: the backend's capture
    /// is abandoned, the listening flag is cleared and the draft is left
    /// as it was.
    pub async fn dictate(&mut self) -> Result<String, ControllerError> {
        if !self.dictation.is_supported() {
            return Err(ControllerError::DictationUnsupported);
        }

        let listening = ListeningGuard::new(&mut self.state);
        let result = self.dictation.listen().await;
        drop(listening);

        let transcript = result?.trim().to_string();
        self.state.append_to_draft(&transcript);
        Ok(transcript)
    }
}
