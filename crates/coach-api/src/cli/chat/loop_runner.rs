//! Interview loop orchestration.
//!
//! Coordinates one or more interviews: setup wizard, provider creation,
//! opening question, the answer loop with streamed replies, slash commands,
//! and the feedback report. After a report the user may start over.

use std::time::Duration;

use anyhow::Context;
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use coach_core::interview::client::{InterviewClient, ModelSettings};
use coach_core::interview::controller::{
    CONNECT_FAILURE_NOTICE, ChatState, ControllerError, InterviewController, TurnOutcome,
};
use coach_infra::dictation::create_dictation;
use coach_types::chat::ChatRole;

use crate::cli::StartArgs;
use crate::cli::wizard::resolve_configuration;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand, Submission, compose_answer};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, preview};

const PREVIEW_CHARS: usize = 60;

/// How a single interview ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterviewEnd {
    /// A report was produced.
    Reported,
    /// The user left without a report.
    Quit,
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run interviews until the user declines another one.
pub async fn run_interview_loop(state: &AppState, args: StartArgs) -> anyhow::Result<()> {
    let renderer = ChatRenderer::new();
    let mut args = args;

    loop {
        let config = resolve_configuration(&args)?;
        let settings = state.provider_settings(args.model.as_deref());
        let provider = state
            .create_provider(&settings)
            .with_context(|| CONNECT_FAILURE_NOTICE)?;

        info!(
            provider = provider.name(),
            model = %settings.model,
            role = %config.role,
            round = %config.round,
            "starting interview"
        );

        let client = InterviewClient::new(provider, config, ModelSettings::from(&settings));
        let dictation = create_dictation(state.config.dictation.as_ref());
        let mut controller = InterviewController::new(client, dictation);

        let end = run_interview(&mut controller, &renderer, &settings.model).await?;
        if end == InterviewEnd::Quit {
            break;
        }

        let again = Confirm::new()
            .with_prompt("Start New Interview?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
        args = args.for_next_interview();
    }

    println!("\n  {}", style("Good luck with the real thing!").dim());
    Ok(())
}

/// Print messages appended since `cursor`, skipping the candidate's own
/// lines (already on screen from the prompt).
fn print_new_messages(state: &ChatState, renderer: &ChatRenderer, cursor: &mut usize) {
    for message in state.messages().iter().skip(*cursor) {
        if message.role != ChatRole::User {
            println!("{}", renderer.render_message(message));
        }
    }
    *cursor = state.messages().len();
}

async fn run_interview(
    controller: &mut InterviewController,
    renderer: &ChatRenderer,
    model: &str,
) -> anyhow::Result<InterviewEnd> {
    let dictation = controller.dictation_supported();
    print_welcome_banner(controller.configuration(), model, dictation);

    let opening = spinner("The interviewer is preparing...");
    controller.open().await;
    opening.finish_and_clear();

    let mut cursor = 0;
    print_new_messages(controller.state(), renderer, &mut cursor);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Interview abandoned.").dim());
                return Ok(InterviewEnd::Quit);
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Type /end for your report, or /exit to quit.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => text,
        };

        let typed = match commands::parse(&text) {
            Submission::Answer(typed) => typed,
            Submission::Command(cmd) => {
                match cmd {
                    ChatCommand::Help => commands::print_help(dictation),
                    ChatCommand::Clear => chat_input.clear(),
                    ChatCommand::Exit => {
                        println!("\n  {}", style("Interview abandoned.").dim());
                        return Ok(InterviewEnd::Quit);
                    }
                    ChatCommand::Draft => {
                        let draft = controller.state().draft();
                        if draft.is_empty() {
                            println!("\n  {}\n", style("(no draft)").dim());
                        } else {
                            println!("\n  {} {}\n", style("Draft:").bold(), draft);
                        }
                    }
                    ChatCommand::Dictate => {
                        dictate(controller, &mut chat_input).await;
                    }
                    ChatCommand::End => {
                        let waiting = spinner("Analyzing your interview...");
                        let result = controller.end_interview().await;
                        waiting.finish_and_clear();
                        match result {
                            Ok(report) => {
                                println!("{}", renderer.render_report(&report));
                                chat_input.flush();
                                return Ok(InterviewEnd::Reported);
                            }
                            Err(e) => print_controller_error(&e),
                        }
                    }
                    ChatCommand::Unknown(name) => {
                        println!(
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        );
                    }
                }
                continue;
            }
        };

        let answer = compose_answer(controller.state().draft(), typed);
        if answer.is_empty() {
            continue;
        }
        controller.set_draft(answer);

        let thinking = spinner("The interviewer is thinking...");
        let result = controller
            .send(|state| {
                if let Some(message) = state.streaming_message() {
                    thinking.set_message(preview(&message.text, PREVIEW_CHARS));
                }
            })
            .await;
        thinking.finish_and_clear();

        match result {
            Ok(TurnOutcome::Ignored) => {}
            Ok(TurnOutcome::Completed) => print_new_messages(controller.state(), renderer, &mut cursor),
            Ok(TurnOutcome::Failed) => {
                warn!("turn failed, partial reply kept");
                print_new_messages(controller.state(), renderer, &mut cursor);
            }
            Err(e) => {
                print_new_messages(controller.state(), renderer, &mut cursor);
                print_controller_error(&e);
            }
        }
    }
}

/// Listen for one answer. Any input on the prompt stops listening; a typed
/// line is kept in the draft.
async fn dictate(controller: &mut InterviewController, chat_input: &mut ChatInput) {
    if !controller.dictation_supported() {
        println!(
            "\n  {} {}\n",
            style("!").yellow().bold(),
            style("Speech recognition is not supported in this environment.").yellow()
        );
        return;
    }

    let listening = spinner("Listening... speak your answer (Enter or Ctrl+C to stop)");
    let outcome = tokio::select! {
        result = controller.dictate() => Ok(result),
        event = chat_input.read_line() => Err(event),
    };
    listening.finish_and_clear();

    match outcome {
        Ok(Ok(transcript)) => {
            println!("\n  {} {}", style("Heard:").bold(), style(transcript).cyan());
            println!(
                "  {}\n",
                style("Press Enter to send, type to add more, or /draft to review.").dim()
            );
        }
        Ok(Err(e)) => print_controller_error(&e),
        Err(event) => {
            info!("dictation stopped from the prompt");
            if let InputEvent::Message(typed) = event {
                let draft = compose_answer(controller.state().draft(), &typed);
                controller.set_draft(draft);
            }
            println!("\n  {}\n", style("Stopped listening.").dim());
        }
    }
}

fn print_controller_error(error: &ControllerError) {
    println!("\n  {} {error}\n", style("!").red().bold());
}
