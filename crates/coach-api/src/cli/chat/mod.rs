//! Interactive mock-interview chat in the terminal.
//!
//! Implements the interview loop: opening question, streamed replies with a
//! live spinner preview, slash commands, dictation, and the final feedback
//! report. Entry point: `loop_runner::run_interview_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
