//! Interview session: persona prompts, the session client, the chat
//! controller, and the message rendering contract.

pub mod client;
pub mod controller;
pub mod display;
pub mod prompt;
