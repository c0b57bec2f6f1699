//! Interactive chat with a saved character.
//!
//! Replies come from the workbench's placeholder generator, one at a time.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod loop_runner;
