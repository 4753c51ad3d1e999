use crate::session::Session;
use anyhow::Result;
use std::io::Write;
use thiserror::Error;

/// Raised by a [`Prompt`] when no more input will arrive (end of file or Ctrl-C).
///
/// The interpreter treats it as a request to leave the menu loop.
#[derive(Debug, Error)]
#[error("input closed")]
pub struct InputClosed;

/// Source of interactive answers.
///
/// The REPL implements this on top of a line editor; tests and batch runs use
/// [`ScriptedPrompt`](crate::io_adapters::ScriptedPrompt).
pub trait Prompt {
    /// Show `prompt` and read one line, without its trailing newline.
    ///
    /// Returns [`InputClosed`] when the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Object-safe trait for any menu action the interpreter can run.
///
/// Implemented for every builtin via a blanket impl.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(
        self: Box<Self>,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()>;
}

/// Factory that tries to create a command from a menu key and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `key`.
pub trait CommandFactory {
    /// Menu key the user types to select this command, e.g. `"1"`.
    fn key(&self) -> &'static str;

    /// Title shown next to the key in the menu.
    fn title(&self) -> &'static str;

    /// Attempt to create a command instance for the provided key and arguments.
    fn try_create(&self, key: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
