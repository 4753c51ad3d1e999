use crate::command::{CommandFactory, InputClosed, Prompt};
use crate::config::Settings;
use crate::session::Session;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::debug;

const MENU_PROMPT: &str = "Select a number of option: ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The menu-driven phonebook shell.
///
/// Each cycle reloads the phonebook from disk, prints the menu, reads one
/// selection and runs the matching command. Commands that change the
/// phonebook write it back before returning.
///
/// Example
/// ```no_run
/// use phonebook::{Interpreter, Settings};
/// let mut shell = Interpreter::with_settings(Settings::default());
/// shell.repl().unwrap();
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories.
    pub fn new(settings: Settings, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            session: Session::new(settings),
            commands,
        }
    }

    /// Create an interpreter with the standard menu.
    pub fn with_settings(settings: Settings) -> Self {
        use crate::builtin::*;
        Self::new(
            settings,
            vec![
                Box::new(Factory::<Display>::default()),
                Box::new(Factory::<Add>::default()),
                Box::new(Factory::<Change>::default()),
                Box::new(Factory::<Find>::default()),
                Box::new(Factory::<Delete>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Print the menu built from the registered commands.
    pub fn write_menu(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "\nPhonebook Menu:")?;
        for factory in &self.commands {
            writeln!(out, "{}. {}", factory.key(), factory.title())?;
        }
        Ok(())
    }

    /// Run one menu selection, e.g. `"1"` or `"5 2"`.
    ///
    /// The first word picks the command; the rest become its arguments.
    pub fn run(&mut self, line: &str, prompt: &mut dyn Prompt, out: &mut dyn Write) -> Result<()> {
        let mut words = line.split_whitespace();
        let key = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(key, &args) {
                debug!(key, ?args, "running menu command");
                return cmd.execute(prompt, out, &mut self.session);
            }
        }
        writeln!(out, "Invalid choice. Please select again.")?;
        Ok(())
    }

    /// Drive the menu loop until the exit command runs or input closes.
    ///
    /// A phonebook file that cannot be read or parsed ends the loop with an error.
    pub fn run_session(&mut self, prompt: &mut dyn Prompt, out: &mut dyn Write) -> Result<()> {
        while !self.session.should_exit {
            self.session
                .store
                .reload()
                .context("load phonebook")?;
            self.write_menu(out)?;

            let step = prompt
                .read_line(MENU_PROMPT)
                .and_then(|line| self.run(&line, prompt, out));
            match step {
                Ok(()) => {}
                Err(e) if e.is::<InputClosed>() => {
                    writeln!(out, "\nExiting...")?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Interactive loop on the terminal, with line editing and history.
    pub fn repl(&mut self) -> Result<()> {
        let mut prompt = EditorPrompt {
            editor: DefaultEditor::new()?,
        };
        self.run_session(&mut prompt, &mut std::io::stdout())
    }
}

impl Default for Interpreter {
    /// Standard menu over `phonebook.json` with five records per page.
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

struct EditorPrompt {
    editor: DefaultEditor,
}

impl Prompt for EditorPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if prompt == MENU_PROMPT && !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(InputClosed.into()),
            Err(err) => Err(err.into()),
        }
    }
}
