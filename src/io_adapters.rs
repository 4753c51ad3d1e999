use crate::command::{InputClosed, Prompt};
use std::collections::VecDeque;

/// Memory-backed prompt that answers from a fixed list of lines.
///
/// Every prompt shown is recorded so callers can check what was asked.
/// Once the lines run out each further read fails with [`InputClosed`].
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    lines: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that will answer with `lines`, in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Split `script` into lines, one answer per line.
    pub fn from_script(script: &str) -> Self {
        Self::new(script.lines())
    }

    /// Prompts shown so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.asked.push(prompt.to_string());
        self.lines.pop_front().ok_or_else(|| InputClosed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompt_answers_in_order_then_closes() {
        let mut prompt = ScriptedPrompt::from_script("first\n\nthird\n");

        assert_eq!(prompt.read_line("a: ").unwrap(), "first");
        assert_eq!(prompt.read_line("b: ").unwrap(), "");
        assert_eq!(prompt.read_line("c: ").unwrap(), "third");
        assert_eq!(prompt.remaining(), 0);

        let err = prompt.read_line("d: ").unwrap_err();
        assert!(err.is::<InputClosed>());
        assert_eq!(prompt.asked(), ["a: ", "b: ", "c: ", "d: "]);
    }
}
