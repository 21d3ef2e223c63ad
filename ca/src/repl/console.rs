//! Console - role-tagged conversation output

use std::io::{self, Write};

use colored::Colorize;

/// Writes the visible side of the conversation
pub struct Console<W> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Prompt shown before each user line
    pub fn user_prompt() -> String {
        format!("{}: ", "You".bright_blue())
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "Chat with Claude (use 'ctrl-c' to quit)")
    }

    /// Echo a user line that the terminal did not display
    pub fn user(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}{}", Self::user_prompt(), text)
    }

    pub fn assistant(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}: {}", "Claude".bright_yellow(), text)
    }

    /// Announce a tool call before it runs
    pub fn tool_call(&mut self, name: &str, input: &serde_json::Value) -> io::Result<()> {
        writeln!(self.out, "{}: {}({})", "tool".bright_green(), name, input)
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text.yellow())?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
