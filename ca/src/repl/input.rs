//! User input sources

use std::io::{self, BufRead};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// A source of user lines; `Ok(None)` means no more input
pub trait UserInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Whether the typed line is already visible to the user
    fn echoes_input(&self) -> bool {
        true
    }
}

/// Line editor for interactive terminals
pub struct ReadlineInput {
    editor: DefaultEditor,
}

impl ReadlineInput {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(io::Error::other)?;
        Ok(Self { editor })
    }
}

impl UserInput for ReadlineInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            // Ctrl+C and Ctrl+D both end the session
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("ReadlineInput::read_line: end of input");
                Ok(None)
            }
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

/// Plain line reader for piped input
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> UserInput for LineInput<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            debug!("LineInput::read_line: end of input");
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn echoes_input(&self) -> bool {
        false
    }
}
