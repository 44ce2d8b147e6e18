use std::io::{self, BufRead, Write};
use worklog_core::{Error, Prompter, Result};

/// Blocking stdin prompter backing `start` (description) and `resume`
/// (candidate selection).
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout()
            .flush()
            .map_err(|err| Error::Prompt(err.to_string()))?;
        let mut buf = String::new();
        io::stdin()
            .lock()
            .read_line(&mut buf)
            .map_err(|err| Error::Prompt(err.to_string()))?;
        Ok(buf.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Prompter for ConsolePrompter {
    fn read_description(&mut self) -> Result<String> {
        self.read_line("Task description: ")
    }

    fn pick(&mut self, candidates: &[String]) -> Result<usize> {
        for (index, candidate) in candidates.iter().enumerate() {
            println!("[{index}] {candidate}");
        }
        let answer = self.read_line("Resume which task? ")?;
        parse_selection(&answer, candidates.len())
    }
}

/// Turns the typed answer into an index, naming the valid range on failure.
/// Numeric but out-of-range answers are caught by the tracker.
fn parse_selection(answer: &str, len: usize) -> Result<usize> {
    answer.trim().parse::<usize>().map_err(|_| Error::Parse {
        input: answer.to_string(),
        reason: format!(
            "expected the number of a listed task, 0 to {}",
            len.saturating_sub(1)
        ),
    })
}
