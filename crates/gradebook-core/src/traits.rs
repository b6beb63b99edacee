//! Collaborator seams for interactive entry.
//!
//! The core never touches the terminal directly: it asks a [`LineReader`] for
//! input and tells an [`EntryReporter`] what happened.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{EntryError, ScoreError};
use crate::model::{Exam, Question, Task};
use crate::results::ExamResult;

// ---------------------------------------------------------------------------
// Line reader
// ---------------------------------------------------------------------------

/// Source of operator input, one line at a time.
pub trait LineReader {
    /// Show `prompt` and return the next line without its line ending.
    /// Returns `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Line reader over any buffered input, echoing prompts to `output`.
pub struct PromptReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> LineReader for PromptReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Replays a fixed list of lines and records the prompts it was shown.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

// ---------------------------------------------------------------------------
// Entry reporter
// ---------------------------------------------------------------------------

/// Receives progress of a student's entry session.
pub trait EntryReporter {
    fn on_question(&self, exam: &Exam, question: &Question);
    fn on_rejected(&self, task: &Task, error: &ScoreError);
    fn on_recorded(&self, exam: &Exam, result: &ExamResult);
    fn on_aborted(&self, student_id: &str, error: &EntryError);
}

/// No-op entry reporter.
pub struct NoopReporter;

impl EntryReporter for NoopReporter {
    fn on_question(&self, _: &Exam, _: &Question) {}
    fn on_rejected(&self, _: &Task, _: &ScoreError) {}
    fn on_recorded(&self, _: &Exam, _: &ExamResult) {}
    fn on_aborted(&self, _: &str, _: &EntryError) {}
}
