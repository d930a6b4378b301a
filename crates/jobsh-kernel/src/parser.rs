//! Command line splitting and job target parsing.
//!
//! The grammar is deliberately tiny: words are separated by spaces, a word
//! that starts with `'` runs to the next `'`, and a trailing word starting
//! with `&` asks for background execution.

use jobsh_types::JobId;

use crate::error::{JobError, JobResult};

/// A split command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Argument vector; `argv[0]` is the program or builtin name.
    pub argv: Vec<String>,
    /// True if the line ended with `&`.
    pub background: bool,
    /// The original line without its trailing newline, kept for display.
    pub cmdline: String,
}

/// Split a command line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let cmdline = line.trim_end_matches(['\n', '\r']).to_string();
    let mut argv = Vec::new();
    let mut rest = cmdline.as_str();

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if let Some(quoted) = rest.strip_prefix('\'') {
            // An unterminated quote drops the remainder of the line.
            let Some(end) = quoted.find('\'') else { break };
            argv.push(quoted[..end].to_string());
            rest = &quoted[end + 1..];
        } else {
            let end = rest.find(' ').unwrap_or(rest.len());
            argv.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }

    if argv.is_empty() {
        return None;
    }

    let background = argv.last().is_some_and(|last| last.starts_with('&'));
    if background {
        argv.pop();
    }
    if argv.is_empty() {
        return None;
    }

    Some(ParsedLine {
        argv,
        background,
        cmdline,
    })
}

/// Argument of `fg`/`bg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Bare digits: an OS process id.
    Pid(u32),
    /// `%` followed by digits: a job id.
    Job(JobId),
}

impl Target {
    /// Parse the argument of the builtin `cmd`.
    pub fn parse(cmd: &str, arg: Option<&str>) -> JobResult<Self> {
        let arg = arg.ok_or_else(|| JobError::MissingTarget(cmd.to_string()))?;
        let bad = || JobError::BadTarget(cmd.to_string());

        match arg.strip_prefix('%') {
            Some(digits) => parse_digits(digits).map(|id| Target::Job(JobId(id))).ok_or_else(bad),
            None => parse_digits(arg).map(Target::Pid).ok_or_else(bad),
        }
    }
}

/// Digits only: no sign, no whitespace, no empty string.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
