//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output with echo, trailing prompt and carriage returns removed.
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure pattern found in the output, if any.
    pub failure_message: Option<String>,
}

impl Response {
    /// Build a response from raw shell output ending in `prompt`.
    pub fn from_raw(
        command: impl Into<String>,
        raw_result: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let command = command.into();
        let raw_result = raw_result.into();
        let (result, prompt) = normalize_output(&raw_result, &command);
        Self {
            command,
            result,
            raw_result,
            prompt,
            elapsed,
            failure_message: None,
        }
    }

    /// Mark the response as failed.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Split raw output into (body, prompt).
///
/// The first line is dropped when it is the echo of `command`; the last line
/// is always the prompt the read stopped at.
pub(crate) fn normalize_output(raw: &str, command: &str) -> (String, String) {
    let text = raw.replace('\r', "");

    let body = match text.split_once('\n') {
        Some((first, rest)) if first.trim_end().ends_with(command.trim()) => rest,
        Some(_) => text.as_str(),
        None => return (String::new(), text.trim().to_string()),
    };

    match body.rsplit_once('\n') {
        Some((output, prompt)) => (output.to_string(), prompt.trim().to_string()),
        None => (String::new(), body.trim().to_string()),
    }
}
