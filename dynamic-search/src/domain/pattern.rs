//! Compilation and editor feedback for the optional capture pattern.

use regex::Regex;

/// Outcome of compiling the configured pattern.
///
/// An invalid pattern yields `pattern: None` so searches run untransformed,
/// while `error` is shown to the user as configuration feedback.
#[derive(Debug, Clone, Default)]
pub struct PatternCompilation {
    pub pattern: Option<Regex>,
    pub error: Option<String>,
}

impl PatternCompilation {
    pub fn compile(source: &str) -> Self {
        if source.is_empty() {
            return Self::default();
        }

        match Regex::new(source) {
            Ok(pattern) => Self {
                pattern: Some(pattern),
                error: None,
            },
            Err(e) => Self {
                pattern: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Inline feedback shown under the pattern input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexFeedback {
    Empty,
    Valid,
    Invalid(String),
}

impl RegexFeedback {
    pub fn evaluate(input: &str) -> Self {
        if input.is_empty() {
            return RegexFeedback::Empty;
        }
        match Regex::new(input) {
            Ok(_) => RegexFeedback::Valid,
            Err(e) => RegexFeedback::Invalid(e.to_string()),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, RegexFeedback::Invalid(_))
    }

    pub fn message(&self) -> &str {
        match self {
            RegexFeedback::Empty => "Optional: Use capture groups (.*) to extract values",
            RegexFeedback::Valid => "Valid regex pattern",
            RegexFeedback::Invalid(error) => error,
        }
    }
}

/// Pattern input that only commits values which compile.
///
/// While the user is mid-edit on an invalid pattern, the last valid value
/// stays committed so running searches keep their transform.
#[derive(Debug, Clone)]
pub struct RegexField {
    input: String,
    committed: String,
    feedback: RegexFeedback,
}

impl RegexField {
    pub fn new(value: impl Into<String>) -> Self {
        let input = value.into();
        let feedback = RegexFeedback::evaluate(&input);
        let committed = if feedback.is_valid() {
            input.clone()
        } else {
            String::new()
        };
        Self {
            input,
            committed,
            feedback,
        }
    }

    /// Update the input. Returns the newly committed value when it compiles.
    pub fn edit(&mut self, value: impl Into<String>) -> Option<&str> {
        self.input = value.into();
        self.feedback = RegexFeedback::evaluate(&self.input);
        self.commit()
    }

    /// Sync on focus loss; commits only when the current input is valid.
    pub fn blur(&mut self) -> Option<&str> {
        self.commit()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn feedback(&self) -> &RegexFeedback {
        &self.feedback
    }

    fn commit(&mut self) -> Option<&str> {
        if !self.feedback.is_valid() {
            return None;
        }
        self.committed.clone_from(&self.input);
        Some(&self.committed)
    }
}
