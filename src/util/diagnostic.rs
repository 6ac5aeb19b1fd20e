//! User-facing diagnostic messages.
//!
//! Fatal input problems are reported with the root cause, the offending
//! inputs, and what to change.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages.
pub mod suggestions {
    pub const CHECK_CATALOGUE: &str =
        "Regenerate the framework api file; every record is `<class> <methods> <fields>` followed by `M`/`F` lines";

    pub const CHECK_SCOPE_FORMAT: &str =
        "Check the scope file against the JSON scope format (`classes`, `type`, `super`, `access`, `methods`, `fields`)";

    pub const CHECK_SCOPE: &str =
        "Make sure the scope file lists every release class the mapping refers to";

    pub const NARROW_PREFIXES: &str =
        "Narrow the release prefixes with `--release-prefix` or `[release] prefixes`";

    pub const EXCLUDE_RELEASE: &str =
        "Exclude one of the classes from the program scope before running the pass";
}

/// A fatal error message with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
    /// Input file the diagnostic refers to
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for a terminal, optionally with ANSI colors.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut output = format!("{}: {}\n", paint("1;31", "error"), self.message);

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push_str(&format!("\n{}: consider:\n", paint("1;32", "help")));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
