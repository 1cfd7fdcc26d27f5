//! Human-readable rendering of compile failures.

use std::fmt::Write;

use super::sink::CompileFailure;

// ============================================================================
// Options
// ============================================================================

/// Display style for failure output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayStyle {
    /// Header plus location and fallback notes.
    #[default]
    Rich,
    /// One line: `path: error: message`.
    Short,
}

/// Options for controlling failure formatting.
///
/// # Example
///
/// ```
/// use transpile_overlay::diagnostic::{DisplayStyle, FailureFormat};
///
/// // Plain text (no ANSI colors) for logging
/// let opts = FailureFormat::plain();
///
/// // Short format for CI/IDE integration
/// let opts = FailureFormat::short();
///
/// let opts = FailureFormat::default()
///     .with_colored(false)
///     .with_style(DisplayStyle::Rich)
///     .with_timestamps(true);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FailureFormat {
    /// Whether to use ANSI colors in output.
    pub colored: bool,
    /// Display style.
    pub style: DisplayStyle,
    /// Whether to print when the attempt happened.
    pub timestamps: bool,
}

impl Default for FailureFormat {
    fn default() -> Self {
        Self {
            colored: true,
            style: DisplayStyle::Rich,
            timestamps: false,
        }
    }
}

impl FailureFormat {
    /// Create options for colored terminal output.
    pub fn colored() -> Self {
        Self::default()
    }

    /// Create options for plain text output (no ANSI colors).
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    /// Create options for short single-line output.
    pub fn short() -> Self {
        Self {
            colored: false,
            style: DisplayStyle::Short,
            timestamps: false,
        }
    }

    /// Set whether to use colors.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Set the display style.
    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    /// Set whether to include timestamps.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}

// ============================================================================
// Coloring
// ============================================================================

#[cfg(feature = "colored-diagnostics")]
fn colorize_error(text: &str) -> String {
    use owo_colors::OwoColorize;
    text.red().bold().to_string()
}

#[cfg(feature = "colored-diagnostics")]
fn colorize_note(text: &str) -> String {
    use owo_colors::OwoColorize;
    text.cyan().to_string()
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize_error(text: &str) -> String {
    text.to_owned()
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize_note(text: &str) -> String {
    text.to_owned()
}

fn paint(options: &FailureFormat, text: &str, f: fn(&str) -> String) -> String {
    if options.colored { f(text) } else { text.to_owned() }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a single failure.
pub fn format_failure(failure: &CompileFailure, options: &FailureFormat) -> String {
    let mut output = String::new();
    write_failure(&mut output, failure, options);
    output
}

/// Format several failures, separated the way the style expects.
pub fn format_failures<'a>(
    failures: impl IntoIterator<Item = &'a CompileFailure>,
    options: &FailureFormat,
) -> String {
    let mut output = String::new();
    for (i, failure) in failures.into_iter().enumerate() {
        if i > 0 && options.style == DisplayStyle::Rich {
            output.push('\n');
        }
        write_failure(&mut output, failure, options);
    }
    output
}

fn write_failure(output: &mut String, failure: &CompileFailure, options: &FailureFormat) {
    let label = paint(options, "error", colorize_error);
    match options.style {
        DisplayStyle::Short => {
            let _ = writeln!(output, "{}: {label}: {}", failure.source_path, failure.error);
        }
        DisplayStyle::Rich => {
            let _ = writeln!(output, "{label}[{}]: {}", failure.extension, failure.error);
            let _ = writeln!(
                output,
                "  --> {} (version {})",
                failure.source_path, failure.version
            );
            let note = paint(options, "= note", colorize_note);
            let _ = writeln!(
                output,
                "   {note}: serving last good output for {}",
                failure.compiled_path
            );
            if options.timestamps {
                let _ = writeln!(output, "   {note}: at {}", failure.at.to_rfc3339());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::diagnostic::TranspileError;

    fn failure() -> CompileFailure {
        CompileFailure {
            source_path: "/p/a.cof".into(),
            compiled_path: "/p/a.cof.ts".into(),
            extension: ".cof".into(),
            version: 2,
            error: TranspileError::failed("unexpected indent"),
            at: Utc::now(),
        }
    }

    #[test]
    fn test_short_format() {
        let text = format_failure(&failure(), &FailureFormat::short());
        assert_eq!(text, "/p/a.cof: error: unexpected indent\n");
    }

    #[test]
    fn test_rich_format_plain() {
        let text = format_failure(&failure(), &FailureFormat::plain());
        assert!(text.starts_with("error[.cof]: unexpected indent\n"));
        assert!(text.contains("--> /p/a.cof (version 2)"));
        assert!(text.contains("serving last good output for /p/a.cof.ts"));
        assert!(!text.contains("note: at"));
    }

    #[test]
    fn test_format_failures_separates_rich() {
        let failures = [failure(), failure()];
        let text = format_failures(&failures, &FailureFormat::plain());
        assert_eq!(text.matches("error[.cof]").count(), 2);
        assert!(text.contains("\n\nerror"));
    }
}
