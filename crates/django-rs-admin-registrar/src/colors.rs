//! ANSI colors for debug log lines.

/// The escape sequences used to highlight parts of a log line.
///
/// [`Palette::plain`] has every color empty, so formatting code can paint
/// unconditionally and get uncolored output when colors are off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Bright green, for model and admin class names.
    pub green: &'static str,
    /// Bright red, for exclusions.
    pub red: &'static str,
    /// Bright magenta, for application names.
    pub magenta: &'static str,
    /// Cyan, for the log prefix.
    pub cyan: &'static str,
    /// Resets all attributes.
    pub reset: &'static str,
}

impl Palette {
    /// A palette with no colors.
    pub const fn plain() -> Self {
        Self {
            green: "",
            red: "",
            magenta: "",
            cyan: "",
            reset: "",
        }
    }

    /// A palette of ANSI escape sequences.
    pub const fn ansi() -> Self {
        Self {
            green: "\x1b[1;32m",
            red: "\x1b[1;31m",
            magenta: "\x1b[1;35m",
            cyan: "\x1b[36m",
            reset: "\x1b[0m",
        }
    }

    /// Picks [`ansi`](Self::ansi) or [`plain`](Self::plain).
    pub const fn for_colored(colored: bool) -> Self {
        if colored {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    /// Returns `true` if this palette emits escape sequences.
    pub const fn is_colored(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Wraps `text` in `color` and a reset.
    pub fn paint(&self, color: &str, text: impl std::fmt::Display) -> String {
        format!("{color}{text}{}", self.reset)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}
