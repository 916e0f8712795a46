use colored::{ColoredString, Colorize};

// (r, g, b)
pub const ACCENT: (u8, u8, u8) = (181, 101, 216); // #B565D8
pub const MUTED: (u8, u8, u8) = (135, 206, 235); // #87CEEB

pub fn accent(text: &str) -> ColoredString {
    let (r, g, b) = ACCENT;
    text.truecolor(r, g, b).bold()
}

pub fn muted(text: &str) -> ColoredString {
    let (r, g, b) = MUTED;
    text.truecolor(r, g, b)
}

/// Prints a diagnostic about the wrapper itself (never about the wrapped command).
pub fn print_error(message: &str) {
    eprintln!("{} {}", "raven-sh:".red().bold(), message);
}
