//! Colored message prefixes for stderr notes and errors.

use owo_colors::OwoColorize;

fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if stderr_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if stderr_colors() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if stderr_colors() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}
