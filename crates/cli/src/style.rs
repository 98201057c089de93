//! Terminal styling for the hook's messages.
//!
//! Fatal errors go to stderr, so [`error`] checks colour support on stderr
//! rather than stdout.

use console::Style;

fn marked(marker: &str, style: Style, msg: &str) -> String {
    format!("{} {}", style.apply_to(marker), msg)
}

/// `✓ msg`, for a persisted passport.
pub fn success(msg: &str) -> String {
    marked("✓", Style::new().green(), msg)
}

/// `✗ msg`, for a fatal run. Meant for stderr.
pub fn error(msg: &str) -> String {
    marked("✗", Style::new().for_stderr().red(), msg)
}

/// `⚠ msg`, for notices that need the user to act.
pub fn warn(msg: &str) -> String {
    marked("⚠", Style::new().yellow(), msg)
}

/// Section banner such as `~Intermission~`.
pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Closing banner such as `~Done~`.
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Label/value line, e.g. `  User    alice`.
pub fn field(label: &str, value: &str) -> String {
    format!(
        "  {}{}",
        Style::new().bold().apply_to(format!("{:<8}", label)),
        Style::new().cyan().apply_to(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_pads_label() {
        console::set_colors_enabled(false);
        assert_eq!(field("User", "alice"), "  User    alice");
        assert_eq!(success("saved"), "✓ saved");
    }
}
