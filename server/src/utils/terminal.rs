//! Terminal utility functions

/// Format a URL as a clickable terminal hyperlink if supported.
///
/// Uses OSC 8 escape sequences for terminals that support hyperlinks
/// (iTerm2, Windows Terminal, GNOME Terminal, VS Code terminal, etc.).
/// Falls back to plain colored text on unsupported terminals.
pub fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        // OSC 8 hyperlink: \x1b]8;;URL\x07TEXT\x1b]8;;\x07
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        // Plain colored text for unsupported terminals
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_preserves_url() {
        let url = "http://localhost:3000/v1/health";
        let result = terminal_link(url);
        assert!(result.contains(url));
    }

    #[test]
    fn test_terminal_link_colors_output() {
        let result = terminal_link("http://localhost:3000");
        assert!(result.contains("\x1b[36m"));
        assert!(result.contains("\x1b[0m"));
    }

    #[test]
    fn test_terminal_link_hyperlink_format() {
        let url = "http://test.local";
        let result = terminal_link(url);

        // If hyperlinks are supported, should have OSC 8 sequences
        if result.contains("\x1b]8;;") {
            assert!(result.contains(&format!("\x1b]8;;{}\x07", url)));
            assert!(result.contains("\x1b]8;;\x07"));
        } else {
            assert_eq!(result, format!("\x1b[36m{}\x1b[0m", url));
        }
    }
}
