// statlab/src/ui/output.rs
//! Styled messages on stderr and the startup banner.
//!
//! Colors are applied only when the target stream is a terminal.

use std::io::{self, Write};
use std::net::SocketAddr;

use is_terminal::IsTerminal;
use owo_colors::{AnsiColors, OwoColorize};

use statlab_core::{AppConfig, PageKind};

/// The logical kinds of message the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Header,
    Success,
    Info,
    Warn,
    Error,
}

impl MessageKind {
    pub fn color(self) -> AnsiColors {
        match self {
            MessageKind::Header => AnsiColors::BrightCyan,
            MessageKind::Success => AnsiColors::Green,
            MessageKind::Info => AnsiColors::White,
            MessageKind::Warn => AnsiColors::Yellow,
            MessageKind::Error => AnsiColors::Red,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Header | MessageKind::Success | MessageKind::Info => "",
            MessageKind::Warn => "Warning: ",
            MessageKind::Error => "Error: ",
        }
    }
}

/// Writes one message, colored when `enable_colors` is set.
pub fn print_message<W: Write>(
    writer: &mut W,
    kind: MessageKind,
    msg: &str,
    enable_colors: bool,
) -> io::Result<()> {
    let line = format!("{}{}", kind.prefix(), msg);
    if enable_colors {
        writeln!(writer, "{}", line.color(kind.color()))
    } else {
        writeln!(writer, "{}", line)
    }
}

fn to_stderr(kind: MessageKind, msg: &str) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = print_message(&mut io::stderr(), kind, msg, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    to_stderr(MessageKind::Warn, msg.as_ref());
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    to_stderr(MessageKind::Error, msg.as_ref());
}

/// Lines of the startup banner, uncolored.
pub fn banner_lines(addr: SocketAddr, config: &AppConfig) -> Vec<(MessageKind, String)> {
    let mut lines = vec![
        (MessageKind::Header, format!("statlab {}", env!("CARGO_PKG_VERSION"))),
        (MessageKind::Success, format!("Listening on http://{}", addr)),
        (
            MessageKind::Info,
            format!(
                "Sessions: {} | missing values: {:?} | alpha: {}",
                config.session.mode, config.analysis.missing_values, config.analysis.significance_level
            ),
        ),
    ];
    for page in PageKind::ALL {
        lines.push((MessageKind::Info, format!("  http://{}{}", addr, page.route())));
    }
    lines
}

/// Prints the startup banner to stderr.
pub fn print_banner(addr: SocketAddr, config: &AppConfig) {
    for (kind, line) in banner_lines(addr, config) {
        to_stderr(kind, &line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_escapes() {
        let mut buf = Vec::new();
        print_message(&mut buf, MessageKind::Error, "bad input", false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Error: bad input\n");
    }

    #[test]
    fn colored_output_wraps_message() {
        let mut buf = Vec::new();
        print_message(&mut buf, MessageKind::Success, "ok", true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("ok"));
    }

    #[test]
    fn banner_lists_every_page() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        let lines = banner_lines(addr, &AppConfig::default());
        assert!(lines.iter().any(|(_, l)| l == "Listening on http://127.0.0.1:3000"));
        assert!(lines.iter().any(|(_, l)| l.ends_with("/z_test_page")));
    }
}
