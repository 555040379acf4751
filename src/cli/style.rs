use ansi_term::{Colour, Style};

/// Applies terminal styling to output lines. Disabled painters return text untouched, which is
/// what tests and `--no-color` rely on.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(Colour::Cyan.normal(), text)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(Colour::Green.normal(), text)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(Colour::Yellow.normal(), text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(Colour::Red.bold(), text)
    }

    pub fn dimmed(&self, text: &str) -> String {
        self.paint(Style::new().dimmed(), text)
    }
}
