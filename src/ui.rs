// Rendering helpers: banners, framed notice boxes and indented items.
// Everything writes into a `Write` sink so the flows can be rendered into
// a buffer in tests; colors are optional and purely cosmetic.

use crossterm::style::{style, Color, Stylize};
use std::io::{self, Write};

const MARGIN_LEFT: usize = 4;
const MIN_BOX_WIDTH: usize = 20;

const PRIMARY: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const SECONDARY: Color = Color::Rgb { r: 116, g: 151, b: 228 };
const HIGHLIGHTED: Color = Color::Rgb { r: 205, g: 214, b: 244 };
const SUCCESS: Color = Color::Rgb { r: 141, g: 191, b: 141 };
const ERROR: Color = Color::Rgb { r: 212, g: 122, b: 130 };
const WARNING: Color = Color::Rgb { r: 238, g: 234, b: 190 };
const INFO: Color = Color::Rgb { r: 116, g: 151, b: 228 };

/// Kind of framed notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Info,
    Success,
}

impl Tone {
    pub fn title(self) -> &'static str {
        match self {
            Tone::Error => "Erro",
            Tone::Warning => "Atenção",
            Tone::Info => "Info",
            Tone::Success => "Sucesso",
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Error => ERROR,
            Tone::Warning => WARNING,
            Tone::Info => INFO,
            Tone::Success => SUCCESS,
        }
    }
}

/// Output geometry and color capability of the current terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: usize,
    pub color: bool,
}

impl Screen {
    /// Uncolored screen of a fixed width.
    pub fn plain(width: usize) -> Self {
        Screen { width, color: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Centered title with an optional subtitle line.
    pub fn banner(&self, out: &mut dyn Write, title: &str, subtitle: &str) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.paint(&center(title, self.width), SECONDARY))?;
        if !subtitle.is_empty() {
            writeln!(out, "{}", self.paint(&center(subtitle, self.width), HIGHLIGHTED))?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Framed message box with the tone's default title.
    pub fn notice(&self, out: &mut dyn Write, tone: Tone, message: &str) -> io::Result<()> {
        self.framed(out, tone.title(), message, tone.color())
    }

    fn framed(&self, out: &mut dyn Write, title: &str, message: &str, color: Color) -> io::Result<()> {
        let inner = self
            .width
            .saturating_sub(4 + MARGIN_LEFT * 2)
            .max(MIN_BOX_WIDTH);
        let margin = " ".repeat(MARGIN_LEFT);

        let label = format!(" {title} ");
        let rule_len = (inner + 2).saturating_sub(label.chars().count() + 1);
        let top = format!("╭─{label}{}╮", "─".repeat(rule_len));
        writeln!(out, "{margin}{}", self.paint(&top, color))?;

        for line in message.split('\n').flat_map(|l| wrap_text(l, inner)) {
            let pad = " ".repeat(inner.saturating_sub(line.chars().count()));
            writeln!(
                out,
                "{margin}{} {}{pad} {}",
                self.paint("│", color),
                self.paint(&line, PRIMARY),
                self.paint("│", color)
            )?;
        }

        let bottom = format!("╰{}╯", "─".repeat(inner + 2));
        writeln!(out, "{margin}{}", self.paint(&bottom, color))
    }

    /// Indented line: `index. title: value`, where index and value are
    /// optional.
    pub fn item(
        &self,
        out: &mut dyn Write,
        index: Option<&str>,
        title: &str,
        value: Option<&str>,
    ) -> io::Result<()> {
        let mut line = match value {
            Some(value) => format!(
                "{}: {}",
                self.paint(title, PRIMARY),
                self.paint(value, SECONDARY)
            ),
            None => self.paint(title, PRIMARY),
        };
        if let Some(index) = index {
            line = format!("{} {line}", self.paint(&format!("{index}."), HIGHLIGHTED));
        }
        writeln!(out, "{}{line}", " ".repeat(MARGIN_LEFT))
    }

    /// Record marker used by listings, e.g. `[3]`.
    pub fn record(&self, out: &mut dyn Write, position: usize) -> io::Result<()> {
        writeln!(
            out,
            "{}{}",
            " ".repeat(MARGIN_LEFT),
            self.paint(&format!("[{position}]"), HIGHLIGHTED)
        )
    }

    /// Prompt label as shown before user input.
    pub fn prompt_label(&self, text: &str) -> String {
        format!("{}{}", " ".repeat(MARGIN_LEFT), self.paint(text, HIGHLIGHTED))
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    format!("{}{text}", " ".repeat(left))
}

/// Greedy word wrap. Words longer than `max_width` are split; an empty
/// input yields one empty line so blank lines survive in boxes.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            lines.extend(chars.chunks(max_width).map(|c| c.iter().collect::<String>()));
            continue;
        }
        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
