// Terminal seam: where the flows read lines and write output.
//
// `ConsoleTerminal` is the real one. Interactive sessions read through
// `dialoguer`; piped stdin falls back to plain line reads. Ctrl-C and end
// of input both come back as `Ok(None)`.

use crate::ui::Screen;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{self, Clear, ClearType},
};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, ErrorKind, IsTerminal, Stdout, Write};
use std::time::Duration;

const FALLBACK_WIDTH: usize = 80;

pub trait Terminal {
    /// Read one line of input. `None` means the operator interrupted or
    /// input ended.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn writer(&mut self) -> &mut dyn Write;

    fn screen(&self) -> Screen;

    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Spinner shown while a request is in flight.
    fn busy(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

pub struct ConsoleTerminal {
    stdout: Stdout,
    interactive: bool,
    color: bool,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        let stdout = io::stdout();
        let color = stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        ConsoleTerminal {
            interactive: io::stdin().is_terminal(),
            color,
            stdout,
        }
    }

    fn read_piped(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.stdout, "{prompt}: ")?;
        self.stdout.flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            writeln!(self.stdout)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !self.interactive {
            return self.read_piped(prompt);
        }
        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Ok(Some(line)),
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::UnexpectedEof) => {
                writeln!(self.stdout)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }

    fn screen(&self) -> Screen {
        let width = terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .unwrap_or(FALLBACK_WIDTH);
        Screen {
            width,
            color: self.color,
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.stdout.is_terminal() {
            execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn busy(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("    {spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
