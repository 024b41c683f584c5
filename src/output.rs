use std::io::{self, BufRead, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Interactive prompt writer for the `fill` command. Prompts go to stderr
/// so the filled template on stdout stays clean for piping.
pub struct Output {
    stderr: StandardStream,
}

impl Output {
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stderr: StandardStream::stderr(color_choice),
        }
    }

    /// Prompts for a value for the n-th pattern word occurrence and reads
    /// one non-empty line from stdin. Underscores in the word name are
    /// shown as spaces.
    pub fn prompt(&mut self, n: usize, name: &str) -> io::Result<String> {
        let label = name.replace('_', " ");
        loop {
            let _ = self
                .stderr
                .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
            write!(self.stderr, "({n}) {label}")?;
            let _ = self.stderr.reset();
            write!(self.stderr, ": ")?;
            self.stderr.flush()?;

            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input interrupted",
                ));
            }
            let value = line.trim_end_matches(['\r', '\n']).to_string();
            if value.is_empty() {
                writeln!(self.stderr, "Please enter a non-empty string")?;
                continue;
            }
            return Ok(value);
        }
    }
}
