//! Prompts displayed to the user during a drill.

use anyhow::Result;
use srs_engine::Grade;
use std::io::stdin;
use std::io::stdout;
use std::io::Write;
use termion::event::Event;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;

/// Displays the given prompt and waits for a grade. Digits 0-3 and the initials of the grade
/// names are accepted. Returns `None` when the user quits with q or Ctrl-C.
pub fn grade(prompt: impl AsRef<str>) -> Result<Option<Grade>> {
    let mut stdout = stdout().into_raw_mode()?;
    write!(stdout, "{} [0-3] ", prompt.as_ref())?;
    stdout.flush()?;

    let stdin = stdin();

    for event in stdin.events() {
        let selection = match event? {
            Event::Key(Key::Char('q')) | Event::Key(Key::Ctrl('c')) => None,
            Event::Key(Key::Char(c)) => match key_grade(c) {
                Some(grade) => Some(grade),
                None => continue,
            },
            _ => continue,
        };

        match selection {
            Some(grade) => write!(stdout, "{grade}\r\n")?,
            None => write!(stdout, "\r\n")?,
        }
        stdout.flush()?;

        return Ok(selection);
    }

    Ok(None)
}

fn key_grade(c: char) -> Option<Grade> {
    match c {
        '0' | 'a' => Some(Grade::Again),
        '1' | 'h' => Some(Grade::Hard),
        '2' | 'g' => Some(Grade::Good),
        '3' | 'e' => Some(Grade::Easy),
        _ => None,
    }
}
