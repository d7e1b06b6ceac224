//! Raw-mode widgets: a type-to-filter list picker and hidden text input.
//!
//! Everything here blocks on terminal events, so callers run it on
//! `spawn_blocking`. Drawing goes to stderr to keep stdout for command output.

use std::io::{self, stderr, Write};
use std::ops::Range;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

/// Restores cooked mode when dropped, also on early returns and panics.
struct RawMode;

impl RawMode {
    /// Enable raw mode via crossterm.
    /// This disables line-buffering and echo on all supported platforms.
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // crossterm internally remembers the previous mode and restores it.
        let _ = disable_raw_mode();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    Picked { index: usize, filter: String },
    Cancelled,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Done(PickerResult),
}

/// Picker state, kept apart from the terminal so it can be driven by tests.
///
/// Rows are shown when they contain the filter (case-insensitive). With
/// `pin_first`, row 0 is the "new entry" row: always visible, and the filter
/// text goes along with it when chosen.
#[derive(Debug)]
struct PickerState<'a> {
    items: &'a [String],
    pin_first: bool,
    filter: String,
    cursor: usize,
}

impl<'a> PickerState<'a> {
    fn new(items: &'a [String], default_index: Option<usize>, pin_first: bool) -> Self {
        let cursor = default_index.filter(|i| *i < items.len()).unwrap_or(0);
        Self {
            items,
            pin_first,
            filter: String::new(),
            cursor,
        }
    }

    fn visible(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        (0..self.items.len())
            .filter(|&i| {
                (i == 0 && self.pin_first)
                    || needle.is_empty()
                    || self.items[i].to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn handle(&mut self, key: KeyEvent) -> Step {
        let visible = self.visible();
        match key.code {
            KeyCode::Esc => return Step::Done(PickerResult::Cancelled),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Step::Done(PickerResult::Cancelled)
            }
            KeyCode::Enter => {
                return match visible.get(self.cursor) {
                    Some(&index) => Step::Done(PickerResult::Picked {
                        index,
                        filter: self.filter.clone(),
                    }),
                    None => Step::Continue,
                }
            }
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < visible.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.cursor = 0;
            }
            KeyCode::Char(c) => {
                self.filter.push(c);
                // Jump to the first match rather than the "new" row.
                self.cursor = usize::from(self.pin_first && self.visible().len() > 1);
            }
            _ => {}
        }
        Step::Continue
    }
}

/// Rows of `len` to show so that `cursor` stays on screen with at most
/// `max_rows` rows.
fn window(len: usize, cursor: usize, max_rows: usize) -> Range<usize> {
    let max_rows = max_rows.max(1);
    if len <= max_rows {
        return 0..len;
    }
    let start = cursor.saturating_sub(max_rows - 1).min(len - max_rows);
    start..start + max_rows
}

/// List rows that fit under the filter line, leaving one line spare.
fn list_height() -> usize {
    let rows = terminal::size().map(|(_, rows)| rows).unwrap_or(24);
    usize::from(rows).saturating_sub(2).max(1)
}

/// Draws the picker and leaves the cursor at its top-left corner.
fn draw(
    out: &mut impl Write,
    placeholder: &str,
    state: &PickerState,
    max_rows: usize,
) -> io::Result<()> {
    let visible = state.visible();
    let shown = window(visible.len(), state.cursor, max_rows);
    queue!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::FromCursorDown),
        Print(format!("? {} › {}\r\n", placeholder, state.filter)),
    )?;
    for row in shown.clone() {
        let index = visible[row];
        if row == state.cursor {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(format!("> {}", state.items[index])),
                SetAttribute(Attribute::Reset),
                Print("\r\n"),
            )?;
        } else {
            queue!(out, Print(format!("  {}\r\n", state.items[index])))?;
        }
    }
    queue!(out, cursor::MoveUp(shown.len() as u16 + 1))?;
    out.flush()
}

/// Interactive list with a filter line. Arrow keys move, typing filters,
/// Enter picks, Esc cancels.
pub fn run_filtered_picker(
    items: &[String],
    placeholder: &str,
    default_index: Option<usize>,
    pin_first: bool,
) -> io::Result<PickerResult> {
    let mut state = PickerState::new(items, default_index, pin_first);
    let mut err = stderr();
    let _raw = RawMode::enable()?;

    let result = loop {
        draw(&mut err, placeholder, &state, list_height())?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Step::Done(result) = state.handle(key) {
                break result;
            }
        }
    };

    queue!(err, cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
    err.flush()?;
    Ok(result)
}

/// Reads a line without echo. `None` when the user pressed Esc or Ctrl+C.
pub fn read_hidden_line(prompt: &str) -> io::Result<Option<String>> {
    let mut err = stderr();
    queue!(err, Print(format!("{prompt}: ")))?;
    err.flush()?;

    let mut line = String::new();
    let outcome = {
        let _raw = RawMode::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => break Some(()),
                    KeyCode::Esc => break None,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break None
                    }
                    KeyCode::Backspace => {
                        line.pop();
                    }
                    KeyCode::Char(c) => line.push(c),
                    _ => {}
                }
            }
        }
    };
    queue!(err, Print("\r\n"))?;
    err.flush()?;
    Ok(outcome.map(|_| line))
}
