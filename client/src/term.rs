//! Crossterm terminal front end.
//!
//! One viewport unit is one terminal cell: a [`Quad`] is drawn as a block
//! of blank cells with its colour as background. Console lines are printed
//! below the viewport.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use xs_core::Color;

use crate::colors;
use crate::render::{Quad, Renderer};

/// Maps a [`Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c.is_default() {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// A player command read from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Restart,
    Step,
    PrintMaze,
}

fn to_command(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Char(' ') => Some(Command::Step),
        KeyCode::Char('p') => Some(Command::PrintMaze),
        _ => None,
    }
}

/// Draws quads and console text to the terminal.
pub struct TermRenderer {
    out: Stdout,
    error: Option<io::Error>,
}

impl Default for TermRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TermRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            error: None,
        }
    }

    /// Enter raw mode and the alternate screen.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )
    }

    /// Print `lines` starting at terminal row `top`, each cleared to the end
    /// of the line first.
    pub fn draw_text(&mut self, top: u16, lines: &[String]) -> io::Result<()> {
        queue!(
            self.out,
            ResetColor,
            SetForegroundColor(to_ct_color(colors::CONSOLE_FG))
        )?;
        for (i, line) in lines.iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, top.saturating_add(i as u16)),
                terminal::Clear(ClearType::UntilNewLine),
                Print(line)
            )?;
        }
        queue!(self.out, ResetColor)
    }

    /// Write out everything queued since the last flush. Reports the first
    /// error hit while drawing quads, if any.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    /// Wait up to `timeout` for a key press and map it to a command.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = to_command(key) {
                    return Ok(Some(cmd));
                }
            }
        }
        Ok(None)
    }

    /// Restore the terminal. Errors are ignored.
    pub fn close(&mut self) {
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }

    fn fill(&mut self, quad: Quad) -> io::Result<()> {
        let x0 = quad.x.round().max(0.0) as u16;
        let y0 = quad.y.round().max(0.0) as u16;
        let x1 = (quad.x + quad.width).round().max(0.0) as u16;
        let y1 = (quad.y + quad.height).round().max(0.0) as u16;
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let blank = " ".repeat(usize::from(x1 - x0));
        queue!(self.out, SetBackgroundColor(to_ct_color(quad.color)))?;
        for y in y0..y1 {
            queue!(self.out, cursor::MoveTo(x0, y), Print(&blank))?;
        }
        Ok(())
    }
}

impl Renderer for TermRenderer {
    fn draw_quad(&mut self, quad: Quad) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.fill(quad) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn colors_map() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(colors::GOAL),
            CtColor::Rgb {
                r: 255,
                g: 85,
                b: 85
            }
        );
    }

    #[test]
    fn key_bindings() {
        let press = |c| to_command(key(c, KeyEventKind::Press));
        assert_eq!(press(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(press(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(press(KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(press(KeyCode::Char(' ')), Some(Command::Step));
        assert_eq!(press(KeyCode::Char('p')), Some(Command::PrintMaze));
        assert_eq!(press(KeyCode::Char('x')), None);
        assert_eq!(to_command(key(KeyCode::Char('q'), KeyEventKind::Release)), None);

        let mut ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press);
        ctrl_c.modifiers = KeyModifiers::CONTROL;
        assert_eq!(to_command(ctrl_c), Some(Command::Quit));
    }
}
