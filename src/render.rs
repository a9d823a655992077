use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

const FIELD_COLOR: Color = Color::Grey;

/// A surface that shows one whole frame at a time.
pub trait RenderTarget {
    fn present(&mut self, frame: &str) -> anyhow::Result<()>;
}

/// Frame recorder.
impl RenderTarget for Vec<String> {
    fn present(&mut self, frame: &str) -> anyhow::Result<()> {
        self.push(frame.to_owned());
        Ok(())
    }
}

/// Plain text output, one blank line between frames.
pub struct WriterTarget<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> WriterTarget<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderTarget for WriterTarget<W> {
    fn present(&mut self, frame: &str) -> anyhow::Result<()> {
        if self.frames > 0 {
            self.out.write_all(b"\n")?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}

/// Alternate-screen terminal surface. The frame is centered and clipped to
/// the terminal; an optional caption sits on the row below it.
pub struct TerminalTarget {
    out: io::Stdout,
    cols: u16,
    rows: u16,
    caption: Option<String>,
    dirty: bool,
    active: bool,
}

impl TerminalTarget {
    /// Takes over the terminal. Once the alternate screen is entered the
    /// target exists, so a failure after that point is undone by `Drop`.
    pub fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        let mut term = Self {
            out,
            cols: 0,
            rows: 0,
            caption: None,
            dirty: true,
            active: true,
        };
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        log::info!("terminal is {cols}x{rows}");
        term.resize(cols, rows);
        Ok(term)
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols || rows != self.rows {
            self.cols = cols;
            self.rows = rows;
            self.dirty = true;
        }
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        if caption != self.caption {
            self.caption = caption;
            self.dirty = true;
        }
    }
}

impl RenderTarget for TerminalTarget {
    fn present(&mut self, frame: &str) -> anyhow::Result<()> {
        let frame_h = frame.lines().count() as u16;
        let frame_w = frame.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let caption_rows = u16::from(self.caption.is_some());

        let x0 = self.cols.saturating_sub(frame_w) / 2;
        let y0 = self.rows.saturating_sub(frame_h + caption_rows) / 2;
        let visible_w = self.cols.saturating_sub(x0) as usize;

        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.dirty {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
            self.dirty = false;
        }
        queue!(self.out, SetForegroundColor(FIELD_COLOR))?;

        for (i, line) in frame.lines().enumerate() {
            let y = y0 + i as u16;
            if y >= self.rows {
                break;
            }
            let clipped: String = line.chars().take(visible_w).collect();
            queue!(self.out, cursor::MoveTo(x0, y), Print(clipped))?;
        }

        if let Some(caption) = &self.caption {
            let y = y0 + frame_h;
            if y < self.rows {
                let len = caption.chars().count() as u16;
                let cx = self.cols.saturating_sub(len) / 2;
                let clipped: String = caption.chars().take(self.cols as usize).collect();
                queue!(
                    self.out,
                    cursor::MoveTo(0, y),
                    Clear(ClearType::CurrentLine),
                    SetForegroundColor(Color::DarkGrey),
                    cursor::MoveTo(cx, y),
                    Print(clipped)
                )?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalTarget {
    fn drop(&mut self) {
        let _ = self.end();
    }
}
