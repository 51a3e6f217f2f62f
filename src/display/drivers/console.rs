// src/display/drivers/console.rs

//! Raw-mode terminal display.
//!
//! Puts stdin into non-canonical, no-echo mode so single key presses arrive
//! immediately, hides the cursor, and repaints the whole frame with cursor
//! positioning sequences on every `present`. Frames larger than the terminal
//! are cropped around their center; smaller ones are centered.

use crate::color::Layer;
use crate::display::{Display, InputEvent};
use crate::keys::KeySymbol;
use crate::rasterizer::Frame;
use crate::scene::FrameStyle;

use anyhow::{Context, Result};
use libc::{winsize, STDIN_FILENO, STDOUT_FILENO, TIOCGWINSZ};
use std::io::{self, Read, Write};
use std::mem;
use std::os::unix::io::RawFd;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use log::{debug, info, trace, warn};

const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const SGR_PREFIX: &str = "\x1b[";
const SGR_SUFFIX: char = 'm';
const SGR_SEPARATOR: char = ';';
const SGR_RESET_ALL: u16 = 0;
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";

/// What the screen was last painted with. Any change forces a full clear,
/// since a smaller or shifted frame does not overwrite every old cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PaintState {
    style: FrameStyle,
    frame_dims: (usize, usize),
    viewport: Option<(usize, usize)>,
}

impl PaintState {
    fn needs_repaint(previous: Option<&PaintState>, next: &PaintState) -> bool {
        previous != Some(next)
    }
}

pub struct ConsoleDisplay {
    original_termios: Option<Termios>,
    last_paint: Option<PaintState>,
    input_buffer: [u8; 128],
    cleaned_up: bool,
}

impl ConsoleDisplay {
    pub fn new() -> Result<Self> {
        info!("Creating new ConsoleDisplay.");
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    "Failed to get initial termios: {}. Proceeding without raw mode.",
                    e
                );
                None
            }
        };

        if let Some(ref ots) = original_termios {
            let mut raw_termios = *ots;
            raw_termios.c_lflag &= !(ECHO | ICANON | ISIG);
            raw_termios.c_iflag &= !(libc::IXON | libc::ICRNL);
            raw_termios.c_cc[VMIN] = 0;
            raw_termios.c_cc[VTIME] = 0;
            tcsetattr(STDIN_FILENO, TCSANOW, &raw_termios)
                .context("ConsoleDisplay: Failed to set raw terminal attributes")?;
            debug!("ConsoleDisplay: Terminal set to raw mode.");
        }

        let mut stdout = io::stdout().lock();
        stdout
            .write_all(CURSOR_HIDE.as_bytes())
            .and_then(|_| stdout.flush())
            .context("ConsoleDisplay: Failed to hide cursor")?;

        Ok(ConsoleDisplay {
            original_termios,
            last_paint: None,
            input_buffer: [0u8; 128],
            cleaned_up: false,
        })
    }
}

impl Display for ConsoleDisplay {
    fn present(&mut self, frame: &Frame, style: &FrameStyle) -> Result<()> {
        let viewport = match get_terminal_size_cells(STDOUT_FILENO) {
            Ok(size) => size,
            Err(e) => {
                trace!("ConsoleDisplay: no terminal size ({}), drawing uncropped", e);
                None
            }
        };
        let paint = PaintState {
            style: *style,
            frame_dims: (frame.width(), frame.height()),
            viewport,
        };
        let repaint = PaintState::needs_repaint(self.last_paint.as_ref(), &paint);
        let out = compose_frame(frame, style, viewport, repaint);
        self.last_paint = Some(paint);

        let mut stdout = io::stdout().lock();
        stdout
            .write_all(out.as_bytes())
            .context("ConsoleDisplay: Failed to write frame")?;
        stdout
            .flush()
            .context("ConsoleDisplay: Failed to flush stdout during present")
    }

    fn poll_input(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        if !stdin_ready(STDIN_FILENO).context("ConsoleDisplay: Failed to poll stdin")? {
            return Ok(events);
        }

        match io::stdin().read(&mut self.input_buffer) {
            Ok(0) => {
                info!("ConsoleDisplay: EOF on stdin.");
                events.push(InputEvent::Closed);
            }
            Ok(bytes_read) => {
                trace!("ConsoleDisplay: Read {} bytes from stdin.", bytes_read);
                events.extend(
                    self.input_buffer[..bytes_read]
                        .iter()
                        .map(|&byte| InputEvent::Key(KeySymbol::from_byte(byte))),
                );
            }
            Err(ref e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                trace!("ConsoleDisplay: stdin read {:?}.", e.kind());
            }
            Err(e) => {
                return Err(e).context("ConsoleDisplay: Error reading from stdin");
            }
        }
        Ok(events)
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        info!("ConsoleDisplay: Cleaning up...");

        let original_termios = self.original_termios;
        let mut stdout = io::stdout().lock();
        restore_then_reset(
            || match original_termios {
                Some(ref ots) => {
                    debug!("ConsoleDisplay: Restoring original terminal attributes.");
                    tcsetattr(STDIN_FILENO, TCSANOW, ots).context(
                        "ConsoleDisplay: Failed to restore original terminal attributes",
                    )
                }
                None => Ok(()),
            },
            &mut stdout,
        )?;

        // Left set only on success so that Drop retries a failed cleanup.
        self.original_termios = None;
        self.cleaned_up = true;
        info!("ConsoleDisplay: Cleanup complete.");
        Ok(())
    }
}

impl Drop for ConsoleDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("ConsoleDisplay: cleanup on drop failed: {:#}", e);
        }
    }
}

/// Runs `restore` (the termios reset), then writes the SGR reset, screen
/// clear and cursor-show sequence to `out`. Both steps are always attempted;
/// the first error wins.
fn restore_then_reset<W: Write>(
    restore: impl FnOnce() -> Result<()>,
    out: &mut W,
) -> Result<()> {
    let restored = restore();
    let reset = write!(
        out,
        "{}{}{}{}{}",
        SGR_PREFIX, SGR_RESET_ALL, SGR_SUFFIX, CLEAR_SCREEN_AND_HOME, CURSOR_SHOW
    )
    .and_then(|_| out.flush())
    .context("ConsoleDisplay: Failed to restore cursor and colors");
    restored.and(reset)
}

/// Builds the escape-sequence stream that paints `frame`.
///
/// `viewport` is the terminal size in cells; `None` draws the frame at its
/// full size from the top-left corner. With `repaint` the screen is first
/// cleared in the style's background color.
pub fn compose_frame(
    frame: &Frame,
    style: &FrameStyle,
    viewport: Option<(usize, usize)>,
    repaint: bool,
) -> String {
    let (frame_w, frame_h) = (frame.width(), frame.height());
    let (view_w, view_h) = viewport.unwrap_or((frame_w, frame_h));

    let visible_cols = frame_w.min(view_w);
    let visible_rows = frame_h.min(view_h);
    let skip_cols = (frame_w - visible_cols) / 2;
    let skip_rows = (frame_h - visible_rows) / 2;
    let pad_left = view_w.saturating_sub(frame_w) / 2;
    let pad_top = view_h.saturating_sub(frame_h) / 2;

    let mut out = String::with_capacity((visible_cols + 16) * visible_rows + 32);

    let mut sgr_codes = vec![SGR_RESET_ALL];
    style.foreground.sgr_append(&mut sgr_codes, Layer::Foreground);
    style.background.sgr_append(&mut sgr_codes, Layer::Background);
    out.push_str(SGR_PREFIX);
    out.push_str(
        &sgr_codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(&SGR_SEPARATOR.to_string()),
    );
    out.push(SGR_SUFFIX);

    if repaint {
        out.push_str(CLEAR_SCREEN_AND_HOME);
    }

    for (i, row) in frame
        .rows()
        .skip(skip_rows)
        .take(visible_rows)
        .enumerate()
    {
        out.push_str(&format_cursor_position(pad_top + i + 1, pad_left + 1));
        out.extend(row.chars().skip(skip_cols).take(visible_cols));
    }
    out
}

/// CUP sequence for a 1-based `(row, col)`.
fn format_cursor_position(row: usize, col: usize) -> String {
    format!("\x1b[{};{}H", row, col)
}

/// Terminal size as `(cols, rows)`, or `None` when the terminal reports a
/// zero size (common for freshly created pseudo-terminals).
fn get_terminal_size_cells(fd: RawFd) -> Result<Option<(usize, usize)>> {
    // SAFETY: `ws` is a plain C struct that TIOCGWINSZ fills in.
    let mut ws: winsize = unsafe { mem::zeroed() };
    if unsafe { libc::ioctl(fd, TIOCGWINSZ, &mut ws) } == -1 {
        return Err(io::Error::last_os_error()).context("ioctl(TIOCGWINSZ) failed");
    }
    if ws.ws_col == 0 || ws.ws_row == 0 {
        return Ok(None);
    }
    Ok(Some((ws.ws_col as usize, ws.ws_row as usize)))
}

/// Whether a read on `fd` would return immediately.
fn stdin_ready(fd: RawFd) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: one valid pollfd, zero timeout.
    let rc = unsafe { libc::poll(&mut pfd, 1, 0) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0 && pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0)
}
