use std::io::{Stdout, Write};

use crossterm::{QueueableCommand, cursor, style};

use crate::maze::Rgb15;

/// A surface that takes one opaque color sample per pixel.
pub trait Canvas {
    /// Surface size as `(width, height)` in pixels.
    fn dimensions(&self) -> (u16, u16);

    /// Writes a single sample. Coordinates must be inside [`Canvas::dimensions`].
    fn plot(&mut self, x: u16, y: u16, color: Rgb15);

    /// Makes everything plotted so far visible.
    fn present(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// In-memory `width` x `height` sample buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    samples: Box<[Rgb15]>,
    width: u16,
    height: u16,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        FrameBuffer {
            samples: vec![Rgb15::BLACK; width as usize * height as usize].into_boxed_slice(),
            width,
            height,
        }
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) is outside the {}x{} frame",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Rgb15 {
        self.samples[self.ravel_index(x, y)]
    }

    pub fn count(&self, color: Rgb15) -> usize {
        self.samples.iter().filter(|&&c| c == color).count()
    }
}

impl Canvas for FrameBuffer {
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn plot(&mut self, x: u16, y: u16, color: Rgb15) {
        let idx = self.ravel_index(x, y);
        self.samples[idx] = color;
    }
}

/// Draws a frame buffer to the terminal with two pixels per character cell:
/// the upper half block takes the top pixel as foreground color and the bottom
/// pixel as background color.
pub struct TerminalCanvas {
    stdout: Stdout,
    frame: FrameBuffer,
    /// One flag per terminal row that changed since the last present.
    dirty_rows: Vec<bool>,
}

impl TerminalCanvas {
    pub const GLYPH: &'static str = "▀";
    /// Screen rows reserved below the image for status messages.
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new(width: u16, height: u16) -> Self {
        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                Self::GLYPH.width(),
                1,
                "The pixel glyph must occupy exactly one character width."
            );
        }

        let rows = Self::rows_for(height);
        TerminalCanvas {
            stdout: std::io::stdout(),
            frame: FrameBuffer::new(width, height),
            dirty_rows: vec![true; rows as usize],
        }
    }

    /// Terminal rows needed to show `height` pixels.
    pub fn rows_for(height: u16) -> u16 {
        height.div_ceil(2)
    }

    /// Terminal `(columns, rows)` needed for the image plus the status lines.
    pub fn required_size(width: u16, height: u16) -> (u16, u16) {
        (
            width,
            Self::rows_for(height).saturating_add(Self::NUM_STATUS_ROWS),
        )
    }

    /// Marks every row dirty so the next present redraws the full image.
    pub fn invalidate(&mut self) {
        self.dirty_rows.fill(true);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

impl Canvas for TerminalCanvas {
    fn dimensions(&self) -> (u16, u16) {
        self.frame.dimensions()
    }

    fn plot(&mut self, x: u16, y: u16, color: Rgb15) {
        self.frame.plot(x, y, color);
        self.dirty_rows[(y / 2) as usize] = true;
    }

    fn present(&mut self) -> std::io::Result<()> {
        let (width, height) = self.frame.dimensions();
        for (row, dirty) in self.dirty_rows.iter_mut().enumerate() {
            if !*dirty {
                continue;
            }
            *dirty = false;

            let top_y = row as u16 * 2;
            self.stdout.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..width {
                let top = self.frame.get(x, top_y);
                // An odd height leaves the last row without a bottom pixel
                let bottom = if top_y + 1 < height {
                    self.frame.get(x, top_y + 1)
                } else {
                    Rgb15::BLACK
                };
                self.stdout
                    .queue(style::SetForegroundColor(top.to_terminal_color()))?
                    .queue(style::SetBackgroundColor(bottom.to_terminal_color()))?
                    .queue(style::Print(Self::GLYPH))?;
            }
            self.stdout.queue(style::ResetColor)?;
        }
        self.stdout.flush()
    }
}
