use std::time::Duration;

use crate::{
    app::canvas::Canvas,
    maze::{BitGrid, Cell, GridEvent, GridEventSink, Rgb15},
};

/// Turns grid state into pixels on a [`Canvas`].
pub struct Renderer<C: Canvas> {
    canvas: C,
    /// Number of plotted updates between presents during live rendering
    carves_per_frame: usize,
    /// Time to wait after each presented frame to make carving visible
    frame_delay: Duration,
    pending: usize,
    /// First I/O error hit while presenting from inside the event sink
    deferred_error: Option<std::io::Error>,
}

impl<C: Canvas> Renderer<C> {
    pub fn new(canvas: C, carves_per_frame: usize, frame_delay: Duration) -> Self {
        Self {
            canvas,
            carves_per_frame: carves_per_frame.max(1),
            frame_delay,
            pending: 0,
            deferred_error: None,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Repaints every grid cell: white where carved, background elsewhere.
    ///
    /// Rows are walked one 32-cell word at a time, and only the valid bits of a
    /// row's last word are scanned.
    pub fn render_all(&mut self, grid: &BitGrid) -> std::io::Result<()> {
        for y in 0..grid.height() {
            for (col, &word) in grid.row_words(y).iter().enumerate() {
                let base_x = col as u16 * BitGrid::WORD_BITS;
                let mut mask = 0x8000_0000u32;
                for offset in 0..grid.valid_bits(col) {
                    let color = Cell::from(word & mask != 0).color();
                    self.canvas.plot(base_x + offset, y, color);
                    mask >>= 1;
                }
            }
        }
        self.pending = 0;
        self.flush()
    }

    /// Presents anything still pending and reports an error deferred from
    /// live rendering, if any.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }
        self.canvas.present()
    }

    fn fill(&mut self, color: Rgb15) {
        let (width, height) = self.canvas.dimensions();
        for y in 0..height {
            for x in 0..width {
                self.canvas.plot(x, y, color);
            }
        }
    }

    fn present_frame(&mut self) {
        self.pending = 0;
        if self.deferred_error.is_some() {
            return;
        }
        match self.canvas.present() {
            Ok(()) => {
                if !self.frame_delay.is_zero() {
                    std::thread::sleep(self.frame_delay);
                }
            }
            Err(err) => {
                tracing::warn!("[render] failed to present frame: {}", err);
                self.deferred_error = Some(err);
            }
        }
    }
}

impl<C: Canvas> GridEventSink for Renderer<C> {
    fn send_event(&mut self, event: GridEvent) {
        match event {
            GridEvent::Cleared { .. } => {
                self.fill(Cell::Uncarved.color());
                self.present_frame();
            }
            GridEvent::Update { coord, cell } => {
                self.canvas.plot(coord.0, coord.1, cell.color());
                self.pending += 1;
                if self.pending >= self.carves_per_frame {
                    self.present_frame();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::canvas::FrameBuffer, config::GridConfig, maze::Position};

    /// Counts presents and can be told to fail them.
    struct CountingCanvas {
        frame: FrameBuffer,
        presents: usize,
        fail: bool,
    }

    impl Canvas for CountingCanvas {
        fn dimensions(&self) -> (u16, u16) {
            self.frame.dimensions()
        }

        fn plot(&mut self, x: u16, y: u16, color: Rgb15) {
            self.frame.plot(x, y, color);
        }

        fn present(&mut self) -> std::io::Result<()> {
            self.presents += 1;
            if self.fail {
                Err(std::io::Error::other("display gone"))
            } else {
                Ok(())
            }
        }
    }

    fn counting(width: u16, height: u16, fail: bool) -> CountingCanvas {
        CountingCanvas {
            frame: FrameBuffer::new(width, height),
            presents: 0,
            fail,
        }
    }

    #[test]
    fn test_render_all_matches_grid() {
        let mut grid = BitGrid::new(40, 3);
        grid.set_carved(0, 0, true);
        grid.set_carved(39, 2, true);
        let mut renderer = Renderer::new(FrameBuffer::new(40, 3), 1, Duration::ZERO);
        renderer.render_all(&grid).expect("frame buffers never fail");

        let frame = renderer.canvas();
        assert_eq!(frame.get(0, 0), Rgb15::WHITE);
        assert_eq!(frame.get(39, 2), Rgb15::WHITE);
        assert_eq!(frame.get(1, 0), Rgb15::BACKGROUND);
        assert_eq!(frame.count(Rgb15::WHITE), 2);
        assert_eq!(frame.count(Rgb15::BACKGROUND), 118);
    }

    #[test]
    fn test_live_rendering_matches_render_all() {
        let config = GridConfig {
            width: 50,
            height: 30,
            ..GridConfig::default()
        };
        let mut generator = config.build_generator(5);
        let mut live = Renderer::new(FrameBuffer::new(50, 30), 16, Duration::ZERO);
        generator.generate(&mut live).expect("no overflow");

        let mut full = Renderer::new(FrameBuffer::new(50, 30), 1, Duration::ZERO);
        full.render_all(generator.grid()).expect("frame buffers never fail");
        assert_eq!(live.canvas(), full.canvas());
        assert_eq!(
            live.canvas().count(Rgb15::WHITE),
            generator.grid().carved_count()
        );
    }

    #[test]
    fn test_presents_every_n_updates() {
        let mut renderer = Renderer::new(counting(8, 8, false), 3, Duration::ZERO);
        renderer.send_event(GridEvent::Cleared {
            width: 8,
            height: 8,
        });
        assert_eq!(renderer.canvas().presents, 1);
        for x in 0..7 {
            renderer.send_event(GridEvent::Update {
                coord: (x, 1),
                cell: Cell::Carved,
            });
        }
        assert_eq!(renderer.canvas().presents, 3);
        renderer.flush().expect("canvas does not fail");
        assert_eq!(renderer.canvas().presents, 4);
    }

    #[test]
    fn test_present_errors_are_deferred() {
        let mut generator = GridConfig {
            width: 16,
            height: 16,
            start: Some(Position::new(7, 7)),
            ..GridConfig::default()
        }
        .build_generator(2);
        let mut renderer = Renderer::new(counting(16, 16, true), 1, Duration::ZERO);
        generator.generate(&mut renderer).expect("no overflow");
        // Only the first failure is attempted during live rendering
        assert_eq!(renderer.canvas().presents, 1);
        assert!(renderer.render_all(generator.grid()).is_err());
        renderer.canvas_mut().fail = false;
        assert!(renderer.render_all(generator.grid()).is_ok());
    }
}
