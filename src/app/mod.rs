pub mod canvas;
pub mod renderer;

use std::{
    io::{Stdout, Write},
    time::Instant,
};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use rand::Rng;
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::{canvas::TerminalCanvas, renderer::Renderer},
    config::{Config, Mode},
    generators::{GenerationReport, Lcg, lcg::DEFAULT_SEED},
};

/// Outcome of waiting in the idle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartSignal {
    Start,
    Resize,
    Quit,
}

#[derive(Default)]
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Runs whichever mode the config selects.
    pub fn start(&self) -> std::io::Result<()> {
        match self.config.mode {
            Mode::Interactive => {
                let mut stdout = std::io::stdout();
                App::setup_terminal(&mut stdout)?;
                let result = self.run(&mut stdout);
                App::restore_terminal(&mut stdout)?;
                result
            }
            Mode::Headless { iterations } => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                self.run_headless(iterations, &mut out)
            }
        }
    }

    /// Main application loop: wait for a start signal, draw a blank field,
    /// carve a maze live, then repaint it and go back to waiting.
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let grid_config = &self.config.grid;
        let mut generator = grid_config.build_generator(self.config.seed.unwrap_or(DEFAULT_SEED));
        let mut renderer = Renderer::new(
            TerminalCanvas::new(grid_config.width, grid_config.height),
            self.config.carves_per_frame,
            self.config.frame_delay,
        );

        tracing::info!("Started main app loop");
        self.draw_status(stdout, "Press Enter to carve a maze, Esc to exit.", Color::Cyan)?;

        loop {
            match self.wait_for_start(generator.prng_mut())? {
                StartSignal::Quit => break,
                StartSignal::Resize => {
                    queue!(stdout, terminal::Clear(ClearType::All))?;
                    renderer.canvas_mut().invalidate();
                    renderer.flush()?;
                    continue;
                }
                StartSignal::Start => {}
            }

            if !self.fits_terminal()? {
                let (width, height) =
                    TerminalCanvas::required_size(grid_config.width, grid_config.height);
                let msg = format!(
                    "Terminal is too small, {}x{} needed. Resize it, or press Esc to exit.",
                    width, height
                );
                self.draw_status(stdout, &msg, Color::Yellow)?;
                continue;
            }

            tracing::debug!("[app loop] start signal, seed {}", generator.prng().seed());
            generator.clear(&mut renderer);
            renderer.render_all(generator.grid())?;

            let started = Instant::now();
            let result = generator.generate(&mut renderer);
            renderer.render_all(generator.grid())?;
            generator.finish();

            match result {
                Ok(report) => {
                    let msg = App::describe(&report, started);
                    self.draw_status(stdout, &msg, Color::Green)?;
                }
                Err(err) => {
                    let msg = format!("Maze abandoned: {}. Press Enter to retry.", err);
                    self.draw_status(stdout, &msg, Color::Red)?;
                }
            }
        }

        tracing::info!("Exiting main app loop");
        Ok(())
    }

    /// Generates `iterations` mazes without a terminal and prints each grid.
    /// The PRNG state carries over from one maze to the next.
    pub fn run_headless<W: Write>(&self, iterations: usize, out: &mut W) -> std::io::Result<()> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        tracing::info!("[headless] initial seed {}", seed);
        let mut generator = self.config.grid.build_generator(seed);

        for i in 1..=iterations {
            let started = Instant::now();
            let seed = generator.prng().seed();
            let result = generator.generate(&mut ());
            generator.finish();

            write!(out, "{}", generator.grid())?;
            match result {
                Ok(report) => writeln!(
                    out,
                    "maze {} (seed {}): {}",
                    i,
                    seed,
                    App::describe(&report, started)
                )?,
                Err(err) => writeln!(out, "maze {} (seed {}): {}", i, seed, err)?,
            }
        }
        out.flush()
    }

    fn describe(report: &GenerationReport, started: Instant) -> String {
        format!(
            "{} cells visited, peak stack depth {}, {:.2?}. Press Enter for another.",
            report.visited,
            report.peak_depth,
            started.elapsed()
        )
    }

    /// Idle loop. Every poll that does not bring a start signal advances the
    /// seed by one.
    fn wait_for_start(&self, prng: &mut Lcg) -> std::io::Result<StartSignal> {
        loop {
            if !event::poll(self.config.poll_interval)? {
                prng.tick();
                continue;
            }

            match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    match key_event.code {
                        KeyCode::Enter | KeyCode::Char(' ') => return Ok(StartSignal::Start),
                        KeyCode::Esc | KeyCode::Char('q') => {
                            tracing::debug!("[input loop] Esc key pressed, exiting");
                            return Ok(StartSignal::Quit);
                        }
                        _ => prng.tick(),
                    }
                }
                event::Event::Resize(_, _) => {
                    prng.tick();
                    return Ok(StartSignal::Resize);
                }
                _ => prng.tick(),
            }
        }
    }

    fn fits_terminal(&self) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (width, height) =
            TerminalCanvas::required_size(self.config.grid.width, self.config.grid.height);
        Ok(term_width >= width && term_height >= height)
    }

    /// Writes a message on the status row below the maze, cut to the terminal width.
    fn draw_status(&self, stdout: &mut Stdout, msg: &str, color: Color) -> std::io::Result<()> {
        let (term_width, term_height) = terminal::size()?;
        let row = TerminalCanvas::rows_for(self.config.grid.height).min(term_height.saturating_sub(1));
        let (msg, _) = msg.unicode_truncate(term_width as usize);
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
        )?;
        stdout.queue(style::PrintStyledContent(
            msg.with(color).attribute(Attribute::Bold),
        ))?;
        stdout.flush()
    }
}
