use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    generators::{DEFAULT_STACK_CAPACITY, MazeGenerator},
    maze::Position,
};

pub const USAGE: &str = "\
Usage: pixmaze [OPTIONS]

Options:
  --width N             Grid width in pixels (default 240)
  --height N            Grid height in pixels (default 160)
  --start X,Y           Start cell (default: grid center)
  --stack N             Backtracking stack capacity (default 5000)
  --seed N              Initial PRNG seed (default 2, random when headless)
  --headless            Generate without a terminal and print the grid
  --iterations N        Number of headless generations (default 1)
  --frame-delay MS      Pause after each drawn frame (default 1)
  --carves-per-frame N  Cell updates between frames (default 64)
  --poll-interval MS    Idle input poll timeout (default 1)
  --log PATH            Log file (default pixmaze.log)
  --no-log              Disable logging
  --log-level LEVEL     trace, debug, info, warn or error (default info)
  --help                Show this message
";

/// Grid geometry and stack sizing for a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
    /// Defaults to [`Position::center`] when unset.
    pub start: Option<Position>,
    pub stack_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 160,
            start: None,
            stack_capacity: DEFAULT_STACK_CAPACITY,
        }
    }
}

impl GridConfig {
    pub const MIN_SIZE: u16 = 3;

    pub fn start(&self) -> Position {
        self.start
            .unwrap_or_else(|| Position::center(self.width, self.height))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < Self::MIN_SIZE || self.height < Self::MIN_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        let start = self.start();
        if start.x >= self.width || start.y >= self.height {
            return Err(ConfigError::StartOutOfBounds(start));
        }
        if self.stack_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                flag: "--stack",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn build_generator(&self, seed: u32) -> MazeGenerator {
        MazeGenerator::new(
            self.width,
            self.height,
            self.start(),
            self.stack_capacity,
            seed,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live terminal session, new maze on every start signal.
    Interactive,
    /// No terminal, print finished grids to stdout.
    Headless { iterations: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub grid: GridConfig,
    pub seed: Option<u32>,
    pub mode: Mode,
    /// Sleep after each presented frame during live rendering.
    pub frame_delay: Duration,
    /// Number of cell updates between presented frames.
    pub carves_per_frame: usize,
    /// Timeout for each idle input poll.
    pub poll_interval: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            seed: None,
            mode: Mode::Interactive,
            frame_delay: Duration::from_millis(1),
            carves_per_frame: 64,
            poll_interval: Duration::from_millis(1),
            log_file: Some(PathBuf::from("pixmaze.log")),
            log_level: tracing::Level::INFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    HelpRequested,
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
    GridTooSmall { width: u16, height: u16 },
    StartOutOfBounds(Position),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HelpRequested => write!(f, "{}", USAGE),
            ConfigError::UnknownFlag(flag) => write!(f, "unknown option '{}'", flag),
            ConfigError::MissingValue(flag) => write!(f, "option '{}' needs a value", flag),
            ConfigError::InvalidValue { flag, value } => {
                write!(f, "invalid value '{}' for '{}'", value, flag)
            }
            ConfigError::GridTooSmall { width, height } => write!(
                f,
                "grid {}x{} is too small, both sides must be at least {}",
                width,
                height,
                GridConfig::MIN_SIZE
            ),
            ConfigError::StartOutOfBounds(pos) => {
                write!(f, "start ({}, {}) is outside the grid", pos.x, pos.y)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_value<T: FromStr>(flag: &'static str, value: Option<String>) -> Result<T, ConfigError> {
    let value = value.ok_or(ConfigError::MissingValue(flag))?;
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { flag, value })
}

fn parse_position(flag: &'static str, value: Option<String>) -> Result<Position, ConfigError> {
    let value = value.ok_or(ConfigError::MissingValue(flag))?;
    let invalid = || ConfigError::InvalidValue {
        flag,
        value: value.clone(),
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<u16>().map_err(|_| invalid())?;
    let y = y.trim().parse::<u16>().map_err(|_| invalid())?;
    Ok(Position::new(x, y))
}

impl Config {
    /// Parses command-line arguments, excluding the executable name.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut headless = false;
        let mut iterations = 1;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--width" => config.grid.width = parse_value("--width", args.next())?,
                "--height" => config.grid.height = parse_value("--height", args.next())?,
                "--start" => config.grid.start = Some(parse_position("--start", args.next())?),
                "--stack" => config.grid.stack_capacity = parse_value("--stack", args.next())?,
                "--seed" => config.seed = Some(parse_value("--seed", args.next())?),
                "--headless" => headless = true,
                "--iterations" => iterations = parse_value("--iterations", args.next())?,
                "--frame-delay" => {
                    config.frame_delay =
                        Duration::from_millis(parse_value("--frame-delay", args.next())?)
                }
                "--carves-per-frame" => {
                    config.carves_per_frame = parse_value("--carves-per-frame", args.next())?
                }
                "--poll-interval" => {
                    config.poll_interval =
                        Duration::from_millis(parse_value("--poll-interval", args.next())?)
                }
                "--log" => {
                    config.log_file = Some(PathBuf::from(
                        args.next().ok_or(ConfigError::MissingValue("--log"))?,
                    ))
                }
                "--no-log" => config.log_file = None,
                "--log-level" => config.log_level = parse_value("--log-level", args.next())?,
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }

        if headless {
            config.mode = Mode::Headless { iterations };
        }
        config.carves_per_frame = config.carves_per_frame.max(1);
        config.grid.validate()?;
        Ok(config)
    }
}
