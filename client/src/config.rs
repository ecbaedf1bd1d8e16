//! Client configuration variables ("cvars").
//!
//! Values come from three layers applied in order: built-in defaults, the
//! config script ([`DEFAULT_CONFIG`]), then the command line. Both the
//! script and the command line speak the same `set <name> <value>` command;
//! on the command line commands are introduced with `+`:
//!
//! ```text
//! xs-client +set g_seed 42 +set g_stepInterval 100
//! ```

use std::fmt;

use xs_paths::Selection;

/// Config script loaded at start-up when present.
pub const DEFAULT_CONFIG: &str = "cfg/pathfinding.cfg";

/// Variable names in the order [`ClientConfig::write_config`] emits them.
pub const CVAR_NAMES: [&str; 12] = [
    "vid_width",
    "vid_height",
    "g_width",
    "g_height",
    "g_stepInterval",
    "g_seed",
    "g_maxAttempts",
    "g_branches",
    "g_greedy",
    "com_developer",
    "com_framerate",
    "r_headless",
];

/// Errors raised while applying configuration commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No variable has this name.
    UnknownVariable(String),
    /// The line is not a `set <name> <value>` command.
    BadCommand(String),
    /// The value does not parse as the variable's type or is out of range.
    InvalidValue { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable(name) => write!(f, "unknown variable \"{name}\""),
            Self::BadCommand(line) => write!(f, "malformed command \"{line}\""),
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value \"{value}\" for {name}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Typed store of every client variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// `vid_width`: viewport width in screen units.
    pub vid_width: u32,
    /// `vid_height`: viewport height in screen units.
    pub vid_height: u32,
    /// `g_width`: grid width in tiles.
    pub grid_width: i32,
    /// `g_height`: grid height in tiles.
    pub grid_height: i32,
    /// `g_stepInterval`: milliseconds of game time between search steps.
    pub step_interval: f64,
    /// `g_seed`: random seed, 0 for a fresh one each run.
    pub seed: u64,
    /// `g_maxAttempts`: rejection-sampling bound per placement.
    pub max_attempts: u32,
    /// `g_branches`: wall-branching iterations after generation.
    pub branches: u32,
    /// `g_greedy`: rank the frontier by goal estimate only.
    pub greedy: bool,
    /// `com_developer`: debug-level diagnostics.
    pub developer: bool,
    /// `com_framerate`: fixed game ticks per second.
    pub framerate: f64,
    /// `r_headless`: run the search to completion without a terminal.
    pub headless: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            vid_width: 64,
            vid_height: 18,
            grid_width: 32,
            grid_height: 18,
            step_interval: 250.0,
            seed: 0,
            max_attempts: xs_maze::mapgen::DEFAULT_MAX_ATTEMPTS,
            branches: 0,
            greedy: false,
            developer: false,
            framerate: 50.0,
            headless: false,
        }
    }
}

impl ClientConfig {
    /// Assign `value` to the variable `name`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "vid_width" => self.vid_width = parse_positive(value).ok_or_else(invalid)?,
            "vid_height" => self.vid_height = parse_positive(value).ok_or_else(invalid)?,
            "g_width" => self.grid_width = value.parse().map_err(|_| invalid())?,
            "g_height" => self.grid_height = value.parse().map_err(|_| invalid())?,
            "g_stepInterval" => {
                self.step_interval = value
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                    .ok_or_else(invalid)?
            }
            "g_seed" => self.seed = value.parse().map_err(|_| invalid())?,
            "g_maxAttempts" => self.max_attempts = value.parse().map_err(|_| invalid())?,
            "g_branches" => self.branches = value.parse().map_err(|_| invalid())?,
            "g_greedy" => self.greedy = parse_bool(value).ok_or_else(invalid)?,
            "com_developer" => self.developer = parse_bool(value).ok_or_else(invalid)?,
            "com_framerate" => {
                self.framerate = value
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite() && *v > 0.0)
                    .ok_or_else(invalid)?
            }
            "r_headless" => self.headless = parse_bool(value).ok_or_else(invalid)?,
            _ => return Err(ConfigError::UnknownVariable(name.to_string())),
        }
        Ok(())
    }

    /// Current value of the variable `name` in its textual form.
    pub fn get(&self, name: &str) -> Option<String> {
        let v = match name {
            "vid_width" => self.vid_width.to_string(),
            "vid_height" => self.vid_height.to_string(),
            "g_width" => self.grid_width.to_string(),
            "g_height" => self.grid_height.to_string(),
            "g_stepInterval" => self.step_interval.to_string(),
            "g_seed" => self.seed.to_string(),
            "g_maxAttempts" => self.max_attempts.to_string(),
            "g_branches" => self.branches.to_string(),
            "g_greedy" => bool_str(self.greedy).to_string(),
            "com_developer" => bool_str(self.developer).to_string(),
            "com_framerate" => self.framerate.to_string(),
            "r_headless" => bool_str(self.headless).to_string(),
            _ => return None,
        };
        Some(v)
    }

    /// Run one `set <name> <value>` command.
    pub fn command(&mut self, line: &str) -> Result<(), ConfigError> {
        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next(), words.next()) {
            (Some("set"), Some(name), Some(value), None) => self.set(name, value),
            _ => Err(ConfigError::BadCommand(line.trim().to_string())),
        }
    }

    /// Run a config script: one command per line, blank lines and `//`
    /// comments ignored.
    pub fn exec(&mut self, script: &str) -> Result<(), ConfigError> {
        for line in script.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            self.command(line)?;
        }
        Ok(())
    }

    /// Apply command-line arguments. Everything before the first `+` is
    /// ignored; each `+`-separated chunk after it is one command.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = args
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let Some(start) = line.find('+') else {
            return Ok(());
        };
        for cmd in line[start + 1..].split('+') {
            if cmd.trim().is_empty() {
                continue;
            }
            log::debug!("startup parameter: {}", cmd.trim());
            self.command(cmd)?;
        }
        Ok(())
    }

    /// Serialise every variable as a config script that [`exec`](Self::exec)
    /// reads back.
    pub fn write_config(&self) -> String {
        let mut out = String::new();
        for name in CVAR_NAMES {
            if let Some(v) = self.get(name) {
                out.push_str(&format!("set {name} {v}\n"));
            }
        }
        out
    }

    /// Frontier selection policy implied by `g_greedy`.
    pub fn selection(&self) -> Selection {
        if self.greedy {
            Selection::Greedy
        } else {
            Selection::FScore
        }
    }

    /// Diagnostic level implied by `com_developer`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.developer {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }

    /// Length of one fixed game tick in milliseconds.
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.framerate
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_positive(s: &str) -> Option<u32> {
    s.parse().ok().filter(|&v| v > 0)
}

fn bool_str(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}
