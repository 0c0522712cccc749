//! Loading [`GameConfig`] values from TOML files.

use std::{
    fs,
    path::{Path as FsPath, PathBuf},
};

use path_defence_core::{Path, PathError};
use path_defence_world::GameConfig;
use thiserror::Error;

/// Failure to produce a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the configuration schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// The configured route cannot be walked.
    #[error("configured path is invalid")]
    InvalidPath(#[from] PathError),
    /// The field has no area to build on.
    #[error("field dimensions must be positive (received {width}x{height})")]
    InvalidField {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// A tuning value lies outside the range the rules can work with.
    #[error("{key} must be {expected} (received {value})")]
    OutOfRange {
        /// Dotted name of the offending key.
        key: &'static str,
        /// Configured value.
        value: f64,
        /// Accepted range.
        expected: &'static str,
    },
}

/// Accepted interval for a numeric tuning value.
#[derive(Clone, Copy, Debug)]
enum Range {
    /// Finite and strictly above zero.
    Positive,
    /// Finite and zero or above.
    NonNegative,
    /// Above zero, at most one.
    UnitOpen,
    /// Zero to one inclusive.
    UnitClosed,
}

impl Range {
    fn contains(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Self::Positive => value > 0.0,
                Self::NonNegative => value >= 0.0,
                Self::UnitOpen => value > 0.0 && value <= 1.0,
                Self::UnitClosed => (0.0..=1.0).contains(&value),
            }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Positive => "a finite value above zero",
            Self::NonNegative => "a finite value of zero or more",
            Self::UnitOpen => "within (0, 1]",
            Self::UnitClosed => "within [0, 1]",
        }
    }
}

/// Parses and validates a configuration from TOML text.
///
/// Omitted sections and keys keep their classic values.
pub fn parse(contents: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = toml::from_str(contents)?;
    validate(&config)?;
    Ok(config)
}

/// Reads the configuration at `path`, or the classic rules when `path` is `None`.
pub fn load(path: Option<&FsPath>) -> Result<GameConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    let _ = Path::new(config.path.clone())?;

    let (width, height) = (config.field.width, config.field.height);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ConfigError::InvalidField { width, height });
    }

    let combat = &config.combat;
    let checks = [
        ("combat.projectile_speed", f64::from(combat.projectile_speed), Range::Positive),
        ("combat.contact_radius", f64::from(combat.contact_radius), Range::Positive),
        ("combat.slow_factor", f64::from(combat.slow_factor), Range::UnitOpen),
        ("combat.freeze_chance", f64::from(combat.freeze_chance), Range::UnitClosed),
        (
            "waves.spawn_probability",
            f64::from(config.waves.spawn_probability),
            Range::UnitOpen,
        ),
        (
            "upgrades.sell_fraction",
            f64::from(config.upgrades.sell_fraction),
            Range::UnitOpen,
        ),
        (
            "placement.path_buffer",
            f64::from(config.placement.path_buffer),
            Range::NonNegative,
        ),
        (
            "placement.tower_spacing",
            f64::from(config.placement.tower_spacing),
            Range::NonNegative,
        ),
        (
            "economy.starting_lives",
            f64::from(config.economy.starting_lives),
            Range::Positive,
        ),
    ];
    for (key, value, range) in checks {
        if !range.contains(value) {
            return Err(ConfigError::OutOfRange {
                key,
                value,
                expected: range.describe(),
            });
        }
    }
    Ok(())
}
