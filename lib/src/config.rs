//! Limits used by the parsers and the balancers.
//!
//! All limits have defaults, so a configuration file only has to name the values it changes:
//! ```
//! use chembalance::BalancerConfig;
//!
//! let config = BalancerConfig::from_json_str(r#"{ "trial_max_coefficient": 20 }"#).unwrap();
//! assert_eq!(config.trial_max_coefficient, 20);
//! assert_eq!(config.trial_max_iterations, 10_000);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Limits of the formula parser, the equation parser and the trial-and-error search
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Longest formula (in characters, after normalization) that is parsed at all
    pub max_formula_length: usize,
    /// Largest atom count or group multiplier, also the cap on the total atom count of a molecule
    pub max_atoms_per_molecule: u32,
    /// Largest coefficient accepted in front of a compound in the input equation
    pub max_coefficient: u64,
    /// Ceiling of every coefficient tried by the trial-and-error search
    pub trial_max_coefficient: u64,
    /// Number of coefficient combinations the trial-and-error search may test
    pub trial_max_iterations: u64,
    /// A progress line is added to the step trace every this many iterations (0 disables it)
    pub trial_progress_interval: u64,
}
impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            max_formula_length: 100,
            max_atoms_per_molecule: 1000,
            max_coefficient: 1000,
            trial_max_coefficient: 15,
            trial_max_iterations: 10_000,
            trial_progress_interval: 1000,
        }
    }
}
impl BalancerConfig {
    /// Parses a (possibly partial) JSON configuration and validates it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Checks that no limit makes every input fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("max_formula_length", self.max_formula_length as u64),
            ("max_atoms_per_molecule", u64::from(self.max_atoms_per_molecule)),
            ("max_coefficient", self.max_coefficient),
            ("trial_max_coefficient", self.trial_max_coefficient),
            ("trial_max_iterations", self.trial_max_iterations),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }
}
