//! Runtime configuration for the optional Monte Carlo cross-check.

use serde::{Deserialize, Serialize};

/// Env var enabling the cross-check (`"true"` to enable).
pub const VALIDATION_ENABLED_VAR: &str = "MONTE_CARLO_VALIDATION_ENABLED";
/// Env var holding the cross-check trial count.
pub const VALIDATION_SIMULATIONS_VAR: &str = "MONTE_CARLO_VALIDATION_SIMULATIONS";

/// Whether analytic opponent distributions are cross-checked by simulation, and how many
/// draws to run when they are. Passed explicitly to every call that uses it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub simulations: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            simulations: default_validation_simulations(),
        }
    }
}

fn default_validation_simulations() -> usize {
    1000
}

impl ValidationConfig {
    pub fn enabled(simulations: usize) -> Self {
        Self {
            enabled: true,
            simulations,
        }
    }

    /// Read from [`VALIDATION_ENABLED_VAR`] and [`VALIDATION_SIMULATIONS_VAR`].
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(VALIDATION_ENABLED_VAR).ok().as_deref(),
            std::env::var(VALIDATION_SIMULATIONS_VAR).ok().as_deref(),
        )
    }

    /// Build from raw variable values. Anything but `"true"` disables the cross-check; a
    /// missing, unparsable, or zero count falls back to the default.
    pub fn from_vars(enabled: Option<&str>, simulations: Option<&str>) -> Self {
        let enabled = enabled.map_or(false, |v| v.trim() == "true");
        let simulations = match simulations.map(|v| v.trim().parse::<usize>()) {
            None => default_validation_simulations(),
            Some(Ok(n)) if n > 0 => n,
            Some(_) => {
                log::warn!(
                    "Ignoring invalid {}, using {}",
                    VALIDATION_SIMULATIONS_VAR,
                    default_validation_simulations()
                );
                default_validation_simulations()
            }
        };
        Self {
            enabled,
            simulations,
        }
    }
}
