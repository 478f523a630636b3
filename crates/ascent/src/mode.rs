//! Estimate presets and user overrides for the loss model.

use std::fmt;
use std::str::FromStr;

/// Parameter preset for the loss model, from best case to worst case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EstimateMode {
    Optimistic,
    #[default]
    Normal,
    Pessimistic,
}

impl EstimateMode {
    /// Select the value matching this mode.
    pub fn pick<T>(self, optimistic: T, normal: T, pessimistic: T) -> T {
        match self {
            Self::Optimistic => optimistic,
            Self::Normal => normal,
            Self::Pessimistic => pessimistic,
        }
    }

    /// Default drag-area coefficient (multiplied by √wet tons).
    pub fn cda_coefficient(self) -> f64 {
        self.pick(0.50, 1.0, 1.5)
    }

    /// Reference turn-start speed (m/s) before body scaling.
    pub fn base_turn_speed(self) -> f64 {
        self.pick(55.0, 80.0, 95.0)
    }

    /// Sea-level TWR at which the auto turn speed is left unscaled.
    pub fn reference_twr(self) -> f64 {
        self.pick(1.4, 1.5, 1.6)
    }

    pub fn as_str(self) -> &'static str {
        self.pick("optimistic", "normal", "pessimistic")
    }
}

impl fmt::Display for EstimateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "normal" => Ok(Self::Normal),
            "pessimistic" => Ok(Self::Pessimistic),
            other => Err(format!("unknown estimate mode '{other}'")),
        }
    }
}

/// Mode plus optional manual values. `None` (or a non-positive value for the turn and
/// drag parameters) means "derive automatically".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LossModelConfig {
    pub mode: EstimateMode,
    pub gravity_loss_override: Option<f64>,
    pub atmospheric_loss_override: Option<f64>,
    pub attitude_loss_override: Option<f64>,
    pub turn_start_speed_m_s: Option<f64>,
    pub turn_start_altitude_m: Option<f64>,
    pub cda_coefficient: Option<f64>,
}

impl LossModelConfig {
    pub fn with_mode(mode: EstimateMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn manual_turn_speed(&self) -> Option<f64> {
        positive(self.turn_start_speed_m_s)
    }

    pub fn manual_turn_altitude(&self) -> Option<f64> {
        positive(self.turn_start_altitude_m)
    }

    pub fn manual_cda_coefficient(&self) -> Option<f64> {
        positive(self.cda_coefficient)
    }

    /// Drag coefficient actually flown: the manual value when set, else the mode default.
    pub fn effective_cda_coefficient(&self) -> f64 {
        self.manual_cda_coefficient()
            .unwrap_or_else(|| self.mode.cda_coefficient())
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
