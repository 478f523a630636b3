//! Core units, constants, and shared primitives for the orbital payload calculator workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// One standard atmosphere (kPa).
    pub const ONE_ATM_KPA: f64 = 101.325;
    /// Specific gas constant of dry air (J/(kg·K)).
    pub const AIR_R_SPECIFIC: f64 = 287.058;
    /// Ratio of specific heats used for the speed of sound.
    pub const AIR_GAMMA: f64 = 1.4;
    /// Atmosphere depth of the reference body used to normalise body scales (m).
    pub const REFERENCE_ATMOSPHERE_DEPTH_M: f64 = 70_000.0;
    /// Radius of the reference body used to normalise body scales (m).
    pub const REFERENCE_RADIUS_M: f64 = 600_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert metric tons to kilograms.
    #[inline]
    pub fn tons_to_kg(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert kilonewtons to newtons.
    #[inline]
    pub fn kn_to_n(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }
}

/// Numeric guards shared by the solver crates.
pub mod numeric {
    /// Clamp that never panics on inverted bounds (`min` wins, like `max(min, min(max, v))`).
    #[inline]
    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        min.max(max.min(value))
    }
}

/// Piecewise-linear sample tables (engine Isp vs pressure, thrust curves, tabulated atmospheres).
pub mod curve {
    /// Monotonic `x → y` sample table evaluated by linear interpolation, clamped at both ends.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SampleCurve {
        xs: Vec<f64>,
        ys: Vec<f64>,
    }

    impl SampleCurve {
        /// Build a curve from paired samples. Pairs are sorted by `x`; non-finite pairs are dropped.
        pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
            let mut pairs: Vec<(f64, f64)> = points
                .into_iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (xs, ys) = pairs.into_iter().unzip();
            Self { xs, ys }
        }

        /// Build from two parallel slices, truncating to the shorter one.
        pub fn from_slices(xs: &[f64], ys: &[f64]) -> Self {
            Self::new(xs.iter().copied().zip(ys.iter().copied()))
        }

        /// Evaluate at `x`; returns `None` for an empty table.
        pub fn evaluate(&self, x: f64) -> Option<f64> {
            let (first, last) = (*self.xs.first()?, *self.xs.last()?);
            let x = x.max(first).min(last);
            for i in 0..self.xs.len() - 1 {
                if x <= self.xs[i + 1] {
                    let span = self.xs[i + 1] - self.xs[i];
                    let t = if span > 1e-12 { (x - self.xs[i]) / span } else { 0.0 };
                    return Some(self.ys[i] * (1.0 - t) + self.ys[i + 1] * t);
                }
            }
            self.ys.last().copied()
        }
    }
}
