//! Aerodynamic drag: ideal-gas density, transonic drag rise, and drag area.

use payload_core::constants::{AIR_GAMMA, AIR_R_SPECIFIC};
use payload_orbits::CelestialBody;

/// Ambient conditions at one altitude. All zero outside the atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtmosphereSample {
    pub pressure_kpa: f64,
    pub temperature_k: f64,
    pub density_kg_m3: f64,
}

impl AtmosphereSample {
    /// Sample `body` at `altitude_m`; vacuum at or above the atmosphere depth.
    pub fn at(body: &CelestialBody, altitude_m: f64) -> Self {
        if !body.has_simulated_atmosphere() || altitude_m >= body.atmosphere_depth_m() {
            return Self::default();
        }
        let pressure_kpa = body.pressure_kpa(altitude_m).max(0.0);
        let temperature_k = body.temperature_k(altitude_m).max(0.0);
        Self {
            pressure_kpa,
            temperature_k,
            density_kg_m3: density(pressure_kpa, temperature_k),
        }
    }
}

/// Ideal-gas density (kg/m³) from pressure in kPa and temperature in K.
pub fn density(pressure_kpa: f64, temperature_k: f64) -> f64 {
    if temperature_k > 0.0 && pressure_kpa > 0.0 {
        pressure_kpa * 1000.0 / (AIR_R_SPECIFIC * temperature_k)
    } else {
        0.0
    }
}

/// Transonic drag-rise bump peaking at Mach 1.05; 1 when the temperature or speed is
/// too low to define a Mach number.
pub fn mach_multiplier(velocity_m_s: f64, temperature_k: f64) -> f64 {
    if temperature_k <= 0.0 || velocity_m_s <= 1.0 {
        return 1.0;
    }
    let sound_speed = (AIR_GAMMA * AIR_R_SPECIFIC * temperature_k).sqrt();
    if sound_speed <= 0.0 {
        return 1.0;
    }
    let dm = velocity_m_s / sound_speed - 1.05;
    1.0 + 1.4 * (-10.0 * dm * dm).exp()
}

/// Drag force (N).
pub fn drag_force(sample: &AtmosphereSample, velocity_m_s: f64, cda_m2: f64) -> f64 {
    0.5 * sample.density_kg_m3
        * velocity_m_s
        * velocity_m_s
        * cda_m2
        * mach_multiplier(velocity_m_s, sample.temperature_k)
}

/// Drag area (m²) for a vehicle of `wet_mass_t`, floored at 10 kg of mass.
pub fn drag_area(cda_coefficient: f64, wet_mass_t: f64) -> f64 {
    cda_coefficient * wet_mass_t.max(0.01).sqrt()
}
