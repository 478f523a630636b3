//! Closed-form orbital mechanics for surface-to-orbit estimates.
//!
//! All quantities are SI (metres, m/s, m³/s²). Angles at the public surface are degrees.

/// Closed-form model used for the ideal surface-to-orbit delta-v.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdealDvModel {
    /// Energy-optimal lower bound from the surface; a single burn.
    EnergyOptimal,
    /// Surface-grazing Hohmann transfer, circularisation, then an apoapsis raise.
    HohmannStructured,
}

/// Ideal (lossless, non-rotating) delta-v from the surface to a target ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealAscent {
    pub total_dv: f64,
    pub model: IdealDvModel,
    /// Up to three burns; unused burns are zero.
    pub burns: [f64; 3],
}

impl IdealAscent {
    fn zero() -> Self {
        Self {
            total_dv: 0.0,
            model: IdealDvModel::HohmannStructured,
            burns: [0.0; 3],
        }
    }

    pub fn uses_energy_optimal_model(&self) -> bool {
        self.model == IdealDvModel::EnergyOptimal
    }
}

/// Geometry of the target ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitShape {
    pub periapsis_radius_m: f64,
    pub apoapsis_radius_m: f64,
    pub semi_major_axis_m: f64,
    pub eccentricity: f64,
}

impl OrbitShape {
    pub fn from_radii(periapsis_radius_m: f64, apoapsis_radius_m: f64) -> Self {
        let semi_major_axis_m = (periapsis_radius_m + apoapsis_radius_m) * 0.5;
        let eccentricity = if semi_major_axis_m > 0.0 {
            (apoapsis_radius_m - periapsis_radius_m) / (apoapsis_radius_m + periapsis_radius_m)
        } else {
            0.0
        };
        Self {
            periapsis_radius_m,
            apoapsis_radius_m,
            semi_major_axis_m,
            eccentricity,
        }
    }

    /// Speed at periapsis.
    pub fn periapsis_speed(&self, mu_m3_s2: f64) -> f64 {
        vis_viva_speed(mu_m3_s2, self.periapsis_radius_m, self.semi_major_axis_m)
    }
}

/// Vis-viva: speed at radius `r_m` on an orbit with semi-major axis `a_m`.
pub fn vis_viva_speed(mu_m3_s2: f64, r_m: f64, a_m: f64) -> f64 {
    (mu_m3_s2 * (2.0 / r_m - 1.0 / a_m)).max(0.0).sqrt()
}

/// Model selection boundary: `alpha < 1.5`, or `alpha <= 2.0` with `ecc < 0.1`, picks the
/// energy-optimal bound.
pub fn select_ideal_model(alpha: f64, eccentricity: f64) -> IdealDvModel {
    if alpha < 1.5 || (alpha <= 2.0 && eccentricity < 0.1) {
        IdealDvModel::EnergyOptimal
    } else {
        IdealDvModel::HohmannStructured
    }
}

/// Ideal delta-v from the surface (radius `r0_m`) to the ellipse `(r_pe_m, r_ap_m)`.
///
/// Degenerate geometry (periapsis below the surface, inverted apsides, non-positive μ)
/// yields an all-zero estimate.
pub fn ideal_surface_to_orbit(mu_m3_s2: f64, r0_m: f64, r_pe_m: f64, r_ap_m: f64) -> IdealAscent {
    if mu_m3_s2 <= 0.0 || r0_m <= 0.0 || r_pe_m < r0_m || r_ap_m < r_pe_m {
        return IdealAscent::zero();
    }
    let radius_sum = r_pe_m + r_ap_m;
    if radius_sum <= 0.0 {
        return IdealAscent::zero();
    }

    let alpha = radius_sum * 0.5 / r0_m;
    let eccentricity = (r_ap_m - r_pe_m) / radius_sum;
    let mu = mu_m3_s2;

    if select_ideal_model(alpha, eccentricity) == IdealDvModel::EnergyOptimal {
        let dv = (2.0 * mu * (1.0 / r0_m - 1.0 / radius_sum)).max(0.0).sqrt();
        return IdealAscent {
            total_dv: dv,
            model: IdealDvModel::EnergyOptimal,
            burns: [dv, 0.0, 0.0],
        };
    }

    const CIRCULAR_TOLERANCE: f64 = 1.0e-6;
    let circular = (r_ap_m - r_pe_m).abs() < CIRCULAR_TOLERANCE * radius_sum;

    let transfer = |r: f64| (mu / r0_m).sqrt() * (2.0 * r / (r0_m + r)).sqrt();
    let circularise =
        |r: f64| ((mu / r).sqrt() * (1.0 - (2.0 * r0_m / (r0_m + r)).sqrt())).max(0.0);

    let burns = if circular {
        [transfer(r_pe_m), circularise(r_pe_m), 0.0]
    } else {
        let raise = ((2.0 * mu * r_ap_m / (r_pe_m * radius_sum)).sqrt() - (mu / r_pe_m).sqrt())
            .max(0.0);
        [transfer(r_pe_m), circularise(r_pe_m), raise]
    };

    IdealAscent {
        total_dv: burns.iter().sum(),
        model: IdealDvModel::HohmannStructured,
        burns,
    }
}

/// Outcome of the launch-latitude versus target-inclination check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneChange {
    pub required: bool,
    /// Inclination folded into `[0, 90]`.
    pub effective_inclination_deg: f64,
    /// Inclination actually flown from the pad.
    pub launch_inclination_deg: f64,
    pub delta_v: f64,
}

/// Plane change needed to reach `inclination_deg` from `latitude_deg` at `orbital_speed`.
///
/// A launch can only reach inclinations of at least `|latitude|`; with half a degree of
/// slack, lower targets are flown at `|latitude|` (or its retrograde mirror) and corrected
/// with `2·v·sin(Δi/2)`.
pub fn plane_change(latitude_deg: f64, inclination_deg: f64, orbital_speed: f64) -> PlaneChange {
    let abs_lat = latitude_deg.abs();
    let effective = if inclination_deg > 90.0 {
        180.0 - inclination_deg
    } else {
        inclination_deg
    };

    let required = effective + 0.5 < abs_lat;
    if !required {
        return PlaneChange {
            required,
            effective_inclination_deg: effective,
            launch_inclination_deg: inclination_deg,
            delta_v: 0.0,
        };
    }

    let launch_inclination_deg = if inclination_deg > 90.0 {
        180.0 - abs_lat
    } else {
        abs_lat
    };
    let angle = (abs_lat - effective).to_radians();
    PlaneChange {
        required,
        effective_inclination_deg: effective,
        launch_inclination_deg,
        delta_v: 2.0 * orbital_speed * (angle * 0.5).sin(),
    }
}

/// Inertial delta-v once the launch site's rotation is accounted for.
///
/// Law of cosines between the ideal burn and the equatorial rotation vector projected on
/// the launch azimuth: prograde launches gain (assist), retrograde ones pay (penalty).
pub fn rotation_adjusted_dv(
    ideal_dv: f64,
    equatorial_speed: f64,
    latitude_deg: f64,
    launch_inclination_deg: f64,
) -> f64 {
    if equatorial_speed <= 0.0 {
        return ideal_dv;
    }
    let surface_speed = equatorial_speed * latitude_deg.to_radians().cos().abs();
    let cos_inc = launch_inclination_deg.to_radians().cos();
    let dv_sq = ideal_dv * ideal_dv - 2.0 * ideal_dv * equatorial_speed * cos_inc
        + surface_speed * surface_speed;
    dv_sq.max(0.0).sqrt()
}
