//! Conic surface geometry
//!
//! The surface of revolution is parameterized by its vertex radius of
//! curvature `R`, its conic constant `K` and its clear aperture diameter
//! `D`. The sagitta (axial depth) at radial distance `r` from the vertex is
//!
//! ```text
//! s(r) = c r² / (1 + √(1 − (1+K) c² r²)) + A1 r⁴ ,  c = 1/R
//! ```
//!
//! where the quartic term carries an optional spherical aberration
//! coefficient. The conic constant classifies the shape:
//!  - `K > 0`: oblate spheroid,
//!  - `K = 0`: sphere,
//!  - `-1 < K < 0`: prolate spheroid,
//!  - `K = -1`: paraboloid,
//!  - `K < -1`: hyperboloid.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::builders::ConicBuilder;
use crate::FromBuilder;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("no real surface point at r={radius}mm, the conic extends only to r={limit}mm for the given curvature radius and conic constant")]
    ImaginarySurface { radius: f64, limit: f64 },
    #[error("surface diameter must be positive and finite, found {0}mm")]
    Diameter(f64),
    #[error("radius of curvature must be finite and nonzero, found {0}mm")]
    Curvature(f64),
    #[error("aperture semi-diameter {semi_diameter}mm exceeds the real extent {limit}mm of the conic surface")]
    Aperture { semi_diameter: f64, limit: f64 },
}
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Conic section eccentricity
///
/// An alternate parameterization of the conic constant, `K = -ε²`. An
/// imaginary eccentricity (an oblate spheroid) makes the conic constant
/// positive; it is resolved to a real `K` here so the surface math never
/// handles complex values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Eccentricity {
    Real(f64),
    Imaginary(f64),
}
impl Eccentricity {
    /// Returns the conic constant `K = -ε²`
    pub fn conic_constant(self) -> f64 {
        match self {
            Eccentricity::Real(e) => -e * e,
            Eccentricity::Imaginary(e) => e * e,
        }
    }
}
impl From<Eccentricity> for f64 {
    fn from(eccentricity: Eccentricity) -> Self {
        eccentricity.conic_constant()
    }
}

/// Conic surface of revolution
///
/// The component is built with [`ConicBuilder`]:
/// ```rust
/// use fors::{Builder, FromBuilder, Conic};
/// let mirror = Conic::builder()
///     .diameter(150.)
///     .curvature_radius(2400.)
///     .conic_cst(-1.)
///     .build()
///     .unwrap();
/// assert!(mirror.sagitta(0.).unwrap() == 0.);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conic {
    pub(crate) curvature_radius: f64,
    pub(crate) conic_cst: f64,
    pub(crate) diameter: f64,
    pub(crate) a1: f64,
}
impl FromBuilder for Conic {
    type ComponentBuilder = ConicBuilder;
}
impl Conic {
    /// Returns the vertex radius of curvature \[mm\]
    pub fn curvature_radius(&self) -> f64 {
        self.curvature_radius
    }
    /// Returns the conic constant
    pub fn conic_cst(&self) -> f64 {
        self.conic_cst
    }
    /// Returns the clear aperture diameter \[mm\]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
    /// Returns the aperture radius `D/2` \[mm\]
    pub fn aperture_radius(&self) -> f64 {
        0.5 * self.diameter
    }
    /// Returns the paraxial focal length `R/2` \[mm\]
    pub fn focal_length(&self) -> f64 {
        0.5 * self.curvature_radius
    }
    /// Returns the largest radial distance where the surface is real valued \[mm\]
    ///
    /// The limit is `|R|/√(1+K)` for `K > -1`; paraboloids and hyperboloids
    /// are unbounded.
    pub fn max_radius(&self) -> f64 {
        if self.conic_cst > -1. {
            self.curvature_radius.abs() / (1. + self.conic_cst).sqrt()
        } else {
            f64::INFINITY
        }
    }
    fn discriminant(&self, r: f64) -> Result<f64> {
        let c = self.curvature_radius.recip();
        let disc = 1. - (1. + self.conic_cst) * c * c * r * r;
        if disc < 0. {
            Err(SurfaceError::ImaginarySurface {
                radius: r,
                limit: self.max_radius(),
            })
        } else {
            Ok(disc)
        }
    }
    /// Returns the surface sagitta at radial distance `r` from the vertex \[mm\]
    pub fn sagitta(&self, r: f64) -> Result<f64> {
        let c = self.curvature_radius.recip();
        let disc = self.discriminant(r)?;
        Ok(c * r * r / (1. + disc.sqrt()) + self.a1 * r.powi(4))
    }
    /// Returns the surface sagitta at the aperture point `(x, y)` \[mm\]
    pub fn sagitta_xy(&self, x: f64, y: f64) -> Result<f64> {
        self.sagitta(x.hypot(y))
    }
    /// Returns the sagitta at each `[x, y]` aperture point \[mm\]
    pub fn sagittas(&self, points: &[[f64; 2]]) -> Result<Vec<f64>> {
        points
            .iter()
            .map(|&[x, y]| self.sagitta_xy(x, y))
            .collect()
    }
    /// Returns the radial surface slope `ds/dr` at radial distance `r`
    pub fn slope(&self, r: f64) -> Result<f64> {
        let c = self.curvature_radius.recip();
        let disc = self.discriminant(r)?;
        Ok(c * r / disc.sqrt() + 4. * self.a1 * r.powi(3))
    }
    /// Returns the unit surface normal at the aperture point `(x, y)`
    ///
    /// The normal is the analytic gradient of the surface equation, it
    /// points towards the center of curvature side of the surface.
    pub fn normal_xy(&self, x: f64, y: f64) -> Result<Vector3<f64>> {
        let r = x.hypot(y);
        if r == 0. {
            return Ok(Vector3::z());
        }
        let dsdr = self.slope(r)?;
        Ok(Vector3::new(-dsdr * x / r, -dsdr * y / r, 1.).normalize())
    }
}
impl std::fmt::Display for Conic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "conic: D={:.1}mm, RoC={:.1}mm, K={:.4}",
            self.diameter, self.curvature_radius, self.conic_cst
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;

    fn conic(roc: f64, k: f64, diameter: f64) -> Conic {
        Conic::builder()
            .curvature_radius(roc)
            .conic_cst(k)
            .diameter(diameter)
            .build()
            .unwrap()
    }

    /// Sagittal depths from Table 1 in Benjamin & Rosenblum, "Radii of
    /// Curvature and Sagittal Depths of Conic Sections", ICLC, Vol. 19,
    /// pp. 76-83, 1992, for a 7.80mm radius of curvature. Rows are full
    /// chords 2h of 1 to 12mm, columns are eccentricities 0.504i, 0, 0.45,
    /// 1 and 2.
    #[test]
    fn benjamin_rosenblum_table() {
        let eccentricities = [
            Eccentricity::Imaginary(0.504),
            Eccentricity::Real(0.),
            Eccentricity::Real(0.45),
            Eccentricity::Real(1.),
            Eccentricity::Real(2.),
        ];
        let table = [
            [1.0, 0.016, 0.016, 0.016, 0.016, 0.016],
            [2.0, 0.064, 0.064, 0.064, 0.064, 0.063],
            [3.0, 0.146, 0.146, 0.145, 0.144, 0.140],
            [4.0, 0.262, 0.261, 0.260, 0.256, 0.245],
            [5.0, 0.414, 0.412, 0.409, 0.401, 0.374],
            [6.0, 0.606, 0.600, 0.595, 0.577, 0.524],
            [7.0, 0.842, 0.829, 0.820, 0.785, 0.693],
            [8.0, 1.128, 1.104, 1.086, 1.026, 0.878],
            [9.0, 1.472, 1.429, 1.400, 1.298, 1.076],
            [10.0, 1.890, 1.813, 1.761, 1.603, 1.285],
            [11.0, 2.403, 2.269, 2.183, 1.939, 1.504],
            [12.0, 3.061, 2.816, 2.673, 2.308, 1.731],
        ];
        for (i, eccentricity) in eccentricities.into_iter().enumerate() {
            let surface = conic(7.8, eccentricity.conic_constant(), 12.);
            for row in &table {
                let r = 0.5 * row[0];
                let sag = surface.sagitta(r).unwrap();
                let reference = row[i + 1];
                assert!(
                    (sag - reference).abs() <= 3e-3 + 3e-3 * reference,
                    "sagitta({r}) = {sag} != {reference} for {eccentricity:?}"
                );
            }
        }
    }

    #[test]
    fn sagitta_vanishes_at_vertex() {
        for k in [-4., -1., -0.5, 0., 0.25] {
            assert_eq!(conic(7.8, k, 9.).sagitta(0.).unwrap(), 0.);
        }
    }

    #[test]
    fn sagitta_is_monotonic() {
        for k in [-1., -0.5, 0., 0.25] {
            let surface = conic(7.8, k, 9.);
            let mut previous = 0.;
            for i in 1..=100 {
                let r = 4.5 * i as f64 / 100.;
                let sag = surface.sagitta(r).unwrap();
                assert!(sag > previous, "sagitta not increasing at r={r} for K={k}");
                previous = sag;
            }
        }
    }

    #[test]
    fn sagitta_beyond_conic_extent() {
        let surface = conic(7.8, 0., 12.);
        assert!(matches!(
            surface.sagitta(8.),
            Err(SurfaceError::ImaginarySurface { .. })
        ));
    }

    #[test]
    fn negative_curvature_paraboloid() {
        let surface = conic(-2400., -1., 150.);
        let r: f64 = 50.;
        let expected = r * r / (2. * -2400f64);
        assert!((surface.sagitta(r).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn eccentricity_round_trip() {
        let direct = conic(7.8, -0.2025, 9.);
        let from_e = conic(7.8, Eccentricity::Real(0.45).into(), 9.);
        let oblate = conic(7.8, Eccentricity::Imaginary(0.504).into(), 9.);
        for i in 0..=10 {
            let r = 4.5 * i as f64 / 10.;
            assert!(
                (direct.sagitta(r).unwrap() - from_e.sagitta(r).unwrap()).abs() < 1e-12
            );
        }
        assert!((oblate.conic_cst() - 0.254016).abs() < 1e-9);
    }

    #[test]
    fn normal_matches_finite_difference() {
        let surface = conic(2400., -1., 150.);
        let (x, y) = (40., -25.);
        let n = surface.normal_xy(x, y).unwrap();
        let h = 1e-6;
        let dsdx =
            (surface.sagitta_xy(x + h, y).unwrap() - surface.sagitta_xy(x - h, y).unwrap())
                / (2. * h);
        let dsdy =
            (surface.sagitta_xy(x, y + h).unwrap() - surface.sagitta_xy(x, y - h).unwrap())
                / (2. * h);
        assert!((n.x / n.z + dsdx).abs() < 1e-6);
        assert!((n.y / n.z + dsdy).abs() < 1e-6);
        assert!((n.norm() - 1.).abs() < 1e-12);
    }

    #[test]
    fn vertex_normal_is_axial() {
        let surface = conic(2400., 0., 150.);
        assert_eq!(surface.normal_xy(0., 0.).unwrap(), Vector3::z());
    }
}
