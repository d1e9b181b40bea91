//! Ronchi ruling test simulator
//!
//! A ruling of `lines_per_mm` line pairs per millimeter sits in the plane
//! at `R + z_offset`, lines perpendicular to the x-axis (or to the `phi`
//! rotated axis). A surface zone is dark when its reflected ray lands on
//! an opaque line of the ruling and bright in between; for a sphere the
//! zones map linearly to the ruling so the fringes are straight and
//! equally spaced, any other conic bends them.

use indicatif::ProgressBar;
use rayon::prelude::*;
use roots::find_root_brent;

use crate::{
    builders::RonchigramBuilder,
    pupil::{circle_polygon, PupilSampling},
    raytracing::{radial_intercept, transverse_intercept, PointCloud},
    surface::Conic,
    FromBuilder,
};

#[derive(Debug, thiserror::Error)]
pub enum RonchiError {
    #[error("ruling frequency must be positive and finite, found {0} lp/mm")]
    Frequency(f64),
    #[error("ruling configuration must be finite, found z_offset={z_offset}mm, phi={phi}rad")]
    Ruling { z_offset: f64, phi: f64 },
}

/// Ronchi ruling test
///
/// ```rust
/// use fors::{Builder, FromBuilder, Ronchigram};
/// let ronchigram = Ronchigram::builder()
///     .lines_per_mm(133.)
///     .z_offset(4.)
///     .build()
///     .unwrap();
/// let fringes = ronchigram.trace().unwrap();
/// assert!(!fringes.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Ronchigram {
    pub(crate) conic: Conic,
    pub(crate) lines_per_mm: f64,
    pub(crate) z_offset: f64,
    pub(crate) phi: f64,
    pub(crate) sampling: PupilSampling,
    pub(crate) invert: bool,
}
impl FromBuilder for Ronchigram {
    type ComponentBuilder = RonchigramBuilder;
}
impl Ronchigram {
    /// Returns the surface under test
    pub fn conic(&self) -> &Conic {
        &self.conic
    }
    /// Returns the ruling frequency \[lp/mm\]
    pub fn lines_per_mm(&self) -> f64 {
        self.lines_per_mm
    }
    /// Returns the ruling plane offset from the center of curvature \[mm\]
    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    /// Returns the ruling order index the transverse coordinate falls in
    ///
    /// Index 0 is the opaque central band of the ruling, even and odd
    /// indices alternate between opaque lines and clear gaps.
    fn ruling_index(&self, l_phi: f64) -> u64 {
        (2. * self.lines_per_mm * l_phi.abs() + 0.5).trunc() as u64
    }

    /// Returns whether the aperture point `(x, y)` maps onto an opaque
    /// ruling line
    pub fn mask(&self, x: f64, y: f64) -> crate::Result<Option<bool>> {
        let intercept = transverse_intercept(&self.conic, self.z_offset, x, y)?;
        Ok(intercept.map(|[lx, ly]| {
            let l_phi = lx * self.phi.cos() + ly * self.phi.sin();
            self.ruling_index(l_phi) % 2 == 0
        }))
    }

    /// Traces the ronchigram
    ///
    /// Returns the aperture points mapping to the clear gaps of the
    /// ruling, or to the opaque lines if the builder `invert` flag is set.
    /// The default polar sampling replicates each ring azimuthally so the
    /// cloud size scales linearly with the spoke count; rays missing the
    /// ruling plane are dropped.
    pub fn trace(&self) -> crate::Result<PointCloud> {
        let points = self.sampling.points(self.conic.diameter());
        let shading = points
            .par_iter()
            .map(|&[x, y]| {
                self.mask(x, y)
                    .map(|opaque| opaque.map(|opaque| ([x, y], opaque)))
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let missed = shading.iter().filter(|s| s.is_none()).count();
        if missed > 0 {
            log::warn!("{} rays missed the ruling plane", missed);
        }
        Ok(shading
            .into_iter()
            .flatten()
            .filter(|&(_, opaque)| opaque == self.invert)
            .map(|(point, _)| point)
            .collect())
    }

    /// Returns the ruling silhouette in its own plane
    ///
    /// The aperture disk is projected onto the ruling plane, scaled by
    /// `|z_offset| / R`, and shaded with the ruling geometry alone (zero
    /// sagitta), the view an observer has of the ruling lines across the
    /// defocused spot.
    pub fn ruling_shadow(&self) -> crate::Result<PointCloud> {
        let scale = (self.z_offset / self.conic.curvature_radius()).abs();
        let projection = -self.z_offset / self.conic.curvature_radius();
        let points = self.sampling.points(self.conic.diameter());
        Ok(points
            .into_iter()
            .filter(|&[x, y]| {
                let l_phi = (x * self.phi.cos() + y * self.phi.sin()) * projection;
                (self.ruling_index(l_phi) % 2 == 0) == self.invert
            })
            .map(|[x, y]| [x * scale, y * scale])
            .collect())
    }

    /// Returns the radii where the fringe shading flips, along the ruling
    /// normal
    ///
    /// Each ruling line edge crossed by the transverse ray aberration is
    /// solved for with Brent root finding. For a sphere the radii come out
    /// equally spaced; a conic or aspheric surface spaces them
    /// nonuniformly, which is what bends its fringes.
    pub fn zone_boundaries(&self) -> crate::Result<Vec<f64>> {
        let rings = match self.sampling {
            PupilSampling::Polar { rings, .. } => rings.max(512),
            _ => 1024,
        };
        let radius = self.conic.aperture_radius();
        let radii: Vec<f64> = (0..rings)
            .map(|j| radius * (j as f64 + 0.5) / rings as f64)
            .collect();
        let intercepts = radii
            .iter()
            .map(|&r| radial_intercept(&self.conic, self.z_offset, r))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut boundaries = Vec::new();
        let mut previous: Option<(f64, u64)> = None;
        for (&r, &intercept) in radii.iter().zip(&intercepts) {
            let Some(l) = intercept else {
                previous = None;
                continue;
            };
            let index = self.ruling_index(l);
            if let Some((r0, index0)) = previous {
                if index != index0 {
                    let level = (2. * index.min(index0) as f64 + 1.) / (4. * self.lines_per_mm);
                    let root = find_root_brent(
                        r0,
                        r,
                        &|rr: f64| {
                            radial_intercept(&self.conic, self.z_offset, rr)
                                .ok()
                                .flatten()
                                .map(|l| l.abs() - level)
                                .unwrap_or(f64::NAN)
                        },
                        &mut 1e-9f64,
                    )
                    .unwrap_or(0.5 * (r0 + r));
                    boundaries.push(root);
                }
            }
            previous = Some((r, index));
        }
        Ok(boundaries)
    }

    /// Traces one ronchigram per ruling plane offset
    pub fn through_focus(&self, z_offsets: &[f64]) -> crate::Result<Vec<PointCloud>> {
        let bar = ProgressBar::new(z_offsets.len() as u64);
        let grams = z_offsets
            .par_iter()
            .map(|&z_offset| {
                let cloud = Self {
                    z_offset,
                    ..self.clone()
                }
                .trace();
                bar.inc(1);
                cloud
            })
            .collect();
        bar.finish_and_clear();
        grams
    }

    /// Returns the aperture outline, a closed polygon of the clear
    /// aperture circle
    pub fn aperture_outline(&self) -> Vec<[f64; 2]> {
        circle_polygon(self.conic.aperture_radius(), [0., 0.], 100)
    }
}
impl std::fmt::Display for Ronchigram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ronchi test: {}, ruling {:.3} lp/mm at dz={:.2}mm",
            self.conic, self.lines_per_mm, self.z_offset
        )
    }
}
