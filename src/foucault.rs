//! Foucault knife edge test simulator
//!
//! The knife edge sits in the observation plane at `R + z_offset`, rotated
//! by `phi` from vertical and shifted by `x_offset` along its own normal.
//! Surface zones whose reflected ray lands on the knife side of the edge
//! appear dark, the others bright; the transition traced across the
//! aperture is the shadow figure an optician reads during the test.

use indicatif::ProgressBar;
use rayon::prelude::*;
use roots::find_root_brent;
use serde::Serialize;

use crate::{
    builders::FoucaugramBuilder,
    pupil::{circle_polygon, PupilSampling},
    raytracing::{radial_intercept, transverse_intercept, PointCloud},
    surface::Conic,
    FromBuilder,
};

#[derive(Debug, thiserror::Error)]
pub enum FoucaultError {
    #[error("knife edge configuration must be finite, found z_offset={z_offset}mm, x_offset={x_offset}mm, phi={phi}rad")]
    Knife {
        z_offset: f64,
        x_offset: f64,
        phi: f64,
    },
}

/// Optical bench layout of the knife edge test
///
/// A meridional cross-section of the test geometry, all coordinates are
/// `[z, y]` pairs with the optical axis running horizontally: the point
/// source, the surface profile, the observation plane position with a few
/// marginal rays drawn up to it, and the knife silhouette with the
/// defocused spot radius in that plane.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub source: [f64; 2],
    pub mirror_profile: Vec<[f64; 2]>,
    pub plane_z: f64,
    pub rays: Vec<Vec<[f64; 2]>>,
    pub knife: Vec<[f64; 2]>,
    pub spot_radius: f64,
}

/// Foucault knife edge test
///
/// ```rust
/// use fors::{Builder, FromBuilder, Foucaugram};
/// let foucaugram = Foucaugram::builder()
///     .z_offset(8.)
///     .x_offset(-0.05)
///     .build()
///     .unwrap();
/// let bright = foucaugram.trace().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Foucaugram {
    pub(crate) conic: Conic,
    pub(crate) z_offset: f64,
    pub(crate) x_offset: f64,
    pub(crate) phi: f64,
    pub(crate) sampling: PupilSampling,
    pub(crate) invert: bool,
}
impl FromBuilder for Foucaugram {
    type ComponentBuilder = FoucaugramBuilder;
}
impl Foucaugram {
    /// Returns the surface under test
    pub fn conic(&self) -> &Conic {
        &self.conic
    }
    /// Returns the knife edge plane offset from the center of curvature \[mm\]
    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }
    /// Returns the knife edge lateral offset \[mm\]
    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }
    /// Returns the knife edge rotation from vertical \[rd\]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Returns the coordinate of the reflected ray along the knife normal
    ///
    /// `None` flags a ray that never reaches the knife edge plane.
    pub fn knife_coordinate(&self, x: f64, y: f64) -> crate::Result<Option<f64>> {
        let intercept = transverse_intercept(&self.conic, self.z_offset, x, y)?;
        Ok(intercept.map(|[lx, ly]| lx * self.phi.cos() + ly * self.phi.sin()))
    }

    /// Returns whether the aperture point `(x, y)` is shadowed by the
    /// knife edge
    pub fn mask(&self, x: f64, y: f64) -> crate::Result<Option<bool>> {
        Ok(self
            .knife_coordinate(x, y)?
            .map(|l_phi| l_phi < self.x_offset))
    }

    /// Traces the foucaugram
    ///
    /// Returns the bright aperture points, or the shadowed ones if the
    /// builder `invert` flag is set. Rays that miss the knife edge plane
    /// are dropped, an entirely degenerate geometry yields an empty cloud.
    pub fn trace(&self) -> crate::Result<PointCloud> {
        let points = self.sampling.points(self.conic.diameter());
        let shading = points
            .par_iter()
            .map(|&[x, y]| {
                self.mask(x, y)
                    .map(|blocked| blocked.map(|blocked| ([x, y], blocked)))
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let missed = shading.iter().filter(|s| s.is_none()).count();
        if missed > 0 {
            log::warn!("{} rays missed the knife edge plane", missed);
        }
        Ok(shading
            .into_iter()
            .flatten()
            .filter(|&(_, blocked)| blocked == self.invert)
            .map(|(point, _)| point)
            .collect())
    }

    /// Traces the shadow edge between the bright and dark aperture zones
    ///
    /// The classification sign changes are located on a polar grid, each
    /// crossing is refined with Brent root finding and the points are
    /// returned ordered by azimuth.
    pub fn shadow_boundary(&self) -> crate::Result<PointCloud> {
        let (rings, spokes) = match self.sampling {
            PupilSampling::Polar { rings, spokes } => (rings, spokes),
            _ => (512, 360),
        };
        let radius = self.conic.aperture_radius();
        let radii: Vec<f64> = (0..rings)
            .map(|j| radius * (j as f64 + 0.5) / rings as f64)
            .collect();
        let intercepts = radii
            .iter()
            .map(|&r| radial_intercept(&self.conic, self.z_offset, r))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let edge = |r: f64, cos_a: f64| -> f64 {
            radial_intercept(&self.conic, self.z_offset, r)
                .ok()
                .flatten()
                .map(|l| l * cos_a - self.x_offset)
                .unwrap_or(f64::NAN)
        };
        let mut boundary: Vec<(f64, f64, [f64; 2])> = Vec::new();
        // crossings along each spoke
        for k in 0..spokes {
            let theta = 2. * std::f64::consts::PI * k as f64 / spokes as f64;
            let cos_a = (theta - self.phi).cos();
            let mut previous: Option<(f64, f64)> = None;
            for (&r, &intercept) in radii.iter().zip(&intercepts) {
                let Some(l) = intercept else {
                    previous = None;
                    continue;
                };
                let value = l * cos_a - self.x_offset;
                if let Some((r0, v0)) = previous {
                    if v0 * value < 0. {
                        let root =
                            find_root_brent(r0, r, &|rr: f64| edge(rr, cos_a), &mut 1e-9f64)
                                .unwrap_or(0.5 * (r0 + r));
                        boundary.push((theta, root, [root * theta.cos(), root * theta.sin()]));
                    }
                }
                previous = Some((r, value));
            }
        }
        // crossings along each ring
        for (&r, &intercept) in radii.iter().zip(&intercepts) {
            let Some(l) = intercept else { continue };
            for k in 0..spokes {
                let t0 = 2. * std::f64::consts::PI * k as f64 / spokes as f64;
                let t1 = 2. * std::f64::consts::PI * (k + 1) as f64 / spokes as f64;
                let v0 = l * (t0 - self.phi).cos() - self.x_offset;
                let v1 = l * (t1 - self.phi).cos() - self.x_offset;
                if v0 * v1 < 0. {
                    let root = find_root_brent(
                        t0,
                        t1,
                        &|t: f64| l * (t - self.phi).cos() - self.x_offset,
                        &mut 1e-9f64,
                    )
                    .unwrap_or(0.5 * (t0 + t1));
                    let theta = root % (2. * std::f64::consts::PI);
                    boundary.push((theta, r, [r * theta.cos(), r * theta.sin()]));
                }
            }
        }
        boundary.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        Ok(boundary.into_iter().map(|(_, _, point)| point).collect())
    }

    /// Returns the closed knife silhouette polygon in the observation
    /// plane, rotated by `phi` and shifted by `x_offset`
    pub fn knife_polygon(&self) -> Vec<[f64; 2]> {
        let r = 1.5 * self.conic.aperture_radius();
        let mut point = [self.x_offset * self.phi.cos(), self.x_offset * self.phi.sin()];
        let mut points = Vec::with_capacity(6);
        points.push(point);
        let mut rad = self.phi + std::f64::consts::FRAC_PI_2;
        for step in [r, r, 2. * r, r] {
            point = [point[0] + step * rad.cos(), point[1] + step * rad.sin()];
            points.push(point);
            rad += std::f64::consts::FRAC_PI_2;
        }
        points.push(points[0]);
        points
    }

    /// Returns the radius of the defocused spot in the knife edge plane \[mm\]
    pub fn spot_radius(&self) -> f64 {
        (self.z_offset * self.conic.aperture_radius() / self.conic.curvature_radius()).abs()
    }

    /// Returns the optical bench layout, independent of the knife edge
    /// shadowing
    pub fn layout(&self) -> crate::Result<Layout> {
        let radius = self.conic.aperture_radius();
        let roc = self.conic.curvature_radius();
        let n = 64;
        let mirror_profile = (0..=n)
            .map(|i| {
                let y = -radius + self.conic.diameter() * i as f64 / n as f64;
                self.conic.sagitta_xy(0., y).map(|s| [s, y])
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut rays = Vec::new();
        for y in [-radius, 0., radius] {
            let mut ray = vec![[roc, 0.], [self.conic.sagitta_xy(0., y)?, y]];
            if let Some(l) = radial_intercept(&self.conic, self.z_offset, y.abs())? {
                ray.push([roc + self.z_offset, l * y.signum()]);
            }
            rays.push(ray);
        }
        Ok(Layout {
            source: [roc, 0.],
            mirror_profile,
            plane_z: roc + self.z_offset,
            rays,
            knife: self.knife_polygon(),
            spot_radius: self.spot_radius(),
        })
    }

    /// Traces one foucaugram per knife edge plane offset
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
impl std::fmt::Display for Foucaugram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "foucault test: {}, knife at dz={:.2}mm, dx={:.3}mm, phi={:.1}deg",
            self.conic,
            self.z_offset,
            self.x_offset,
            self.phi.to_degrees()
        )
    }
}
