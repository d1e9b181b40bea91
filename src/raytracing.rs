//! Exact reflected ray geometry
//!
//! The test source sits at the center of curvature `(0, 0, R)` and the
//! observation plane (knife edge or ruling) at `z = R + z_offset`. A ray
//! aimed at the aperture point `(x, y)` hits the surface at `(x, y, s)`
//! and is reflected there with the analytic surface normal, so conic and
//! aspheric aberrations carry through exactly rather than to paraxial
//! order.

use std::{fs::File, path::Path};

use nalgebra::Vector3;
use serde::Serialize;

use crate::surface::Conic;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to create a new file")]
    File(#[from] std::io::Error),
    #[error("failed to serialize the point cloud to Pickle")]
    Pickle(#[from] serde_pickle::Error),
}
pub type Result<T> = std::result::Result<T, TraceError>;

/// Returns the `[x, y]` coordinates where the ray reflected at the
/// aperture point `(x, y)` pierces the observation plane
///
/// `None` flags a ray that never reaches the plane, a valid degenerate
/// geometry rather than an error.
pub fn transverse_intercept(
    conic: &Conic,
    z_offset: f64,
    x: f64,
    y: f64,
) -> crate::surface::Result<Option<[f64; 2]>> {
    let roc = conic.curvature_radius();
    let sagitta = conic.sagitta_xy(x, y)?;
    let normal = conic.normal_xy(x, y)?;
    let incident = Vector3::new(x, y, sagitta - roc);
    let reflected = incident - normal * (2. * incident.dot(&normal));
    let plane_z = roc + z_offset;
    if reflected.z == 0. {
        return Ok(None);
    }
    let t = (plane_z - sagitta) / reflected.z;
    if t <= 0. {
        return Ok(None);
    }
    Ok(Some([x + t * reflected.x, y + t * reflected.y]))
}

/// Returns the signed radial plane crossing of the meridional ray
/// reflected at radial distance `r`
pub fn radial_intercept(
    conic: &Conic,
    z_offset: f64,
    r: f64,
) -> crate::surface::Result<Option<f64>> {
    transverse_intercept(conic, z_offset, r, 0.).map(|intercept| intercept.map(|[lx, _]| lx))
}

/// Screen coordinates traced by a simulator
///
/// The coordinate pairs either sample an area (a foucaugram or ronchigram
/// point cloud) or follow a curve in order (a shadow boundary). The cloud
/// serializes to Pickle so the arrays can be handed over to an external
/// plotting collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointCloud {
    x: Vec<f64>,
    y: Vec<f64>,
}
impl PointCloud {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }
    pub fn push(&mut self, point: [f64; 2]) {
        self.x.push(point[0]);
        self.y.push(point[1]);
    }
    /// Returns the number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    /// Returns the x coordinates \[mm\]
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    /// Returns the y coordinates \[mm\]
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    /// Returns an iterator over the `[x, y]` pairs
    pub fn iter(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y])
    }
    /// Writes the coordinate arrays to a Pickle file
    pub fn to_pickle<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        serde_pickle::to_writer(&mut File::create(path.as_ref())?, self, Default::default())?;
        Ok(())
    }
}
impl From<Vec<[f64; 2]>> for PointCloud {
    fn from(points: Vec<[f64; 2]>) -> Self {
        points.into_iter().collect()
    }
}
impl FromIterator<[f64; 2]> for PointCloud {
    fn from_iter<T: IntoIterator<Item = [f64; 2]>>(iter: T) -> Self {
        let mut cloud = PointCloud::new();
        for point in iter {
            cloud.push(point);
        }
        cloud
    }
}
impl std::fmt::Display for PointCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} points", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, FromBuilder};

    fn sphere() -> Conic {
        Conic::builder()
            .diameter(150.)
            .curvature_radius(2400.)
            .build()
            .unwrap()
    }

    /// A sphere returns every ray through its center of curvature, the
    /// intercept at `R + z` is exactly `-x z / (R - s)`.
    #[test]
    fn sphere_intercept_is_analytic() {
        let conic = sphere();
        let z_offset = 5.;
        for r in [1., 20., 45.5, 75.] {
            let s = conic.sagitta(r).unwrap();
            let expected = -r * z_offset / (2400. - s);
            let [lx, ly] = transverse_intercept(&conic, z_offset, r, 0.)
                .unwrap()
                .unwrap();
            assert!((lx - expected).abs() < 1e-9, "r={r}: {lx} != {expected}");
            assert!(ly.abs() < 1e-12);
        }
    }

    #[test]
    fn sphere_refocuses_at_center_of_curvature() {
        let conic = sphere();
        let [lx, ly] = transverse_intercept(&conic, 0., 60., -33.)
            .unwrap()
            .unwrap();
        assert!(lx.hypot(ly) < 1e-9);
    }

    #[test]
    fn paraboloid_shows_spherical_aberration() {
        let conic = Conic::builder()
            .diameter(150.)
            .curvature_radius(2400.)
            .conic_cst(-1.)
            .build()
            .unwrap();
        let lx = radial_intercept(&conic, 0., 75.).unwrap().unwrap();
        assert!(lx.abs() > 1e-3);
    }

    #[test]
    fn plane_behind_the_mirror_is_never_reached() {
        let conic = sphere();
        assert!(transverse_intercept(&conic, -2410., 40., 0.)
            .unwrap()
            .is_none());
    }

    #[test]
    fn cloud_round_trip() {
        let cloud: PointCloud = vec![[0., 1.], [2., 3.]].into();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.iter().collect::<Vec<_>>(), vec![[0., 1.], [2., 3.]]);
        let path = std::env::temp_dir().join("fors_cloud.pkl");
        cloud.to_pickle(&path).unwrap();
        assert!(path.exists());
    }
}
