use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    surface::{Conic, Eccentricity, SurfaceError},
    Builder,
};

/// `Conic` builder
///
/// Default properties:
///  - diameter          : 150mm
///  - curvature radius  : 1500mm (f/5)
///  - conic constant    : 0 (sphere)
///  - spherical aberration A1 : 0
///
/// # Examples
///
/// - a 150mm f/8 paraboloid
///
/// ```rust
/// use fors::{Builder, FromBuilder, Conic};
/// let mirror = Conic::builder()
///     .diameter(150.)
///     .curvature_radius(2400.)
///     .conic_cst(-1.)
///     .build()
///     .unwrap();
/// ```
///
/// - the same surface from its eccentricity
///
/// ```rust
/// use fors::{Builder, FromBuilder, Conic, Eccentricity};
/// let mirror = Conic::builder()
///     .diameter(150.)
///     .curvature_radius(2400.)
///     .eccentricity(Eccentricity::Real(1.))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConicBuilder {
    pub diameter: f64,
    pub curvature_radius: f64,
    pub conic_cst: f64,
    pub a1: f64,
}
impl Default for ConicBuilder {
    fn default() -> Self {
        ConicBuilder {
            diameter: 150.,
            curvature_radius: 1500.,
            conic_cst: 0.,
            a1: 0.,
        }
    }
}
impl ConicBuilder {
    /// Sets the clear aperture diameter \[mm\]
    pub fn diameter(self, diameter: f64) -> Self {
        Self { diameter, ..self }
    }
    /// Sets the vertex radius of curvature \[mm\]
    ///
    /// The sign selects the direction the surface curves in, both are
    /// valid.
    pub fn curvature_radius(self, curvature_radius: f64) -> Self {
        Self {
            curvature_radius,
            ..self
        }
    }
    /// Sets the conic constant
    pub fn conic_cst(self, conic_cst: f64) -> Self {
        Self { conic_cst, ..self }
    }
    /// Sets the conic constant from the section eccentricity, `K = -ε²`
    pub fn eccentricity(self, eccentricity: Eccentricity) -> Self {
        Self {
            conic_cst: eccentricity.conic_constant(),
            ..self
        }
    }
    /// Sets the 4th order spherical aberration coefficient \[mm⁻³\]
    pub fn spherical_aberration(self, a1: f64) -> Self {
        Self { a1, ..self }
    }
    /// Reads the builder back from a TOML prescription file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Ok(toml::from_str(&fs::read_to_string(path)?)?)
    }
    /// Writes the builder to a TOML prescription file
    pub fn store<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        Ok(fs::write(path, toml::to_string_pretty(self)?)?)
    }
}
impl Builder for ConicBuilder {
    type Component = Conic;
    /// Builds the `Conic`, validating that the surface is real valued
    /// over the whole aperture
    fn build(self) -> crate::Result<Self::Component> {
        if !(self.diameter.is_finite() && self.diameter > 0.) {
            return Err(SurfaceError::Diameter(self.diameter).into());
        }
        if !(self.curvature_radius.is_finite() && self.curvature_radius != 0.) {
            return Err(SurfaceError::Curvature(self.curvature_radius).into());
        }
        let conic = Conic {
            curvature_radius: self.curvature_radius,
            conic_cst: self.conic_cst,
            diameter: self.diameter,
            a1: self.a1,
        };
        if conic.aperture_radius() > conic.max_radius() {
            return Err(SurfaceError::Aperture {
                semi_diameter: conic.aperture_radius(),
                limit: conic.max_radius(),
            }
            .into());
        }
        log::info!("new {}", conic);
        Ok(conic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let conic = ConicBuilder::new().build().unwrap();
        assert_eq!(conic.diameter(), 150.);
        assert_eq!(conic.focal_length(), 750.);
    }

    #[test]
    fn rejects_a_flat_vertex() {
        assert!(ConicBuilder::new().curvature_radius(0.).build().is_err());
        assert!(ConicBuilder::new()
            .curvature_radius(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn rejects_a_degenerate_aperture() {
        assert!(ConicBuilder::new().diameter(0.).build().is_err());
        assert!(ConicBuilder::new().diameter(-10.).build().is_err());
    }

    #[test]
    fn rejects_an_aperture_wider_than_the_surface() {
        // a 7.8mm sphere only extends to r=7.8mm
        let result = ConicBuilder::new()
            .diameter(20.)
            .curvature_radius(7.8)
            .build();
        assert!(matches!(
            result,
            Err(crate::ForsError::Surface(SurfaceError::Aperture { .. }))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let builder = ConicBuilder::new()
            .diameter(150.)
            .curvature_radius(2400.)
            .conic_cst(-1.);
        let path = std::env::temp_dir().join("fors_conic.toml");
        builder.store(&path).unwrap();
        assert_eq!(ConicBuilder::load(&path).unwrap(), builder);
    }
}
