use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::ConicBuilder;
use crate::{
    foucault::{Foucaugram, FoucaultError},
    pupil::PupilSampling,
    Builder,
};

/// `Foucaugram` builder
///
/// Default properties:
///  - conic     : the [`ConicBuilder`] defaults
///  - z offset  : 5mm
///  - x offset  : 0mm
///  - phi       : 0rd
///  - sampling  : polar, 1024 rings x 256 spokes
///  - invert    : false
///
/// # Examples
///
/// ```rust
/// use fors::{Builder, FromBuilder, Foucaugram};
/// let foucaugram = Foucaugram::builder()
///     .z_offset(10.)
///     .x_offset(-0.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoucaugramBuilder {
    pub conic: ConicBuilder,
    pub z_offset: f64,
    pub x_offset: f64,
    pub phi: f64,
    pub sampling: PupilSampling,
    pub invert: bool,
}
impl Default for FoucaugramBuilder {
    fn default() -> Self {
        FoucaugramBuilder {
            conic: Default::default(),
            z_offset: 5.,
            x_offset: 0.,
            phi: 0.,
            sampling: Default::default(),
            invert: false,
        }
    }
}
impl FoucaugramBuilder {
    /// Sets the surface under test
    pub fn conic(self, conic: ConicBuilder) -> Self {
        Self { conic, ..self }
    }
    /// Sets the knife edge plane offset from the center of curvature \[mm\]
    pub fn z_offset(self, z_offset: f64) -> Self {
        Self { z_offset, ..self }
    }
    /// Sets the knife edge lateral offset \[mm\]
    pub fn x_offset(self, x_offset: f64) -> Self {
        Self { x_offset, ..self }
    }
    /// Sets the knife edge rotation from vertical \[rd\]
    pub fn phi(self, phi: f64) -> Self {
        Self { phi, ..self }
    }
    /// Sets the aperture sampling
    pub fn sampling(self, sampling: PupilSampling) -> Self {
        Self { sampling, ..self }
    }
    /// Swaps the bright and dark zones of the trace
    pub fn invert(self, invert: bool) -> Self {
        Self { invert, ..self }
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
impl Builder for FoucaugramBuilder {
    type Component = Foucaugram;
    fn build(self) -> crate::Result<Self::Component> {
        if !(self.z_offset.is_finite() && self.x_offset.is_finite() && self.phi.is_finite()) {
            return Err(FoucaultError::Knife {
                z_offset: self.z_offset,
                x_offset: self.x_offset,
                phi: self.phi,
            }
            .into());
        }
        Ok(Foucaugram {
            conic: self.conic.build()?,
            z_offset: self.z_offset,
            x_offset: self.x_offset,
            phi: self.phi,
            sampling: self.sampling,
            invert: self.invert,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_non_finite_knife() {
        assert!(FoucaugramBuilder::new()
            .z_offset(f64::INFINITY)
            .build()
            .is_err());
        assert!(FoucaugramBuilder::new().phi(f64::NAN).build().is_err());
    }

    #[test]
    fn surface_validation_propagates() {
        assert!(FoucaugramBuilder::new()
            .conic(ConicBuilder::new().diameter(-1.))
            .build()
            .is_err());
    }

    #[test]
    fn toml_round_trip() {
        let builder = FoucaugramBuilder::new()
            .z_offset(8.)
            .x_offset(-0.05)
            .sampling(PupilSampling::Random {
                count: 50000,
                seed: 7,
            });
        let path = std::env::temp_dir().join("fors_foucault.toml");
        builder.store(&path).unwrap();
        assert_eq!(FoucaugramBuilder::load(&path).unwrap(), builder);
    }
}
