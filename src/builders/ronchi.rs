use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::ConicBuilder;
use crate::{
    pupil::PupilSampling,
    ronchi::{RonchiError, Ronchigram},
    Builder,
};

/// `Ronchigram` builder
///
/// Default properties:
///  - conic        : the [`ConicBuilder`] defaults
///  - ruling       : 100 lp/mm
///  - z offset     : 5mm
///  - phi          : 0rd
///  - sampling     : polar, 1024 rings x 256 spokes
///  - invert       : false
///
/// # Examples
///
/// ```rust
/// use fors::{Builder, FromBuilder, Ronchigram};
/// let ronchigram = Ronchigram::builder()
///     .lines_per_mm(133.)
///     .z_offset(-4.)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RonchigramBuilder {
    pub conic: ConicBuilder,
    pub lines_per_mm: f64,
    pub z_offset: f64,
    pub phi: f64,
    pub sampling: PupilSampling,
    pub invert: bool,
}
impl Default for RonchigramBuilder {
    fn default() -> Self {
        RonchigramBuilder {
            conic: Default::default(),
            lines_per_mm: 100.,
            z_offset: 5.,
            phi: 0.,
            sampling: Default::default(),
            invert: false,
        }
    }
}
impl RonchigramBuilder {
    /// Sets the surface under test
    pub fn conic(self, conic: ConicBuilder) -> Self {
        Self { conic, ..self }
    }
    /// Sets the ruling frequency \[lp/mm\]
    pub fn lines_per_mm(self, lines_per_mm: f64) -> Self {
        Self {
            lines_per_mm,
            ..self
        }
    }
    /// Sets the ruling plane offset from the center of curvature \[mm\]
    pub fn z_offset(self, z_offset: f64) -> Self {
        Self { z_offset, ..self }
    }
    /// Sets the ruling rotation from vertical \[rd\]
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
impl Builder for RonchigramBuilder {
    type Component = Ronchigram;
    fn build(self) -> crate::Result<Self::Component> {
        if !(self.lines_per_mm.is_finite() && self.lines_per_mm > 0.) {
            return Err(RonchiError::Frequency(self.lines_per_mm).into());
        }
        if !(self.z_offset.is_finite() && self.phi.is_finite()) {
            return Err(RonchiError::Ruling {
                z_offset: self.z_offset,
                phi: self.phi,
            }
            .into());
        }
        Ok(Ronchigram {
            conic: self.conic.build()?,
            lines_per_mm: self.lines_per_mm,
            z_offset: self.z_offset,
            phi: self.phi,
            sampling: self.sampling,
            invert: self.invert,
        })
    }
}
