//!
//! # Foucault & Ronchi test simulator
//!
//! `fors` computes the geometric patterns produced by two classical
//! non-interferometric optical shop tests of a single conic mirror or lens
//! surface:
//!
//!  - the [Foucault knife-edge test](Foucaugram), where a knife edge placed
//!    near the center of curvature casts a shadow whose shape reveals the
//!    surface figure,
//!  - the [Ronchi ruling test](Ronchigram), where a periodic line grating
//!    placed near focus produces a fringe pattern across the aperture.
//!
//! Components are created with the builder associated to each of them.
//! A ronchigram of a 150mm f/8 paraboloid with a 100 lp/mm ruling 5mm
//! inside the center of curvature:
//!
//! ```rust
//! use fors::{Builder, FromBuilder, Conic, Ronchigram};
//! let ronchigram = Ronchigram::builder()
//!     .conic(
//!         Conic::builder()
//!             .diameter(150.)
//!             .curvature_radius(2400.)
//!             .conic_cst(-1.),
//!     )
//!     .lines_per_mm(100.)
//!     .z_offset(-5.)
//!     .build()
//!     .unwrap();
//! let fringes = ronchigram.trace().unwrap();
//! println!("{}", fringes);
//! ```
//!
//! All lengths are in millimeters and all angles in radians. The point
//! source sits at the center of curvature of the surface and the
//! observation plane is displaced axially by `z_offset` from it. Outputs
//! are plain coordinate arrays ([`PointCloud`]) meant to be handed to an
//! external plotting layer.

pub mod builders;
pub mod error;
pub mod foucault;
pub mod pupil;
pub mod raytracing;
pub mod ronchi;
pub mod surface;

#[doc(inline)]
pub use self::builders::{ConicBuilder, FoucaugramBuilder, RonchigramBuilder};
#[doc(inline)]
pub use self::error::ForsError;
#[doc(inline)]
pub use self::foucault::{Foucaugram, Layout};
#[doc(inline)]
pub use self::pupil::PupilSampling;
#[doc(inline)]
pub use self::raytracing::PointCloud;
#[doc(inline)]
pub use self::ronchi::Ronchigram;
#[doc(inline)]
pub use self::surface::{Conic, Eccentricity};

pub type Result<T> = std::result::Result<T, ForsError>;

/// Component builder type trait
pub trait Builder: Default {
    type Component;
    fn new() -> Self {
        Default::default()
    }
    fn build(self) -> Result<Self::Component>;
}

/// Trait returning the builder a component is created from
pub trait FromBuilder {
    type ComponentBuilder: Builder;
    fn builder() -> Self::ComponentBuilder {
        Default::default()
    }
}
