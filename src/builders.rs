mod conic;
mod foucault;
mod ronchi;

pub use conic::ConicBuilder;
pub use foucault::FoucaugramBuilder;
pub use ronchi::RonchigramBuilder;
