#[derive(Debug, thiserror::Error)]
pub enum ForsError {
    #[error("invalid conic surface")]
    Surface(#[from] crate::surface::SurfaceError),
    #[error("cannot build `::fors::Foucaugram`")]
    Foucault(#[from] crate::foucault::FoucaultError),
    #[error("cannot build `::fors::Ronchigram`")]
    Ronchi(#[from] crate::ronchi::RonchiError),
    #[error("failed to export trace results")]
    Trace(#[from] crate::raytracing::TraceError),
    #[error("failed to read or write a prescription file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse a TOML prescription")]
    TomlDecode(#[from] toml::de::Error),
    #[error("failed to encode a TOML prescription")]
    TomlEncode(#[from] toml::ser::Error),
}
