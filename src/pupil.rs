//! Aperture test point generation

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Aperture sampling strategy
///
/// Every strategy is deterministic for a given set of parameters, the
/// [Random](PupilSampling::Random) disk sampling included, its generator
/// being explicitly seeded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PupilSampling {
    /// Concentric sampling: `rings` radii, each replicated at `spokes`
    /// evenly spaced azimuths around the optical axis
    Polar { rings: usize, spokes: usize },
    /// A `resolution x resolution` Cartesian grid clipped to the aperture
    /// disk
    SquareGrid { resolution: usize },
    /// `count` points uniformly distributed over the aperture disk
    Random { count: usize, seed: u64 },
}
impl Default for PupilSampling {
    fn default() -> Self {
        PupilSampling::Polar {
            rings: 1024,
            spokes: 256,
        }
    }
}
impl PupilSampling {
    /// Returns the `[x, y]` test points for an aperture of the given
    /// `diameter`
    pub fn points(&self, diameter: f64) -> Vec<[f64; 2]> {
        let radius = 0.5 * diameter;
        match *self {
            PupilSampling::Polar { rings, spokes } => {
                let mut points = Vec::with_capacity(rings * spokes);
                for k in 0..spokes {
                    let (sin_o, cos_o) =
                        (2. * std::f64::consts::PI * k as f64 / spokes as f64).sin_cos();
                    for j in 0..rings {
                        let r = radius * (j as f64 + 0.5) / rings as f64;
                        points.push([r * cos_o, r * sin_o]);
                    }
                }
                points
            }
            PupilSampling::SquareGrid { resolution } => {
                let step = diameter / resolution.saturating_sub(1).max(1) as f64;
                let mut points = Vec::with_capacity(resolution * resolution);
                for i in 0..resolution {
                    let y = -radius + step * i as f64;
                    for j in 0..resolution {
                        let x = -radius + step * j as f64;
                        if x * x + y * y <= radius * radius {
                            points.push([x, y]);
                        }
                    }
                }
                points
            }
            PupilSampling::Random { count, seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..count)
                    .map(|_| {
                        let (sin_o, cos_o) =
                            (2. * std::f64::consts::PI * rng.gen::<f64>()).sin_cos();
                        let r = radius * rng.gen::<f64>().sqrt();
                        [r * cos_o, r * sin_o]
                    })
                    .collect()
            }
        }
    }
}

/// Returns a closed `n` sided polygon outlining a circle
pub fn circle_polygon(radius: f64, center: [f64; 2], n: usize) -> Vec<[f64; 2]> {
    (0..=n)
        .map(|i| {
            let (sin_o, cos_o) =
                (2. * std::f64::consts::PI * (i % n) as f64 / n as f64).sin_cos();
            [center[0] + radius * sin_o, center[1] + radius * cos_o]
        })
        .collect()
}
