use fors::{Builder, ConicBuilder, Foucaugram, FromBuilder, PupilSampling};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let foucaugram = Foucaugram::builder()
        .conic(ConicBuilder::new().diameter(200.).curvature_radius(400.))
        .z_offset(10.)
        .x_offset(-0.5)
        .sampling(PupilSampling::Random {
            count: 100_000,
            seed: 1,
        })
        .build()?;
    println!("{}", foucaugram);

    let now = Instant::now();
    let bright = foucaugram.trace()?;
    println!(
        "{} bright points traced in {}ms",
        bright.len(),
        now.elapsed().as_millis()
    );
    let _: complot::Scatter = (
        bright.iter().map(|[x, y]| (x, vec![y])),
        Some(complot::Config::new().filename("foucaugram.png")),
    )
        .into();

    let boundary = foucaugram.shadow_boundary()?;
    boundary.to_pickle("foucault_boundary.pkl")?;

    let layout = foucaugram.layout()?;
    println!(
        "source at z={}mm, knife edge plane at z={}mm, spot radius {:.3}mm",
        layout.source[0], layout.plane_z, layout.spot_radius
    );
    for ray in &layout.rays {
        println!("ray: {:+8.3?}", ray);
    }

    Ok(())
}
