use fors::{Builder, ConicBuilder, FromBuilder, Ronchigram};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 10m f/5 paraboloid with a coarse 0.133 lp/mm ruling
    let diameter = 10_000.;
    let roc = 2. * 5. * diameter;
    let ronchigram = Ronchigram::builder()
        .conic(
            ConicBuilder::new()
                .diameter(diameter)
                .curvature_radius(roc)
                .conic_cst(-1.),
        )
        .lines_per_mm(0.133)
        .build()?;
    println!("{}", ronchigram);

    let z_offsets = [-63., 35., 133., 231., 329., 429.];
    let grams = ronchigram.through_focus(&z_offsets)?;
    for (gram, z_offset) in grams.iter().zip(&z_offsets) {
        println!("dz={:+6.0}mm: {}", z_offset, gram);
        let _: complot::Scatter = (
            gram.iter().map(|[x, y]| (x, vec![y])),
            Some(complot::Config::new().filename(format!("ronchigram_{:+04.0}.png", z_offset))),
        )
            .into();
    }

    Ok(())
}
