use fors::{Builder, ConicBuilder, Foucaugram, FromBuilder, PupilSampling, Ronchigram};

fn f8_paraboloid() -> ConicBuilder {
    ConicBuilder::new()
        .diameter(150.)
        .curvature_radius(2400.)
        .conic_cst(-1.)
}

#[test]
fn ronchigram() {
    let ronchigram = Ronchigram::builder()
        .conic(f8_paraboloid())
        .lines_per_mm(100.)
        .z_offset(5.)
        .build()
        .unwrap();
    let fringes = ronchigram.trace().unwrap();
    assert!(!fringes.is_empty());

    let _: complot::Scatter = (
        fringes.iter().map(|[x, y]| (x, vec![y])),
        Some(complot::Config::new().filename("ronchigram.png")),
    )
        .into();
}

#[test]
fn foucaugram() {
    let foucaugram = Foucaugram::builder()
        .conic(f8_paraboloid())
        .z_offset(8.)
        .x_offset(-0.05)
        .sampling(PupilSampling::Random {
            count: 100_000,
            seed: 1,
        })
        .build()
        .unwrap();
    let bright = foucaugram.trace().unwrap();
    assert!(!bright.is_empty());
    let boundary = foucaugram.shadow_boundary().unwrap();
    assert!(!boundary.is_empty());

    let _: complot::Scatter = (
        bright.iter().map(|[x, y]| (x, vec![y])),
        Some(complot::Config::new().filename("foucaugram.png")),
    )
        .into();
}

#[test]
fn through_focus_pickle_export() {
    let ronchigram = Ronchigram::builder()
        .conic(f8_paraboloid())
        .lines_per_mm(100.)
        .sampling(PupilSampling::Polar {
            rings: 256,
            spokes: 64,
        })
        .build()
        .unwrap();
    let grams = ronchigram.through_focus(&[-5., 0., 5.]).unwrap();
    assert_eq!(grams.len(), 3);
    for (gram, tag) in grams.iter().zip(["in", "focus", "out"]) {
        gram.to_pickle(std::env::temp_dir().join(format!("ronchigram_{tag}.pkl")))
            .unwrap();
    }
}

#[test]
fn prescription_file_drives_the_simulation() {
    let path = std::env::temp_dir().join("fors_bench.toml");
    Ronchigram::builder()
        .conic(f8_paraboloid())
        .lines_per_mm(133.)
        .z_offset(4.)
        .store(&path)
        .unwrap();
    let ronchigram = fors::RonchigramBuilder::load(&path)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(ronchigram.lines_per_mm(), 133.);
    assert!(!ronchigram.trace().unwrap().is_empty());
}
