use fors::{Builder, RonchigramBuilder};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ronchigram = RonchigramBuilder::load("demos/testbench.toml")?.build()?;
    println!("{}", ronchigram);

    let fringes = ronchigram.trace()?;
    println!("{}", fringes);
    fringes.to_pickle("ronchigram.pkl")?;

    let boundaries = ronchigram.zone_boundaries()?;
    println!("fringe boundaries [mm]: {:.2?}", boundaries);

    Ok(())
}
