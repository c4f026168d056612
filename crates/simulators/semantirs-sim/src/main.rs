use std::error::Error;

use clap::Parser;

use crate::simulation::builder::SimulationBuilder;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

pub(crate) mod simulation {
    pub(crate) mod builder;
    pub(crate) mod config;
    pub(crate) mod runner;
    pub(crate) mod scenario;
}

pub(crate) mod v2x {
    pub(crate) mod space;
}

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct CliArgs {
    #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
    config: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    let start = std::time::Instant::now();
    let builder = SimulationBuilder::new(&args.config)?;
    let report = builder.build()?.run()?;
    println!("{}", report.render());
    let elapsed = start.elapsed();
    println!("Simulation finished in {} ms.", elapsed.as_millis());
    Ok(())
}
