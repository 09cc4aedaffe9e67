use anyhow::{ensure, Context, Result};
use clap::Parser;
use interval_etl::core::pace::{parse_race_time, Pace};
use interval_etl::utils::logger;

#[derive(Parser)]
#[command(name = "pace")]
#[command(about = "Calculates average pace from distance and time")]
struct Args {
    /// A race time [HH:]MM:SS, for instance 40:55
    #[arg(value_name = "TIME")]
    time: String,

    /// The distance in meters, for instance 10000
    #[arg(value_name = "DISTANCE")]
    distance: u32,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let seconds = parse_race_time(&args.time)?;
    ensure!(args.distance > 0, "distance must be greater than zero");

    let pace = Pace::from_distance_duration(f64::from(args.distance), seconds)
        .context("could not compute pace")?;
    tracing::debug!("{}s over {}m = {:.2}s/km", seconds, args.distance, pace.secs_per_km());

    println!("average pace:  {} min/km", pace);
    Ok(())
}
