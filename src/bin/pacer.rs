use anyhow::{Context, Result};
use clap::Parser;
use interval_etl::core::pace::Pace;
use interval_etl::utils::logger;

#[derive(Parser)]
#[command(name = "pacer")]
#[command(about = "Calculates target paces as one or more percentages of a given pace")]
struct Args {
    /// A pace in MM:SS per km, for instance 03:55
    #[arg(value_name = "PACE")]
    pace: Pace,

    /// Percentages of the pace's speed to calculate, for instance 94
    #[arg(value_name = "TARGET%", required = true, num_args = 1..)]
    target_percentages: Vec<u32>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let speed_kph = args
        .pace
        .speed_kph()
        .context("pace must be greater than 00:00")?;

    println!("source pace:  {} min/km", args.pace);
    println!("source speed: {:.6} km/h", speed_kph);
    println!();
    println!("target speeds");
    println!("=============");
    for percentage in args.target_percentages {
        let target = args.pace.at_speed_percent(f64::from(percentage))?;
        let target_speed = target.speed_kph().unwrap_or_default();
        println!(
            "{:3}%: pace: {} min/km, speed: {:.6} km/h",
            percentage, target, target_speed
        );
    }
    Ok(())
}
