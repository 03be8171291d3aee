//! Command-line front end for the wavenumber-domain grid filter.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grid_fourier::{
    pipeline, Direction, PipelineConfig, Region, Registration, SpikeLocation,
    DEFAULT_FILTER_WIDTH,
};

#[derive(Parser, Debug)]
#[command(name = "gridfourier")]
#[command(
    about = "Create or read a grid, add a spike, filter it in the frequency domain, and write the result"
)]
struct Args {
    /// Input grid file; omit to create a grid from --region and --increment
    input: Option<PathBuf>,

    /// Filename for the output grid
    #[arg(short = 'G', long = "output")]
    output: PathBuf,

    /// Region for a new grid: <west>/<east>/<south>/<north>
    #[arg(short = 'R', long = "region", value_parser = parse_region)]
    region: Option<Region>,

    /// Increments for a new grid: <dx>[/<dy>]
    #[arg(short = 'I', long = "increment", value_parser = parse_increment)]
    increment: Option<(f64, f64)>,

    /// Select pixel registration for a new grid
    #[arg(short = 'r', long = "pixel")]
    pixel: bool,

    /// Row/col pair where the unit impulse is placed [grid center]
    #[arg(short = 'A', long = "spike", value_parser = parse_spike)]
    spike: Option<SpikeLocation>,

    /// Direction for the filter wavenumbers: r, x, or y
    #[arg(short = 'D', long = "direction", default_value = "r", value_parser = parse_direction)]
    direction: Direction,

    /// Width of the Gaussian filter exp{-(k/k_ref)^2}
    #[arg(short = 'F', long = "width", default_value_t = DEFAULT_FILTER_WIDTH)]
    width: f64,

    /// Transform dimensions and modifiers: [f|<nx>/<ny>][+d][+t<width>][+w]
    #[arg(short = 'N', long = "plan")]
    plan: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_region(arg: &str) -> Result<Region, String> {
    let parts: Vec<&str> = arg.split('/').collect();
    if parts.len() != 4 {
        return Err(format!(
            "expected <west>/<east>/<south>/<north>, got '{arg}'"
        ));
    }
    let mut bounds = [0.0f64; 4];
    for (slot, part) in bounds.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(Region::new(bounds[0], bounds[1], bounds[2], bounds[3]))
}

fn parse_increment(arg: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = match arg.split_once('/') {
        Some((dx, dy)) => (dx, dy),
        None => (arg, arg),
    };
    let dx: f64 = dx.parse().map_err(|_| format!("'{dx}' is not a number"))?;
    let dy: f64 = dy.parse().map_err(|_| format!("'{dy}' is not a number"))?;
    Ok((dx, dy))
}

fn parse_spike(arg: &str) -> Result<SpikeLocation, String> {
    let (row, col) = arg
        .split_once('/')
        .ok_or_else(|| format!("expected <row>/<col>, got '{arg}'"))?;
    let row = row
        .parse()
        .map_err(|_| format!("'{row}' is not a row index"))?;
    let col = col
        .parse()
        .map_err(|_| format!("'{col}' is not a column index"))?;
    Ok(SpikeLocation { row, col })
}

fn parse_direction(arg: &str) -> Result<Direction, String> {
    arg.parse().map_err(|err| format!("{err}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = PipelineConfig {
        input: args.input,
        output: args.output,
        region: args.region,
        increment: args.increment,
        registration: if args.pixel {
            Registration::Pixel
        } else {
            Registration::Gridline
        },
        spike: args.spike,
        direction: args.direction,
        filter_width: args.width,
        plan_spec: args.plan,
    };

    pipeline::run(&config)?;
    Ok(())
}
