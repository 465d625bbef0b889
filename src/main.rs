mod bank;
mod cli;
mod error;
mod export;
mod load;
mod mosaic;
mod resample;
mod score;

use anyhow::{Context, Result};
use cli::{Args, HELP};
use image::{RgbImage, buffer::ConvertBuffer};
use log::{LevelFilter, debug, info};
use pico_args::Arguments;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() -> Result<()> {
    let Some(args) = Args::parse(Arguments::from_env())? else {
        print!("{HELP}");
        return Ok(());
    };

    let level = if args.mosaic.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    debug!("{args:?}");

    let target = load::load_target(&args.target)?;
    let sources = load::load_sources(&args.image_dir);

    let mosaic = mosaic::create_mosaic(&target, &sources, &args.mosaic)?;

    let rgb: RgbImage = mosaic.convert();
    rgb.save(&args.output)
        .with_context(|| format!("failed to write mosaic to `{}`", args.output.display()))?;
    info!(
        "wrote {}x{} mosaic to {}",
        rgb.width(),
        rgb.height(),
        args.output.display()
    );

    Ok(())
}
