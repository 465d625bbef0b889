use crate::mosaic::{Dimensions, MosaicConfig};
use anyhow::{Result, bail};
use pico_args::Arguments;
use std::{fmt::Display, path::PathBuf, str::FromStr};

pub(crate) const HELP: &str = "\
Turn an image into a photomosaic of smaller images.

USAGE:
  photomosaic [OPTIONS] <TARGET>

OPTIONS:
  -i, --image-dir <DIR>     Directory of tile images [default: images]
  -o, --output <PATH>       Where to write the mosaic [default: mosaic.jpg]
      --tile-width <PX>     Width of each tile in the mosaic [default: 128]
      --tile-height <PX>    Height of each tile in the mosaic [default: 128]
      --cell-width <PX>     Width of the target region each tile replaces [default: 5]
      --cell-height <PX>    Height of the target region each tile replaces [default: 5]
  -p, --use-penalty <N>     Score penalty added each time a tile is reused [default: 15]
  -d, --debug               Verbose logging; save resampled tiles to scaledTiles/
      --help                Print this message
";

const DEFAULT_IMAGE_DIR: &str = "images";
const DEFAULT_OUTPUT: &str = "mosaic.jpg";
const DEFAULT_TILE_SIZE: u32 = 128;
const DEFAULT_CELL_SIZE: u32 = 5;
const DEFAULT_USE_PENALTY: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Args {
    pub(crate) target: PathBuf,
    pub(crate) image_dir: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) mosaic: MosaicConfig,
}

impl Args {
    /// Returns `None` when help was requested.
    pub(crate) fn parse(mut args: Arguments) -> Result<Option<Self>> {
        if args.contains("--help") {
            return Ok(None);
        }

        let debug = args.contains(["-d", "--debug"]);
        let image_dir = parse_arg(&mut args, ("-i", "--image-dir"))?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR));
        let output = parse_arg(&mut args, ("-o", "--output"))?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let use_penalty =
            parse_arg(&mut args, ("-p", "--use-penalty"))?.unwrap_or(DEFAULT_USE_PENALTY);
        let tile_size = Dimensions::new(
            args.opt_value_from_str("--tile-width")?.unwrap_or(DEFAULT_TILE_SIZE),
            args.opt_value_from_str("--tile-height")?.unwrap_or(DEFAULT_TILE_SIZE),
        );
        let cell_size = Dimensions::new(
            args.opt_value_from_str("--cell-width")?.unwrap_or(DEFAULT_CELL_SIZE),
            args.opt_value_from_str("--cell-height")?.unwrap_or(DEFAULT_CELL_SIZE),
        );

        let Some(target) = args.opt_free_from_str()? else {
            bail!("must provide a target image to make into a mosaic");
        };
        let rest = args.finish();
        if !rest.is_empty() {
            bail!("unexpected arguments: {rest:?}");
        }

        let mosaic = MosaicConfig {
            tile_size,
            cell_size,
            use_penalty,
            debug,
        };
        mosaic.validate()?;

        Ok(Some(Self {
            target,
            image_dir,
            output,
            mosaic,
        }))
    }
}

fn parse_arg<T>(args: &mut Arguments, (short, long): (&'static str, &'static str)) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    match (
        args.opt_value_from_str(short)?,
        args.opt_value_from_str(long)?,
    ) {
        (Some(arg), None) | (None, Some(arg)) => Ok(Some(arg)),
        (Some(_), Some(_)) => bail!(
            "duplicate argument specified; only one of `{short}` and `{long}` should be present"
        ),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use crate::mosaic::Dimensions;
    use pico_args::Arguments;
    use std::{ffi::OsString, path::PathBuf};

    fn parse(args: &[&str]) -> anyhow::Result<Option<Args>> {
        Args::parse(Arguments::from_vec(args.iter().map(OsString::from).collect()))
    }

    #[test]
    fn defaults() {
        let args = parse(&["target.png"]).unwrap().unwrap();
        assert_eq!(args.target, PathBuf::from("target.png"));
        assert_eq!(args.image_dir, PathBuf::from("images"));
        assert_eq!(args.output, PathBuf::from("mosaic.jpg"));
        assert_eq!(args.mosaic.tile_size, Dimensions::new(128, 128));
        assert_eq!(args.mosaic.cell_size, Dimensions::new(5, 5));
        assert_eq!(args.mosaic.use_penalty, 15);
        assert!(!args.mosaic.debug);
    }

    #[test]
    fn every_option() {
        let args = parse(&[
            "--debug",
            "-i",
            "tiles",
            "--output=out.png",
            "--tile-width",
            "64",
            "--tile-height=32",
            "--cell-width",
            "4",
            "--cell-height",
            "3",
            "-p",
            "0",
            "photo.jpg",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(args.target, PathBuf::from("photo.jpg"));
        assert_eq!(args.image_dir, PathBuf::from("tiles"));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.mosaic.tile_size, Dimensions::new(64, 32));
        assert_eq!(args.mosaic.cell_size, Dimensions::new(4, 3));
        assert_eq!(args.mosaic.use_penalty, 0);
        assert!(args.mosaic.debug);
    }

    #[test]
    fn missing_target_is_rejected() {
        let err = parse(&["-i", "tiles"]).unwrap_err();
        assert!(err.to_string().contains("target image"));
    }

    #[test]
    fn duplicate_forms_are_rejected() {
        let err = parse(&["-p", "1", "--use-penalty", "2", "t.png"]).unwrap_err();
        assert!(err.to_string().contains("duplicate argument"));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(parse(&["--cell-width", "0", "t.png"]).is_err());
        assert!(parse(&["--tile-height", "0", "t.png"]).is_err());
    }

    #[test]
    fn stray_arguments_are_rejected() {
        assert!(parse(&["t.png", "extra.png"]).is_err());
        assert!(parse(&["--nope", "t.png"]).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(&["--help"]).unwrap(), None);
    }
}
