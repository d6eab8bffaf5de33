//! Command-line argument parsing for glyphview.
//!
//! Flags override values from the optional configuration file:
//!
//! ```no_run
//! use glyphview::args::Args;
//! use glyphview::config::Config;
//!
//! let args = Args::parse();
//! let config = Config::from_args(&args)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::{Config, ConfigBuilder, ConfigError, Rgb, Size};
use clap::Parser;
use std::path::PathBuf;

/// glyphview command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render RLE palette glyph assets to PNG", long_about = None)]
pub struct Args {
    /// Glyph asset files (TOML)
    #[arg(value_name = "ASSET", required = true)]
    pub assets: Vec<PathBuf>,

    /// Directory for the PNG previews
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Render with the selected (highlighted) palette
    #[arg(short = 's', long)]
    pub selected: bool,

    /// Resample each glyph to WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    pub scale: Option<Size>,

    /// Color treated as transparent (#RRGGBB)
    #[arg(short = 't', long, value_name = "COLOR")]
    pub transparent: Option<Rgb>,

    /// Background color (#RRGGBB)
    #[arg(short = 'b', long, value_name = "COLOR")]
    pub background: Option<Rgb>,

    /// Background border around each glyph, in pixels
    #[arg(short = 'm', long, value_name = "PIXELS")]
    pub margin: Option<u32>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Configuration file path (TOML format)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse arguments from an iterator.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

impl Config {
    /// Create a configuration from command-line arguments.
    ///
    /// If a config file is specified in the arguments, it is loaded first and
    /// then overridden by explicit flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let base = match &args.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let mut builder = ConfigBuilder::from_config(base);
        if let Some(out) = &args.out {
            builder = builder.directory(out);
        }
        if args.selected {
            builder = builder.selected(true);
        }
        if let Some(scale) = args.scale {
            builder = builder.scale(scale);
        }
        if let Some(transparent) = args.transparent {
            builder = builder.transparent(transparent);
        }
        if let Some(background) = args.background {
            builder = builder.background(background);
        }
        if let Some(margin) = args.margin {
            builder = builder.margin(margin);
        }
        if let Some(jobs) = args.jobs {
            builder = builder.parallelism(jobs);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["glyphview", "arrow.toml"]).unwrap();
        assert_eq!(args.assets, vec![PathBuf::from("arrow.toml")]);
        assert!(!args.selected);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "glyphview",
            "-s",
            "--scale",
            "32x32",
            "-t",
            "#ff00ff",
            "-o",
            "out",
            "-j",
            "2",
            "-vv",
            "a.toml",
            "b.toml",
        ])
        .unwrap();

        assert!(args.selected);
        assert_eq!(
            args.scale,
            Some(Size {
                width: 32,
                height: 32
            })
        );
        assert_eq!(args.transparent, Some(Rgb([0xFF, 0x00, 0xFF])));
        assert_eq!(args.jobs, Some(2));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.assets.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Args::try_parse_from(["glyphview"]).is_err());
        assert!(Args::try_parse_from(["glyphview", "--scale", "32", "a.toml"]).is_err());
        assert!(Args::try_parse_from(["glyphview", "-t", "red", "a.toml"]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[output]\ndirectory = \"from-file\"\nmargin = 3\n\n[render]\nparallelism = 4"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args =
            Args::try_parse_from(["glyphview", "-c", path.as_str(), "-j", "1", "a.toml"]).unwrap();
        let config = Config::from_args(&args).unwrap();

        assert_eq!(config.output.directory, PathBuf::from("from-file"));
        assert_eq!(config.output.margin, 3);
        assert_eq!(config.render.parallelism, 1);
    }

    #[test]
    fn test_missing_config_file() {
        let args =
            Args::try_parse_from(["glyphview", "-c", "/nonexistent/glyphview.toml", "a.toml"])
                .unwrap();
        assert!(matches!(
            Config::from_args(&args),
            Err(ConfigError::Read { .. })
        ));
    }
}
