use std::path::PathBuf;

use clap::Parser;

use crate::consumer::RectangleOperation;

/// Replays a recorded rectangle-tool session over an image and writes the
/// result of the committed rectangle.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source image.
    pub image: PathBuf,
    /// JSON script of pointer, key and options events.
    pub session: PathBuf,
    /// Where the processed image is written; the format follows the extension.
    pub output: PathBuf,
    #[arg(short, long, value_enum, default_value = "crop")]
    pub operation: RectangleOperation,
    /// Zoom percent of the replay canvas, overriding the script.
    #[arg(long)]
    pub zoom: Option<u16>,
    /// Ignore config.json and never write it back.
    #[arg(long)]
    pub no_config: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_paths_with_defaults() {
        let cli = Cli::try_parse_from(["marquee", "in.png", "session.json", "out.png"])
            .expect("arguments should parse");
        assert_eq!(cli.image, PathBuf::from("in.png"));
        assert_eq!(cli.session, PathBuf::from("session.json"));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.operation, RectangleOperation::Crop);
        assert_eq!(cli.zoom, None);
        assert!(!cli.no_config);
    }

    #[test]
    fn parses_operation_and_flags() {
        let cli = Cli::try_parse_from([
            "marquee",
            "in.png",
            "session.json",
            "mask.png",
            "--operation",
            "select",
            "--zoom",
            "200",
            "--no-config",
        ])
        .expect("arguments should parse");
        assert_eq!(cli.operation, RectangleOperation::Select);
        assert_eq!(cli.zoom, Some(200));
        assert!(cli.no_config);
    }

    #[test]
    fn rejects_missing_output_and_unknown_operation() {
        assert!(Cli::try_parse_from(["marquee", "in.png", "session.json"]).is_err());
        assert!(Cli::try_parse_from([
            "marquee",
            "in.png",
            "session.json",
            "out.png",
            "-o",
            "rotate"
        ])
        .is_err());
    }
}
