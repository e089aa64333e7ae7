use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colgen_palette::{Mode, SchemeVariant};

pub const DEFAULT_TEMPLATES_DIR: &str = "~/.config/quickshell/col_gen/templates";
pub const DEFAULT_SUGGESTIONS_PATH: &str = "~/.config/quickshell/widget_suggestions.json";
pub const DEFAULT_WIDGETS_PATH: &str = "~/.config/quickshell/widgets.json";

#[derive(Parser, Debug)]
#[command(name = "colgen", about = "Wallpaper-driven color schemes and widget layout", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a color scheme from a wallpaper and write it to every template.
    Image(ImageArgs),
    /// Find calm spots on a wallpaper and suggest where widgets should go.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Wallpaper to take colors from.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Dark)]
    pub mode: ModeArg,

    #[arg(short, long, value_enum, default_value_t = SchemeArg::TonalSpot)]
    pub scheme: SchemeArg,

    /// -1.0 (reduced) to 1.0 (increased).
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub contrast: f32,

    /// Skip post-generation hooks.
    #[arg(long)]
    pub no_hooks: bool,

    /// Directory holding the template files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates: String,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Wallpaper to analyze.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    #[arg(long, default_value_t = 16)]
    pub cols: usize,

    #[arg(long, default_value_t = 9)]
    pub rows: usize,

    /// Where to write the suggestions.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_SUGGESTIONS_PATH)]
    pub output: String,

    /// Current widget layout, read for sizes and overwritten by `--apply`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WIDGETS_PATH)]
    pub widgets: String,

    /// Replace the widget layout with the suggestions.
    #[arg(long)]
    pub apply: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Dark,
    Light,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dark => Mode::Dark,
            ModeArg::Light => Mode::Light,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeArg {
    TonalSpot,
    Expressive,
    Fidelity,
    FruitSalad,
    Monochrome,
    Neutral,
    Rainbow,
    Vibrant,
    Content,
}

impl From<SchemeArg> for SchemeVariant {
    fn from(scheme: SchemeArg) -> Self {
        match scheme {
            SchemeArg::TonalSpot => SchemeVariant::TonalSpot,
            SchemeArg::Expressive => SchemeVariant::Expressive,
            SchemeArg::Fidelity => SchemeVariant::Fidelity,
            SchemeArg::FruitSalad => SchemeVariant::FruitSalad,
            SchemeArg::Monochrome => SchemeVariant::Monochrome,
            SchemeArg::Neutral => SchemeVariant::Neutral,
            SchemeArg::Rainbow => SchemeVariant::Rainbow,
            SchemeArg::Vibrant => SchemeVariant::Vibrant,
            SchemeArg::Content => SchemeVariant::Content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn image_defaults() {
        let cli = Cli::parse_from(["colgen", "image", "wall.png"]);
        let Commands::Image(args) = cli.command else {
            panic!("expected image command");
        };
        assert_eq!(args.mode, ModeArg::Dark);
        assert_eq!(args.scheme, SchemeArg::TonalSpot);
        assert_eq!(args.contrast, 0.0);
        assert!(!args.no_hooks);
        assert_eq!(args.templates, DEFAULT_TEMPLATES_DIR);
    }

    #[test]
    fn image_flags() {
        let cli = Cli::parse_from([
            "colgen", "image", "wall.png", "-m", "light", "-s", "fruit-salad", "-c", "-0.5", "--no-hooks",
        ]);
        let Commands::Image(args) = cli.command else {
            panic!("expected image command");
        };
        assert_eq!(Mode::from(args.mode), Mode::Light);
        assert_eq!(SchemeVariant::from(args.scheme), SchemeVariant::FruitSalad);
        assert_eq!(args.contrast, -0.5);
        assert!(args.no_hooks);
    }

    #[test]
    fn scheme_names_match_variant_names() {
        for arg in SchemeArg::value_variants() {
            let name = arg.to_possible_value().map(|v| v.get_name().to_string());
            assert_eq!(name.as_deref(), Some(SchemeVariant::from(*arg).name()));
        }
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::parse_from(["colgen", "analyze", "wall.png", "--apply"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!((args.cols, args.rows), (16, 9));
        assert_eq!(args.output, DEFAULT_SUGGESTIONS_PATH);
        assert_eq!(args.widgets, DEFAULT_WIDGETS_PATH);
        assert!(args.apply);
        assert!(!args.verbose);
    }
}
