mod cli;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colgen_core::{score_image, suggest_widgets, JsonWidgetState, ScoreGrid, Suggestions};
use colgen_hooks::{run_hooks, DEFAULT_HOOKS, HOOK_TIMEOUT};
use colgen_palette::{generate_scheme, Mode, SchemeOptions};
use colgen_templates::{expand_path, render_all, write_outputs, TemplateContext};

use cli::{AnalyzeArgs, Cli, Commands, ImageArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Image(args) => args.verbose,
        Commands::Analyze(args) => args.verbose,
    };
    init_logging(verbose);

    match cli.command {
        Commands::Image(args) => generate(args).await,
        Commands::Analyze(args) => analyze(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Resolves `path` to an absolute path, failing if it does not exist.
fn resolve_image(path: &Path) -> Result<PathBuf> {
    let expanded = expand_path(&path.to_string_lossy());
    match expanded.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => bail!("Image not found: {}", expanded.display()),
    }
}

async fn generate(args: ImageArgs) -> Result<()> {
    let image = resolve_image(&args.path)?;
    let options = SchemeOptions {
        mode: Mode::from(args.mode),
        variant: args.scheme.into(),
        contrast: args.contrast,
    };
    log::debug!("Generating colors from: {}", image.display());
    log::debug!(
        "Mode: {}, Scheme: {}, Contrast: {}",
        options.mode,
        options.variant,
        options.contrast
    );

    let colors = generate_scheme(&image, &options)?;
    log::debug!("Generated {} colors", colors.len());
    if let Some(primary) = colors.hex("primary") {
        log::debug!("Primary: {primary}");
    }

    let image_str = image.to_string_lossy();
    let ctx = TemplateContext {
        colors: &colors,
        image: &image_str,
        mode: options.mode,
    };
    let templates_dir = expand_path(&args.templates);
    let rendered = render_all(&templates_dir, &ctx);
    log::debug!("Rendered {} templates", rendered.len());

    let written = write_outputs(&rendered);
    for path in &written {
        log::debug!("Wrote: {}", path.display());
    }

    if !args.no_hooks {
        let executed = run_hooks(DEFAULT_HOOKS, options.mode.name(), HOOK_TIMEOUT).await;
        if !executed.is_empty() {
            log::debug!("Executed hooks: {}", executed.join(", "));
        }
    }

    println!(
        "Done. Generated {} colors, wrote {} files.",
        colors.len(),
        written.len()
    );
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let image = resolve_image(&args.image)?;
    let output = expand_path(&args.output);
    let widgets_file = expand_path(&args.widgets);

    let grid = score_image(&image, args.cols, args.rows)
        .with_context(|| format!("Failed to analyze {}", image.display()))?;
    if args.verbose {
        print_grid(&grid);
    }

    let state = JsonWidgetState::new(widgets_file.clone());
    let placements = suggest_widgets(&grid, &state);
    let suggestions = Suggestions::new(&image, &grid, &placements);

    suggestions
        .write(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Suggestions written to {}", output.display());

    for placement in &placements {
        println!(
            "  {}: ({}, {}) {}x{} score {:.1}",
            placement.spec.kind,
            placement.x,
            placement.y,
            placement.spec.width,
            placement.spec.height,
            placement.score
        );
    }

    if args.apply {
        suggestions
            .apply(&widgets_file)
            .with_context(|| format!("Failed to update {}", widgets_file.display()))?;
        println!("Applied {} widgets to {}", placements.len(), widgets_file.display());
    }
    Ok(())
}

fn format_row(row: &[f64]) -> String {
    row.iter().map(|score| format!("{score:6.1}")).collect::<Vec<_>>().join(" ")
}

fn print_grid(grid: &ScoreGrid) {
    println!("Score grid ({}x{}):", grid.cols(), grid.rows());
    for row in grid.iter_rows() {
        println!("{}", format_row(row));
    }
}
