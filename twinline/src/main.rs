use clap::Parser;
use std::fs;
use std::path::PathBuf;
use twinline_lib::{
    batch, BatchConfig, InlineError, InlineOptions, Inliner, OutputMode, TailwindResolver,
};

const TWINLINE_INTRO: &str = r#"
     _          _       _ _
    | |___ __ _(_)_ __ | (_)_ __   ___
    | __\ \ /\ / / | '_ \| | | '_ \ / _ \
    | |_ \ V  V /| | | | | | | | | |  __/
     \__| \_/\_/ |_|_| |_|_|_|_| |_|\___|

    Utility classes in, inline styles out.
"#;

#[derive(Parser)]
#[command(name = "twinline")]
#[command(about = "Inline Tailwind utility classes into HTML templates")]
#[command(version)]
struct Args {
    /// Input directory for HTML templates.
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for processed HTML.
    #[arg(short, long)]
    output: PathBuf,

    /// Output mode: `minified`, anything else writes the HTML as is.
    #[arg(short, long, default_value = "minified")]
    mode: String,

    /// Clean output directory before processing.
    #[arg(short, long)]
    clean: bool,

    /// Keep classes the utility engine does not know in the `class` attribute.
    #[arg(long)]
    keep_unresolved: bool,

    /// Leave `<style>` elements in the output.
    #[arg(long)]
    keep_style_blocks: bool,

    /// Do not inline the baseline (preflight) stylesheet.
    #[arg(long, conflicts_with = "baseline")]
    no_baseline: bool,

    /// Baseline stylesheet to use instead of the bundled preflight.
    #[arg(short, long)]
    baseline: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), InlineError> {
    let baseline_css = match &args.baseline {
        Some(path) => Some(fs::read_to_string(path).map_err(|e| InlineError::io(path, e))?),
        None => None,
    };
    let options = InlineOptions {
        inject_baseline: !args.no_baseline,
        strip_unresolved_classes: !args.keep_unresolved,
        remove_style_blocks: !args.keep_style_blocks,
        baseline_css,
    };
    let inliner = Inliner::new(Box::new(TailwindResolver::new()), options)?;

    let config = BatchConfig {
        input: args.input,
        output: args.output,
        mode: OutputMode::from_name(&args.mode),
        clean: args.clean,
    };
    batch::run(&config, &inliner)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("{}", TWINLINE_INTRO);

    // parse the args given in terminal
    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
