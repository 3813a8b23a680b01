use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Parser;
use script_pdf_creator::{create_script_pdf, FontFamily, ScriptError, ScriptOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert a plain-text screenplay into a paginated PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to convert
    input: PathBuf,

    /// Where to write the PDF
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Footer text stamped on every page
    #[arg(short, long, default_value = script_pdf_creator::script_generator::DEFAULT_FOOTER)]
    subscript: String,

    /// Font family
    #[arg(
        short,
        long,
        default_value = "CodeNewRoman",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(FontFamily::ALL.map(|family| family.name()))
    )]
    font: String,

    /// Directory holding the family's TrueType files
    #[arg(long, default_value = ".")]
    font_dir: PathBuf,

    /// Also write a JSON layout summary (contents and chapter positions) here
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn run(args: Args) -> anyhow::Result<()> {
    let options = ScriptOptions {
        footer: args.subscript,
        font_family: args.font.parse::<FontFamily>()?,
        font_dir: args.font_dir,
        ..ScriptOptions::default()
    };

    log::info!("Generating PDF with the {} font family", options.font_family);
    let summary = create_script_pdf(&args.input, &args.output, &options)?;

    if let Some(path) = args.summary {
        let json = summary.to_json().context("serializing layout summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing layout summary to {}", path.display()))?;
        log::info!("layout summary written to {}", path.display());
    }

    println!("PDF created successfully: {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ScriptError>() {
                Some(script_err) => eprintln!("error during {}: {}", script_err.stage(), script_err),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
