//! CLI application for photo styling analysis.
//!
//! Usage:
//!   percent-style <image>                     # Human-readable output
//!   percent-style <image> --json              # JSON output
//!   percent-style <image> -o result.json      # Save to file
//!   percent-style <image> --detector-program python3 --detector-arg landmarks.py

use clap::Parser;
use percent_style::{
    init_tracing, AnalysisResponse, AnalysisResult, DetectorBackend, DetectorFactory,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "percent-style")]
#[command(author, version, about = "Photo styling analysis", long_about = None)]
struct Args {
    /// Input image file
    #[arg(required = true)]
    image: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// External landmark program; face shape and body type read
    /// "Not detected" without one
    #[arg(long)]
    detector_program: Option<PathBuf>,

    /// Argument passed to the landmark program (repeatable)
    #[arg(long = "detector-arg", requires = "detector_program")]
    detector_args: Vec<String>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(if args.verbose { "debug" } else { "warn" });

    match run(&args) {
        Ok(true) => {}
        // The failure record has already been printed.
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the analysis succeeded.
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let backend = match &args.detector_program {
        Some(program) => DetectorBackend::Command {
            program: program.clone(),
            args: args.detector_args.clone(),
        },
        None => DetectorBackend::Disabled,
    };

    let bytes = std::fs::read(&args.image)?;
    let response = backend.analyzer()?.run(&bytes);

    let output_str = if args.json {
        serde_json::to_string_pretty(&response)?
    } else {
        match &response {
            AnalysisResponse::Success(result) => format_human_readable(&args.image, result),
            AnalysisResponse::Failure { error } => format!("Error: {}\n", error),
        }
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        tracing::info!(path = %path.display(), "output written");
    } else {
        println!("{}", output_str);
    }

    Ok(response.is_success())
}

fn format_list(items: &[&str]) -> String {
    items.join(", ")
}

fn format_human_readable(image: &std::path::Path, result: &AnalysisResult) -> String {
    let mut s = String::new();

    s.push_str(&format!("Image: {}\n", image.display()));

    s.push_str("\nAttributes:\n");
    s.push_str(&format!("  Face shape:   {}\n", result.face_type));
    s.push_str(&format!("  Body type:    {}\n", result.body_type));
    s.push_str(&format!("  Skin tone:    {}\n", result.skin_tone));
    s.push_str(&format!("  Skin type:    {}\n", result.skin_type));
    s.push_str(&format!("  Undertone:    {}\n", result.undertone));
    s.push_str(&format!("  Hair texture: {}\n", result.hair_texture));
    s.push_str(&format!("  Hair type:    {}\n", result.hair_type));

    s.push_str("\nMakeup:\n");
    for (group, shades) in result.makeup_shades.groups() {
        s.push_str(&format!("  {:<11} {}\n", format!("{}:", group), format_list(shades)));
    }

    let rec = &result.recommendations;
    s.push_str("\nRecommendations:\n");
    s.push_str(&format!("  Dress colors: {}\n", format_list(rec.dress_colors)));
    s.push_str(&format!("  Jewellery:    {}\n", format_list(rec.jewellery)));
    s.push_str(&format!("  Dress style:  {}\n", format_list(rec.dress_style)));
    s.push_str(&format!("  Hairstyle:    {}\n", format_list(rec.hairstyle)));

    s.push_str("\nSkincare:\n");
    for tip in rec.skincare {
        s.push_str(&format!("  - {}\n", tip));
    }
    s.push_str("\nHaircare:\n");
    for tip in rec.haircare {
        s.push_str(&format!("  - {}\n", tip));
    }

    s
}
