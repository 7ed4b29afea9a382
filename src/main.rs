mod error;
mod font;
mod icon;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use icon::{IconSpec, DEFAULT_GLYPH};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "maskable-icons",
    about = "Generate maskable PNG icons for a web app manifest"
)]
struct Args {
    /// Directory the icons are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Icon edge lengths in pixels; each produces `<size>.png`.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = [192, 512]
    )]
    sizes: Vec<u32>,

    /// Character drawn in the middle of the icon.
    #[arg(short, long, default_value_t = DEFAULT_GLYPH)]
    glyph: char,

    /// Exit with a non-zero status when an icon cannot be created.
    #[arg(long)]
    strict: bool,
}

fn generate(args: &Args, out: &mut impl Write) -> Result<()> {
    for &size in &args.sizes {
        let file_name = format!("{size}.png");
        let path = args.out_dir.join(&file_name);
        let spec = IconSpec::new(size, &path).with_glyph(args.glyph);

        icon::render(&spec).with_context(|| format!("creating {}", path.display()))?;
        writeln!(out, "Created maskable {file_name} ({size}x{size})")?;
    }
    Ok(())
}

/// Report the outcome on `out` and pick the exit status. Failures are
/// best-effort unless `--strict` is set.
fn run(args: &Args, out: &mut impl Write) -> io::Result<u8> {
    match generate(args, out) {
        Ok(()) => {
            writeln!(out, "Successfully created PWA icons!")?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "Error creating icons: {e:#}")?;
            Ok(if args.strict { 1 } else { 0 })
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    match run(&args, &mut io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
