//! `hoistspec {input-file} {output-file}`
//!
//! Reads an OpenAPI document, hoists its inline schemas into
//! `components.schemas`, and writes the result. `.json` files are read and
//! written as JSON, anything else as YAML.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use hoistspec_core::{DocumentFormat, Node, SchemaExtractor};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: hoistspec {input-file} {output-file}";

fn main() -> Result<()> {
    let Some(AppArgs { input, output }) = AppArgs::parse() else {
        write_usage(io::stdout().lock()).context("printing usage")?;
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let input_format = DocumentFormat::from_path(&input);
    let content = fs::read_to_string(&input)
        .with_context(|| format!("reading input file {}", input.display()))?;
    let document = Node::decode(&content, input_format)
        .with_context(|| format!("decoding {input_format} document {}", input.display()))?;

    let (document, report) = SchemaExtractor::new(document)
        .transform()
        .context("extracting schemas")?;

    let output_format = DocumentFormat::from_path(&output);
    let content = document
        .encode(output_format)
        .with_context(|| format!("encoding {output_format} document"))?;
    fs::write(&output, content)
        .with_context(|| format!("writing output file {}", output.display()))?;

    info!(
        promoted = report.promoted,
        reused = report.reused,
        output = %output.display(),
        "Done"
    );
    Ok(())
}

/// Printed on stdout whatever the log filter.
fn write_usage(mut out: impl Write) -> io::Result<()> {
    writeln!(out, "{USAGE}")
}

#[derive(Debug)]
struct AppArgs {
    input: PathBuf,
    output: PathBuf,
}

impl AppArgs {
    /// `None` unless exactly two file names were given.
    fn parse() -> Option<Self> {
        let pargs = pico_args::Arguments::from_env();
        Self::from_free(pargs.finish())
    }

    fn from_free(free: Vec<OsString>) -> Option<Self> {
        let [input, output] = <[OsString; 2]>::try_from(free).ok()?;
        Some(Self {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        })
    }
}
