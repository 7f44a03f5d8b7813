use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dynform::{
    DocumentFormat, FormUI, OutputDestination, SubmissionWriter, form_config_from_str,
    lint_config,
};

#[derive(Debug, Parser)]
#[command(
    name = "dynform",
    version,
    about = "Render schema-driven form configs as interactive TUIs"
)]
struct Cli {
    /// Form config spec: file path, inline payload, or "-" for stdin
    #[arg(value_name = "FORM")]
    form: String,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact output rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (contents, format) = load_form_spec(&cli.form)?;
    let config = form_config_from_str(&contents, format).map_err(Report::msg)?;
    for warning in lint_config(&config) {
        warn!(%warning, "form config");
    }

    let destinations = resolve_destinations(&cli.outputs, cli.force)?;
    let output_format = destinations
        .iter()
        .find_map(|destination| match destination {
            OutputDestination::File(path) => DocumentFormat::from_path(path),
            OutputDestination::Stdout => None,
        })
        .unwrap_or_default();

    let mut ui = FormUI::new(config);
    if let Some(title) = cli.title {
        ui = ui.with_title(title);
    }
    let values = ui.run().map_err(Report::msg)?;

    SubmissionWriter::new(output_format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations)
        .write(&values)
        .map_err(Report::msg)?;

    Ok(())
}

/// Resolve a form spec the way users pass it: a readable file, "-" for
/// stdin, or the payload itself inline.
fn load_form_spec(spec: &str) -> Result<(String, DocumentFormat)> {
    if spec == "-" {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .wrap_err("failed to read form config from stdin")?;
        return Ok((contents, DocumentFormat::default()));
    }

    let path = PathBuf::from(spec);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let format = resolve_format(&path)?;
            Ok((contents, format))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // not a file: treat the spec as an inline JSON payload
            Ok((spec.to_string(), DocumentFormat::Json))
        }
        Err(err) => Err(Report::new(err)
            .wrap_err(format!("failed to load form config from {}", path.display()))),
    }
}

fn resolve_format(path: &Path) -> Result<DocumentFormat> {
    if let Some(format) = DocumentFormat::from_path(path) {
        return Ok(format);
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        None | Some("json") => Ok(DocumentFormat::default()),
        Some(other) => Err(eyre!(
            "'{}' files are not supported by this build (unknown or disabled format '{other}')",
            path.display()
        )),
    }
}

fn resolve_destinations(outputs: &[String], force: bool) -> Result<Vec<OutputDestination>> {
    if outputs.is_empty() {
        return Ok(vec![OutputDestination::Stdout]);
    }
    let mut destinations = Vec::with_capacity(outputs.len());
    for spec in outputs {
        if spec == "-" {
            destinations.push(OutputDestination::Stdout);
            continue;
        }
        let path = PathBuf::from(spec);
        if path.exists() && !force {
            return Err(eyre!(
                "output file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
        destinations.push(OutputDestination::File(path));
    }
    Ok(destinations)
}
