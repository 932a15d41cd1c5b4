//! Command-line interface.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use iatibind_engine::markup::render_document;
use iatibind_engine::{encode, CoverageWarning, DecodeOptions, Decoded, XmlModel};

use crate::config::{
    codelist_url, validate_codelist_name, validate_source, Source, PUBLISHER_LIST_URL,
};
use crate::error::Result;
use crate::fetch::{load_codelists, load_source};
use crate::output::{render_json, render_yaml, save_xml};
use crate::vocabulary::{Codelist, IatiActivities, IatiPublishersList, ReportingOrg};

/// iatibind - Decode, inspect and re-encode IATI XML documents.
#[derive(Parser)]
#[command(name = "iatibind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Document types the CLI can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// `<iati-activities>` activity file
    Activities,
    /// `<codelist>` file
    Codelist,
    /// IATI Registry `<iati-publishers-list>`
    Publishers,
    /// A bare `<reporting-org>` fragment
    ReportingOrg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a document and print it as YAML or JSON.
    Decode {
        /// http(s) URL or file path
        source: String,

        /// Document type
        #[arg(short, long, value_enum)]
        kind: Kind,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Skip the coverage check for unrepresented attributes and elements
        #[arg(long)]
        no_coverage: bool,
    },

    /// Decode a document and encode it back to XML.
    Roundtrip {
        /// http(s) URL or file path
        source: String,

        /// Document type
        #[arg(short, long, value_enum)]
        kind: Kind,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize every codelist file in a directory.
    Codelists {
        /// Directory holding `*.xml` codelists
        dir: PathBuf,
    },

    /// Download a named codelist from the IATI reference site.
    FetchCodelist {
        /// Codelist name (e.g., ActivityScope)
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Download the IATI Registry publisher list.
    Publishers {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Decode {
            source,
            kind,
            format,
            no_coverage,
        } => {
            let source = validate_source(&source)?;
            let options = DecodeOptions {
                check_coverage: !no_coverage,
            };
            match kind {
                Kind::Activities => decode_command::<IatiActivities>(&source, options, format),
                Kind::Codelist => decode_command::<Codelist>(&source, options, format),
                Kind::Publishers => decode_command::<IatiPublishersList>(&source, options, format),
                Kind::ReportingOrg => decode_command::<ReportingOrg>(&source, options, format),
            }
        }
        Commands::Roundtrip {
            source,
            kind,
            output,
        } => {
            let source = validate_source(&source)?;
            let output = output.as_deref();
            match kind {
                Kind::Activities => roundtrip_command::<IatiActivities>(&source, output),
                Kind::Codelist => roundtrip_command::<Codelist>(&source, output),
                Kind::Publishers => roundtrip_command::<IatiPublishersList>(&source, output),
                Kind::ReportingOrg => roundtrip_command::<ReportingOrg>(&source, output),
            }
        }
        Commands::Codelists { dir } => codelists_command(&dir),
        Commands::FetchCodelist { name, format } => {
            validate_codelist_name(&name)?;
            let source = Source::Url(codelist_url(&name));
            decode_command::<Codelist>(&source, DecodeOptions::default(), format)
        }
        Commands::Publishers { format } => {
            let source = Source::Url(PUBLISHER_LIST_URL.to_string());
            decode_command::<IatiPublishersList>(&source, DecodeOptions::default(), format)
        }
    }
}

/// Run `work` behind a spinner on stderr.
fn with_spinner<T>(message: String, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = work();
    pb.finish_and_clear();
    result
}

fn load<T: XmlModel>(source: &Source, options: DecodeOptions) -> Result<Decoded<T>> {
    let model = T::schema().type_name();
    with_spinner(format!("Decoding {model} from {source}..."), || {
        load_source::<T>(source, options)
    })
}

fn report_warnings(warnings: &[CoverageWarning]) {
    for warning in warnings {
        eprintln!("{} {warning}", style("warning:").yellow().bold());
    }
    if !warnings.is_empty() {
        eprintln!(
            "{} {} unrepresented attribute(s) or element(s)",
            style("Coverage:").yellow().bold(),
            style(warnings.len()).yellow()
        );
    }
}

fn decode_command<T: XmlModel + Serialize>(
    source: &Source,
    options: DecodeOptions,
    format: Format,
) -> Result<()> {
    let decoded = load::<T>(source, options)?;
    report_warnings(&decoded.warnings);

    let rendered = match format {
        Format::Yaml => render_yaml(&decoded.value)?,
        Format::Json => render_json(&decoded.value)?,
    };
    print!("{rendered}");
    Ok(())
}

fn roundtrip_command<T: XmlModel>(source: &Source, output: Option<&Path>) -> Result<()> {
    let decoded = load::<T>(source, DecodeOptions::default())?;
    report_warnings(&decoded.warnings);

    let element = encode(&decoded.value)?;
    match output {
        Some(path) => {
            save_xml(path, &element)?;
            println!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => print!("{}", render_document(&element)?),
    }
    Ok(())
}

fn codelists_command(dir: &Path) -> Result<()> {
    let codelists = with_spinner(format!("Loading codelists from {}...", dir.display()), || {
        load_codelists(dir)
    })?;

    println!(
        "{} {} codelist(s) in {}",
        style("Loaded").bold(),
        codelists.len(),
        dir.display()
    );
    for (stem, decoded) in &codelists {
        let codelist = &decoded.value;
        println!(
            "  {}: {} items, {} active",
            style(stem).cyan(),
            codelist.items().len(),
            codelist.active_codes().count()
        );
        if !decoded.warnings.is_empty() {
            println!(
                "    Warnings: {}",
                style(decoded.warnings.len()).yellow().bold()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_decode() {
        let cli = Cli::parse_from([
            "iatibind",
            "decode",
            "activities.xml",
            "--kind",
            "activities",
        ]);

        let Commands::Decode {
            source,
            kind,
            format,
            no_coverage,
        } = cli.command
        else {
            panic!("expected decode command");
        };
        assert_eq!(source, "activities.xml");
        assert_eq!(kind, Kind::Activities);
        assert_eq!(format, Format::Yaml);
        assert!(!no_coverage);
    }

    #[test]
    fn test_cli_parse_decode_json_without_coverage() {
        let cli = Cli::parse_from([
            "iatibind",
            "decode",
            "https://example.org/org.xml",
            "-k",
            "reporting-org",
            "-f",
            "json",
            "--no-coverage",
        ]);

        let Commands::Decode {
            kind,
            format,
            no_coverage,
            ..
        } = cli.command
        else {
            panic!("expected decode command");
        };
        assert_eq!(kind, Kind::ReportingOrg);
        assert_eq!(format, Format::Json);
        assert!(no_coverage);
    }

    #[test]
    fn test_cli_parse_roundtrip_output() {
        let cli = Cli::parse_from([
            "iatibind",
            "roundtrip",
            "codelist.xml",
            "--kind",
            "codelist",
            "-o",
            "out.xml",
        ]);

        let Commands::Roundtrip { kind, output, .. } = cli.command else {
            panic!("expected roundtrip command");
        };
        assert_eq!(kind, Kind::Codelist);
        assert_eq!(output, Some(PathBuf::from("out.xml")));
    }

    #[test]
    fn test_cli_requires_kind() {
        assert!(Cli::try_parse_from(["iatibind", "decode", "a.xml"]).is_err());
        assert!(Cli::try_parse_from(["iatibind", "decode", "a.xml", "--kind", "budget"]).is_err());
    }

    #[test]
    fn test_fetch_codelist_rejects_bad_name() {
        let cli = Cli::parse_from(["iatibind", "fetch-codelist", "../etc"]);
        assert!(matches!(
            execute(cli),
            Err(crate::error::HarvesterError::InvalidCodelistName(_))
        ));
    }
}
