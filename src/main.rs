use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osm_wrangle::config::UserConfig;
use osm_wrangle::errors::Result;
use osm_wrangle::etl::audit_postcodes::PostcodeAuditEtl;
use osm_wrangle::etl::audit_streets::StreetAuditEtl;
use osm_wrangle::etl::sample::SampleEtl;
use osm_wrangle::etl::shape_csv::ShapeCsvEtl;
use osm_wrangle::etl::tag_census::TagCensusEtl;
use osm_wrangle::etl::Etl;

#[derive(Parser)]
#[command(name = "osm_wrangle", version, about = "Audit and flatten OpenStreetMap XML extracts")]
struct Cli {
    /// JSON user config.
    #[arg(short, long, default_value = "config/irving.json")]
    config: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Check every shaped entity against the record schema; the first failure aborts.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Write nodes, nodes_tags, ways, ways_nodes and ways_tags CSV files.
    Shape,
    /// Report street names with unexpected suffixes.
    AuditStreets,
    /// Report malformed and out-of-region postal codes.
    AuditPostcodes,
    /// Count element names in the document.
    CountTags,
    /// Write every k-th top-level element to a smaller .osm file.
    Sample,
    /// Audits first, then shape.
    All,
}

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let mut user_config = UserConfig::load(&cli.config)?;
    if cli.validate {
        user_config.validate = true;
    }

    match cli.command {
        Command::Shape => {
            ShapeCsvEtl::new(&user_config).process()?;
        },
        Command::AuditStreets => {
            StreetAuditEtl::new(&user_config).process()?;
        },
        Command::AuditPostcodes => {
            PostcodeAuditEtl::new(&user_config).process()?;
        },
        Command::CountTags => {
            TagCensusEtl::new(&user_config).process()?;
        },
        Command::Sample => {
            SampleEtl::new(&user_config).process()?;
        },
        Command::All => {
            TagCensusEtl::new(&user_config).process()?;
            StreetAuditEtl::new(&user_config).process()?;
            PostcodeAuditEtl::new(&user_config).process()?;
            ShapeCsvEtl::new(&user_config).process()?;
        },
    }
    Ok(())
}
