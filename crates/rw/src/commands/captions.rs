//! `rw captions` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rw_captions::{CaptionExtension, CaptionOptions, CaptionOutcome, FigureType, FigureTypes};
use rw_config::{CaptionsConfig, CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the captions command.
#[derive(Args)]
pub(crate) struct CaptionsArgs {
    /// Path to the XHTML document with caption blocks.
    input: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable automatic numbering (overrides config).
    #[arg(long)]
    no_auto: bool,

    /// Prepend captions by default (overrides config).
    #[arg(long)]
    prepend: bool,

    /// Maximum numbered depth, 0 for unlimited (overrides config).
    #[arg(long)]
    auto_level: Option<usize>,

    /// Enable verbose output (info-level logging).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CaptionsArgs {
    /// Execute the captions command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, reading, parsing or
    /// writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            auto: self.no_auto.then_some(false),
            prepend: self.prepend.then_some(true),
            auto_level: self.auto_level,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let extension = CaptionExtension::new(caption_options(&config.captions));

        let source = std::fs::read_to_string(&self.input)?;
        tracing::info!(input = %self.input.display(), "Processing captions");
        let (html, outcome) = extension.process_html(&source)?;

        output.block_warnings(&outcome.warnings);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.written(path, &summary(&outcome));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

/// Convert the `[captions]` section into extension options.
fn caption_options(config: &CaptionsConfig) -> CaptionOptions {
    let types: FigureTypes = config
        .types
        .iter()
        .map(|t| FigureType {
            name: t.name.clone(),
            prefix: t.prefix.clone(),
        })
        .collect();

    CaptionOptions::default()
        .with_types(types)
        .with_auto(config.auto)
        .with_prepend(config.prepend)
        .with_auto_level(config.auto_level)
}

fn summary(outcome: &CaptionOutcome) -> String {
    match &outcome.numbering {
        Some(report) => format!(
            "{} caption block(s), {} figure(s) numbered",
            outcome.blocks,
            report.numbered.len()
        ),
        None => format!("{} caption block(s)", outcome.blocks),
    }
}
