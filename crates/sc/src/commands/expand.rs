//! `expand` command implementation.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use sc_engine::{Environment, Processor, ProcessorConfig, SYSTEM_CONTEXT, TextFormat};

use super::{RegistryArgs, build_registry};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the expand command.
#[derive(Args)]
pub(crate) struct ExpandArgs {
    /// File to expand (default: read stdin).
    file: Option<PathBuf>,

    /// Context identifier handed to handlers.
    #[arg(long, default_value = SYSTEM_CONTEXT)]
    context: String,

    /// Environment value as KEY=VALUE (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    values: Vec<(String, String)>,

    /// Format the input text was written in.
    #[arg(long, default_value = "plain")]
    format: TextFormat,

    /// Tell handlers not to sanitize their output.
    #[arg(long)]
    no_clean: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl ExpandArgs {
    /// Execute the expand command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.registry.load_config()?;

        let text = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };

        let registry = build_registry(&config);
        registry.load().map_err(|e| CliError::Discovery(e.to_string()))?;

        let mut processor = Processor::new(registry).with_config(ProcessorConfig {
            max_depth: config.processor.max_depth,
        });
        processor.set_environment(self.environment());
        let expanded = processor.process(&text)?;

        output.text(&expanded)?;
        Ok(())
    }

    fn environment(&self) -> Environment {
        self.values.iter().fold(
            Environment::new(self.context.as_str())
                .with_format(self.format)
                .with_no_clean(self.no_clean),
            |env, (key, value)| env.with_value(key.as_str(), value.as_str()),
        )
    }
}

/// Parse a `KEY=VALUE` pair. The value may be empty or contain `=`.
fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}
