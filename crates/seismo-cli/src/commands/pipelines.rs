//! Pipeline listing and checking.

use crate::commands::common::load_pipeline;
use clap::{Args, Subcommand};
use seismo_config::{PipelineConfig, factory_pipelines};
use std::path::PathBuf;

#[derive(Args)]
pub struct PipelinesArgs {
    #[command(subcommand)]
    command: PipelinesCommand,
}

#[derive(Subcommand)]
enum PipelinesCommand {
    /// List built-in pipelines
    List,

    /// Print a pipeline as TOML
    Show {
        /// Built-in pipeline name or TOML file
        name: String,
    },

    /// Validate a pipeline file, reporting every problem
    Check {
        /// Pipeline TOML file
        file: PathBuf,
    },
}

/// Run the pipelines command.
pub fn run(args: PipelinesArgs) -> anyhow::Result<()> {
    match args.command {
        PipelinesCommand::List => {
            println!("Built-in pipelines:\n");
            for pipeline in factory_pipelines() {
                let ops: Vec<&str> = pipeline.steps.iter().map(|s| s.op()).collect();
                println!("  {:<14} {}", pipeline.name, pipeline.description.as_deref().unwrap_or(""));
                println!("  {:<14} {}", "", ops.join(" -> "));
            }
        }
        PipelinesCommand::Show { name } => {
            print!("{}", load_pipeline(&name)?.to_toml()?);
        }
        PipelinesCommand::Check { file } => {
            let pipeline = PipelineConfig::load(&file)?;
            pipeline.validate()?;
            println!("{}: ok ({} step(s))", file.display(), pipeline.len());
        }
    }
    Ok(())
}
