//! CLI subcommands

pub mod extract;
pub mod inspect;
pub mod textures;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and convert every model referenced by a descriptor
    Extract {
        /// Lua model descriptor file
        descriptor: PathBuf,

        /// Output directory (default: extracted_files/ next to the descriptor)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON extraction report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only print the final counts, not per-entry results
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the texture names declared by a descriptor
    Textures {
        /// Lua model descriptor file
        descriptor: PathBuf,
    },

    /// Print a mesh summary of an extracted NUD container
    Inspect {
        /// NUD container file
        model: PathBuf,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Extract {
                descriptor,
                output,
                report,
                quiet,
            } => extract::execute(descriptor, output.as_deref(), report.as_deref(), *quiet),
            Commands::Textures { descriptor } => textures::execute(descriptor),
            Commands::Inspect { model } => inspect::execute(model),
        }
    }
}
