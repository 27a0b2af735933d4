//! Command-line interface definitions using clap.

use crate::visualization::Direction;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Organizational hierarchy charts
///
/// Builds the reporting graph around one employee (their chain of approving
/// managers and everyone reporting to them) and prints it as a Mermaid
/// flowchart or Graphviz DOT description.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or usage error
///   3  - Employee or input file not found
///   4  - Diagram renderer failed
///  10  - Failed to read or parse input data
#[derive(Parser)]
#[command(name = "orgchart")]
#[command(about = "Organizational hierarchy charts", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./orgchart.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Employee collection file; repeat for more, earlier files win
    #[arg(short, long = "source", global = true, value_name = "FILE")]
    pub sources: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the hierarchy graph for an employee and print its description
    Graph {
        /// Focal employee id
        employee_id: String,

        /// Description format
        #[arg(long, value_enum, default_value_t = GraphFormat::Mermaid)]
        format: GraphFormat,

        /// Flowchart direction (overrides config)
        #[arg(long, value_enum)]
        direction: Option<Direction>,

        /// Identifier handed to the renderer (default: orgchart-<uuid>)
        #[arg(long)]
        diagram_id: Option<String>,

        /// Renderer to hand the description to
        #[arg(long, value_enum, default_value_t = RenderMode::None)]
        render: RenderMode,

        /// Omit role names from node labels
        #[arg(long)]
        no_role: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the chain of approving managers, topmost first
    Chain {
        /// Employee id
        employee_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print everyone reporting to an employee, directly or indirectly
    Reports {
        /// Employee id
        employee_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output format of `orgchart graph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl GraphFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphFormat::Mermaid => "mermaid",
            GraphFormat::Dot => "dot",
        }
    }
}

/// Renderer selected for `orgchart graph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// Print the description as is
    None,
    /// Wrap the description in a fenced mermaid block
    Markdown,
    /// Produce SVG with the Mermaid CLI
    Mmdc,
}
