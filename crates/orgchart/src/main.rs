//! orgchart command-line tool
//!
//! Loads employee collections named in `orgchart.toml` or on the command line,
//! builds the hierarchy graph around one employee and prints it.

use anyhow::{Context, Result};
use clap::Parser;
use orgchart::ancestors::resolve_ancestors;
use orgchart::cli::{Cli, Commands, GraphFormat, RenderMode};
use orgchart::config::OrgchartConfig;
use orgchart::domain::ChainEnd;
use orgchart::output::{
    ChainResponse, ExitCode, GraphResponse, JsonError, JsonOutput, OutputContext, ReportsResponse,
};
use orgchart::renderer::{render_diagram, MarkdownRenderer, MermaidCliRenderer};
use orgchart::sources::{DirectorySource, JsonFileSource};
use orgchart::subtree::collect_descendants;
use orgchart::visualization::{export_dot, render, DiagramRequest};
use orgchart::{DiagramRenderer, EmployeeLookup, GraphBuilder, OrgchartError};
use std::env;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "ORGCHART_LOG";

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let (command_name, json) = match &cli.command {
        Commands::Graph { json, .. } => ("graph", *json),
        Commands::Chain { json, .. } => ("chain", *json),
        Commands::Reports { json, .. } => ("reports", *json),
    };

    let exit_code = match run(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let error = JsonError::from_error(&e, command_name);
            match error.to_json_string() {
                Ok(text) if json => println!("{}", text),
                _ => eprintln!("Error: {:#}", e),
            }
            error.exit_code()
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Graph {
        format: GraphFormat::Dot,
        render,
        ..
    } = &cli.command
    {
        if *render != RenderMode::None {
            return Err(OrgchartError::InvalidArgument(
                "--render needs --format mermaid".to_string(),
            )
            .into());
        }
    }

    let current_dir = env::current_dir()?;
    let config = OrgchartConfig::discover(cli.config.as_deref(), &current_dir)
        .context("Failed to load configuration")?;

    // Config sources first, then --source files in the order given
    let mut files = config.source_files();
    files.extend(cli.sources);
    if files.is_empty() {
        return Err(OrgchartError::NoSources)
            .context("Pass --source <file> or list files under [sources] in orgchart.toml");
    }
    let lookup = JsonFileSource::new(&files).snapshot()?;

    match cli.command {
        Commands::Graph {
            employee_id,
            format,
            direction,
            diagram_id,
            render: mode,
            no_role,
            json,
        } => {
            let output = OutputContext::new(cli.quiet, json);
            let catalog = config.role_catalog()?;
            let render_config = config.render();
            let direction = direction.unwrap_or_else(|| render_config.direction());

            let focal = lookup.require(&employee_id)?;
            let graph = GraphBuilder::new(&lookup, &catalog)
                .show_role(render_config.show_role() && !no_role)
                .build(focal);

            for edge in &graph.diagnostics.back_references {
                output.print_warning(format!(
                    "reporting loop: link {} -> {} not drawn",
                    edge.parent_id, edge.child_id
                ))?;
            }
            for id in &graph.diagnostics.unknown_managers {
                output.print_warning(format!("unknown manager id {}", id))?;
            }

            let diagram_id =
                diagram_id.unwrap_or_else(|| format!("orgchart-{}", uuid::Uuid::new_v4()));
            let request = match format {
                GraphFormat::Mermaid => render(&graph, &diagram_id, direction),
                GraphFormat::Dot => DiagramRequest {
                    description: export_dot(&graph, direction),
                    diagram_id: diagram_id.clone(),
                },
            };

            let markup = match mode {
                RenderMode::None => None,
                RenderMode::Markdown => Some(hand_off(&MarkdownRenderer, &request)?),
                RenderMode::Mmdc => {
                    let renderer = MermaidCliRenderer::new(render_config.mmdc_path());
                    Some(hand_off(&renderer, &request)?)
                }
            };

            if json {
                let data = GraphResponse {
                    graph: &graph,
                    diagram_id: &request.diagram_id,
                    format: format.as_str(),
                    description: &request.description,
                    markup: markup.as_deref(),
                };
                println!("{}", JsonOutput::success(data, "graph").to_json_string()?);
            } else {
                let text = markup.as_deref().unwrap_or(&request.description);
                output.print_data(text.trim_end())?;
            }
        }
        Commands::Chain { employee_id, json } => {
            let output = OutputContext::new(cli.quiet, json);
            let focal = lookup.require(&employee_id)?;
            let chain = resolve_ancestors(&lookup, focal);

            if json {
                let data = ChainResponse {
                    employee_id: &employee_id,
                    count: chain.len(),
                    ancestors: chain.ancestors.clone(),
                    end: &chain.end,
                };
                println!("{}", JsonOutput::success(data, "chain").to_json_string()?);
                return Ok(());
            }

            for ancestor in &chain.ancestors {
                output.print_data(format!("{}\t{}", ancestor.id, ancestor.display_name))?;
            }
            match &chain.end {
                ChainEnd::Root => {}
                ChainEnd::UnknownManager(id) => {
                    output.print_warning(format!("chain stops at unknown manager id {}", id))?
                }
                ChainEnd::Cycle(id) => {
                    output.print_warning(format!("chain loops back to {}", id))?
                }
            }
        }
        Commands::Reports { employee_id, json } => {
            let output = OutputContext::new(cli.quiet, json);
            let root = lookup.require(&employee_id)?;
            let reports = collect_descendants(&lookup, &root.id);

            if json {
                let data = ReportsResponse {
                    employee_id: &employee_id,
                    count: reports.len(),
                    reports,
                };
                println!("{}", JsonOutput::success(data, "reports").to_json_string()?);
                return Ok(());
            }

            for report in &reports {
                output.print_data(format!(
                    "{}\t{}\t{}",
                    report.id,
                    report.display_name,
                    report.manager_id().unwrap_or("-")
                ))?;
            }
            if reports.is_empty() {
                output.print_warning(format!("{} has no reports", employee_id))?;
            }
        }
    }

    Ok(())
}

/// Await a renderer on a current-thread runtime
fn hand_off<R>(renderer: &R, request: &DiagramRequest) -> Result<String>
where
    R: DiagramRenderer,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    Ok(runtime
        .block_on(render_diagram(renderer, request))
        .into_result()?)
}
