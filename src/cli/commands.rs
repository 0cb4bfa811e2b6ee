//! CLI command implementations
//!
//! Each command:
//! 1. Loads the configuration (defaults when no path is given)
//! 2. Reads one syntax tree from stdin
//! 3. Compiles it with `SelectInterpreter`
//! 4. Writes one JSON response to stdout

use serde_json::{json, Value};

use crate::ast::SyntaxTree;
use crate::config::EngineConfig;
use crate::context::ExecutionContext;
use crate::interpreter::SelectInterpreter;
use crate::options::SelectQueryOptions;

use super::args::{Command, QueryArgs};
use super::errors::CliResult;
use super::io::{read_query, write_response};

/// Run the CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    let context = load_context(command.args())?;
    let query = read_query()?;
    let data = respond(&command, &query, &context)?;
    write_response(data)
}

fn load_context(args: &QueryArgs) -> CliResult<ExecutionContext> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    Ok(config.into_context())
}

/// Compile `query` and produce the response payload of `command`
pub fn respond(command: &Command, query: &SyntaxTree, context: &ExecutionContext) -> CliResult<Value> {
    let options = command.args().options();
    match command {
        Command::Analyze(_) => analyze(query, context, options),
        Command::Explain(_) => explain(query, context, options),
        Command::Pipeline(_) => pipeline(query, context, options),
    }
}

fn analyze(
    query: &SyntaxTree,
    context: &ExecutionContext,
    options: SelectQueryOptions,
) -> CliResult<Value> {
    let header = SelectInterpreter::sample_block_for(query, context, options)?;
    Ok(json!({ "columns": header }))
}

fn explain(
    query: &SyntaxTree,
    context: &ExecutionContext,
    options: SelectQueryOptions,
) -> CliResult<Value> {
    let mut interpreter = SelectInterpreter::new(query, context, options)?;
    let plan = interpreter.explain_plan()?;
    let header = interpreter.sample_block()?;

    Ok(json!({
        "query": interpreter.query().to_string(),
        "stage": options.to_stage.as_str(),
        "columns": header,
        "plan": plan,
    }))
}

fn pipeline(
    query: &SyntaxTree,
    context: &ExecutionContext,
    options: SelectQueryOptions,
) -> CliResult<Value> {
    let mut interpreter = SelectInterpreter::new(query, context, options)?;
    let result = interpreter.execute()?;
    let pipeline = result.pipeline();

    let processors: Vec<Value> = pipeline
        .processors()
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "description": p.description,
                "streams": p.streams,
            })
        })
        .collect();

    Ok(json!({
        "columns": pipeline.header(),
        "num_threads": pipeline.num_threads(),
        "max_block_size": pipeline.max_block_size(),
        "quota": pipeline.quota().map(|q| q.name().to_string()),
        "processors": processors,
        "pipeline": pipeline.explain(),
    }))
}
