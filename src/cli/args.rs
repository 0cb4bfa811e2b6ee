//! CLI argument definitions using clap
//!
//! Commands:
//! - aeroquery analyze [--config <path>] [query options]
//! - aeroquery explain [--config <path>] [query options]
//! - aeroquery pipeline [--config <path>] [query options]
//!
//! Every command reads one JSON syntax tree from stdin.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::options::{QueryProcessingStage, SelectQueryOptions};

/// aeroquery - SELECT analysis and plan construction
#[derive(Parser, Debug)]
#[command(name = "aeroquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the result header of a query
    Analyze(QueryArgs),

    /// Print the logical plan of a query
    Explain(QueryArgs),

    /// Build the physical pipeline of a query and print it
    Pipeline(QueryArgs),
}

impl Command {
    pub fn args(&self) -> &QueryArgs {
        match self {
            Command::Analyze(args) | Command::Explain(args) | Command::Pipeline(args) => args,
        }
    }
}

/// Options shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Path to configuration file; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shard number exposed as `_shard_num`
    #[arg(long)]
    pub shard_num: Option<u32>,

    /// Shard count exposed as `_shard_count`
    #[arg(long)]
    pub shard_count: Option<u32>,

    /// Run only the mandatory analysis pass
    #[arg(long)]
    pub ignore_ast_optimizations: bool,

    /// Do not attach the session quota
    #[arg(long)]
    pub ignore_quota: bool,

    /// Processing stage to plan up to
    #[arg(long, value_enum, default_value_t = Stage::Complete)]
    pub stage: Stage,
}

impl QueryArgs {
    pub fn options(&self) -> SelectQueryOptions {
        let mut options = SelectQueryOptions::new()
            .with_stage(self.stage.into())
            .ignore_ast_optimizations(self.ignore_ast_optimizations)
            .ignore_quota(self.ignore_quota);
        options.shard_num = self.shard_num;
        options.shard_count = self.shard_count;
        options
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    FetchColumns,
    WithMergeableState,
    #[default]
    Complete,
}

impl From<Stage> for QueryProcessingStage {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::FetchColumns => QueryProcessingStage::FetchColumns,
            Stage::WithMergeableState => QueryProcessingStage::WithMergeableState,
            Stage::Complete => QueryProcessingStage::Complete,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_options() {
        let cli = Cli::try_parse_from([
            "aeroquery",
            "analyze",
            "--shard-num",
            "2",
            "--shard-count",
            "4",
            "--stage",
            "with-mergeable-state",
            "--ignore-ast-optimizations",
        ])
        .unwrap();

        let options = cli.command.args().options();
        assert_eq!(options.shard_num, Some(2));
        assert_eq!(options.shard_count, Some(4));
        assert!(options.ignore_ast_optimizations);
        assert!(!options.ignore_quota);
        assert_eq!(options.to_stage, QueryProcessingStage::WithMergeableState);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["aeroquery", "pipeline"]).unwrap();
        let args = cli.command.args();

        assert!(args.config.is_none());
        assert_eq!(args.options(), SelectQueryOptions::new());
    }
}
