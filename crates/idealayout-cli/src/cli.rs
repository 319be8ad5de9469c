//! Command-line interface for the idealayout utility
//!
//! Reads an idea-graph document as JSON, lays it out, and writes it back.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use idealayout::core::logging::{init_logging, FORMAT_ENV, LEVEL_ENV};
use idealayout::document::{config_from_json, GraphDocument};
use idealayout::layout::{LayoutEngine, LayoutStatus, LayoutSummary, RelayoutScope};
use idealayout::{CycleFallback, LayoutConfig, LayoutError};

/// Idealayout - Lay out idea graphs in stable left-to-right columns
#[derive(Parser)]
#[command(name = "idealayout")]
#[command(about = "Lay out directed idea graphs in stable, incremental columns")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// JSON layout config file; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Horizontal gap between columns
    #[arg(long)]
    pub column_gap: Option<f64>,

    /// Vertical gap between nodes in a column
    #[arg(long)]
    pub row_gap: Option<f64>,

    /// Width for nodes without one
    #[arg(long)]
    pub default_width: Option<f64>,

    /// Height for nodes without one
    #[arg(long)]
    pub default_height: Option<f64>,

    /// Node count up to which relayout always covers the whole graph
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Ranking order used when the graph has a cycle
    #[arg(long, value_enum)]
    pub cycle_fallback: Option<FallbackChoice>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Cycle fallback policies
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FallbackChoice {
    /// Rank every node in input order
    InputOrder,
    /// Keep the partial order and append the nodes stuck in cycles
    AppendUnordered,
}

impl From<FallbackChoice> for CycleFallback {
    fn from(value: FallbackChoice) -> Self {
        match value {
            FallbackChoice::InputOrder => CycleFallback::InputOrder,
            FallbackChoice::AppendUnordered => CycleFallback::AppendUnordered,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out every node of a graph document
    Layout {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output graph document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-place the nodes an edit to one node can have moved
    Relayout {
        /// Id of the edited node
        #[arg(short, long)]
        changed: String,

        /// Fail when the changed id is not in the document
        #[arg(long)]
        strict: bool,

        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output graph document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the rank and row of every node
    Ranks {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check a graph document for duplicate ids, dangling edges and cycles
    Validate {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// One line of `ranks` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankRow {
    pub id: String,
    pub rank: usize,
    /// Index of the node within its column, top to bottom
    pub row: usize,
}

/// Main CLI application
pub struct IdeaLayoutApp {
    engine: LayoutEngine,
}

impl IdeaLayoutApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create a new application instance with a layout config
    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            engine: LayoutEngine::with_config(config),
        }
    }

    /// Layout config from `--config` and the spacing flags
    pub fn build_config(cli: &Cli) -> Result<LayoutConfig> {
        let mut config = match &cli.config {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    anyhow!("Failed to read config file '{}': {}", path.display(), e)
                })?;
                config_from_json(&content)?
            }
            None => LayoutConfig::default(),
        };

        if let Some(gap) = cli.column_gap {
            config.column_gap = gap;
        }
        if let Some(gap) = cli.row_gap {
            config.row_gap = gap;
        }
        if let Some(width) = cli.default_width {
            config.default_width = width;
        }
        if let Some(height) = cli.default_height {
            config.default_height = height;
        }
        if let Some(threshold) = cli.threshold {
            config.incremental_threshold = threshold;
        }
        if let Some(fallback) = cli.cycle_fallback {
            config.cycle_fallback = fallback.into();
        }

        config.validate()?;
        Ok(config)
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flags
        let log_level_str = std::env::var(LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var(FORMAT_ENV)
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Idealayout v{}", env!("CARGO_PKG_VERSION"));
        }

        check_flags(&cli)?;
        let config = Self::build_config(&cli)?;
        debug!(?config, "Resolved layout config");
        self.engine = LayoutEngine::with_config(config);

        match cli.command {
            Commands::Layout { input, output } => self.layout_command(input, output, cli.verbose),
            Commands::Relayout {
                changed,
                strict,
                input,
                output,
            } => self.relayout_command(&changed, strict, input, output, cli.verbose),
            Commands::Ranks { input, json } => self.ranks_command(input, json, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    /// Handle the layout command
    fn layout_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let document = self.read_document(input)?;
        let (document, summary) = document.relayout_all(&self.engine);

        if verbose {
            report_summary(&summary);
        }

        self.write_output(output, &document.to_json_string()?)
    }

    /// Handle the relayout command
    fn relayout_command(
        &self,
        changed: &str,
        strict: bool,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let document = self.read_document(input)?;
        if strict && !document.contains_node(changed) {
            return Err(LayoutError::unknown_node(changed).into());
        }

        let (document, summary) = document.relayout_from(&self.engine, changed);

        if verbose {
            report_summary(&summary);
        }

        self.write_output(output, &document.to_json_string()?)
    }

    /// Handle the ranks command
    fn ranks_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let document = self.read_document(input)?;
        let rows = self.rank_rows(document);

        if verbose {
            eprintln!("Ranked {} nodes", rows.len());
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for row in &rows {
                println!("{}\trank {}\trow {}", row.id, row.rank, row.row);
            }
        }
        Ok(())
    }

    /// Rank and row of every node, in document order
    pub fn rank_rows(&self, document: GraphDocument) -> Vec<RankRow> {
        let (document, summary) = document.relayout_all(&self.engine);

        let rows: HashMap<&str, usize> = summary
            .columns
            .iter()
            .flat_map(|column| column.iter().enumerate().map(|(row, id)| (id.as_str(), row)))
            .collect();

        document
            .nodes
            .iter()
            .filter_map(|node| {
                let rank = *summary.ranks.get(&node.id)?;
                let row = rows.get(node.id.as_str()).copied().unwrap_or(0);
                Some(RankRow {
                    id: node.id.clone(),
                    rank,
                    row,
                })
            })
            .collect()
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let document = self.read_document(input)?;

        match document.validate() {
            Ok(report) => {
                println!(
                    "✓ Valid graph: {} nodes, {} edges",
                    report.node_count, report.edge_count
                );
                if report.dangling_edges > 0 {
                    println!("  {} edges reference missing nodes", report.dangling_edges);
                }
                if report.has_cycle {
                    println!("  graph contains a cycle; layout will be degraded");
                }
                if verbose {
                    eprintln!("{}", serde_json::to_string(&report)?);
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid graph: {}", e);
                Err(e.into())
            }
        }
    }

    fn read_document(&self, input: Option<PathBuf>) -> Result<GraphDocument> {
        let content = self.read_input(input)?;
        debug!(bytes = content.len(), "Read input");
        Ok(GraphDocument::from_json_str(&content)?)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input.filter(|path| !is_std_stream(path)) {
            Some(path) => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            None => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output.filter(|path| !is_std_stream(path)) {
            Some(path) => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                info!(path = %path.display(), "Wrote document");
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Get a reference to the engine (for testing)
    #[cfg(test)]
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }
}

impl Default for IdeaLayoutApp {
    fn default() -> Self {
        Self::new()
    }
}

fn is_std_stream(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn report_summary(summary: &LayoutSummary) {
    match summary.scope {
        RelayoutScope::Full => eprintln!("Laid out {} nodes", summary.ranks.len()),
        RelayoutScope::Partial {
            min_rank,
            movable,
            fixed,
            ..
        } => eprintln!(
            "Re-placed {} nodes from rank {} ({} fixed)",
            movable, min_rank, fixed
        ),
    }
    eprintln!(
        "{} columns, {} crossings",
        summary.columns.len(),
        summary.crossings
    );
    if let LayoutStatus::Degraded(reason) = summary.status {
        eprintln!("Warning: layout degraded: {:?}", reason);
    }
}

/// Reject the run before touching any file if the flags are unusable
pub fn check_flags(cli: &Cli) -> Result<()> {
    if let Commands::Relayout { changed, .. } = &cli.command {
        if changed.is_empty() {
            bail!("--changed must not be empty");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use idealayout::Position;
    use std::fs;
    use tempfile::tempdir;

    const TWO_NODES: &str = r#"{
        "nodes": [ { "id": "A", "data": { "label": "Idea" } }, { "id": "B" } ],
        "edges": [ { "id": "e1", "source": "A", "target": "B" } ]
    }"#;

    fn write_input(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("graph.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_cli_parsing_layout_command() {
        let args = vec!["idealayout", "layout", "--input", "in.json", "--output", "out.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Layout { input, output } => {
                assert_eq!(input.unwrap().to_string_lossy(), "in.json");
                assert_eq!(output.unwrap().to_string_lossy(), "out.json");
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn test_cli_parsing_relayout_command() {
        let args = vec!["idealayout", "relayout", "--changed", "n7", "--strict"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Relayout {
                changed,
                strict,
                input,
                ..
            } => {
                assert_eq!(changed, "n7");
                assert!(strict);
                assert!(input.is_none());
            }
            _ => panic!("Expected Relayout command"),
        }
    }

    #[test]
    fn test_relayout_requires_changed() {
        let args = vec!["idealayout", "relayout"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_ranks_command() {
        let args = vec!["idealayout", "ranks", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Ranks { json, .. } => assert!(json),
            _ => panic!("Expected Ranks command"),
        }
    }

    #[test]
    fn test_layout_flags_build_config() {
        let args = vec![
            "idealayout",
            "--column-gap",
            "80",
            "--threshold",
            "5",
            "--cycle-fallback",
            "append-unordered",
            "validate",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = IdeaLayoutApp::build_config(&cli).unwrap();
        assert_eq!(config.column_gap, 80.0);
        assert_eq!(config.row_gap, 40.0);
        assert_eq!(config.incremental_threshold, 5);
        assert_eq!(config.cycle_fallback, CycleFallback::AppendUnordered);
    }

    #[test]
    fn test_config_file_with_flag_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, r#"{ "row_gap": 8, "column_gap": 20 }"#).unwrap();

        let args = vec![
            "idealayout".to_string(),
            "--config".to_string(),
            path.to_string_lossy().into_owned(),
            "--column-gap".to_string(),
            "30".to_string(),
            "validate".to_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = IdeaLayoutApp::build_config(&cli).unwrap();
        assert_eq!(config.row_gap, 8.0);
        assert_eq!(config.column_gap, 30.0);
    }

    #[test]
    fn test_negative_gap_is_rejected() {
        let args = vec!["idealayout", "--row-gap=-3", "validate"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(IdeaLayoutApp::build_config(&cli).is_err());
    }

    #[test]
    fn test_app_default() {
        let app = IdeaLayoutApp::default();
        assert_eq!(app.engine().config(), &LayoutConfig::default());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let path = write_input(dir.path(), TWO_NODES);

        let content = app.read_input(Some(path)).unwrap();
        assert_eq!(content, TWO_NODES);
    }

    #[test]
    fn test_read_missing_file() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let err = app.read_input(Some(dir.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        app.write_output(Some(path.clone()), "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_layout_command_writes_positions() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), TWO_NODES);
        let output = dir.path().join("out.json");

        app.layout_command(Some(input), Some(output.clone()), false).unwrap();

        let document = GraphDocument::from_json_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(document.nodes[0].position, Position::new(0.0, 0.0));
        assert_eq!(document.nodes[1].position.x, 480.0);
        assert_eq!(document.nodes[0].data["label"], "Idea");
    }

    #[test]
    fn test_relayout_command_strict_unknown_id() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), TWO_NODES);
        let output = dir.path().join("out.json");

        let err = app
            .relayout_command("ghost", true, Some(input.clone()), Some(output.clone()), false)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown node: ghost"));
        assert!(!output.exists());

        app.relayout_command("ghost", false, Some(input), Some(output.clone()), false)
            .unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_rank_rows() {
        let app = IdeaLayoutApp::new();
        let document = GraphDocument::from_json_str(
            r#"{ "nodes": [ { "id": "A" }, { "id": "B" }, { "id": "C" } ],
                 "edges": [ { "id": "1", "source": "A", "target": "B" },
                            { "id": "2", "source": "A", "target": "C" } ] }"#,
        )
        .unwrap();

        let rows = app.rank_rows(document);
        assert_eq!(
            rows,
            vec![
                RankRow { id: "A".into(), rank: 0, row: 0 },
                RankRow { id: "B".into(), rank: 1, row: 0 },
                RankRow { id: "C".into(), rank: 1, row: 1 },
            ]
        );
    }

    #[test]
    fn test_validate_command_duplicate_ids() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), r#"{ "nodes": [ { "id": "A" }, { "id": "A" } ] }"#);

        let err = app.validate_command(Some(input), false).unwrap_err();
        assert!(err.to_string().contains("Duplicate node id"));
    }

    #[test]
    fn test_validate_command_accepts_dangling_edge() {
        let app = IdeaLayoutApp::new();
        let dir = tempdir().unwrap();
        let input = write_input(
            dir.path(),
            r#"{ "nodes": [ { "id": "A" } ],
                 "edges": [ { "id": "1", "source": "A", "target": "gone" } ] }"#,
        );
        assert!(app.validate_command(Some(input), false).is_ok());
    }

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from(vec!["idealayout", "relayout", "--changed", ""]).unwrap();
        assert!(check_flags(&cli).is_err());
        let cli = Cli::try_parse_from(vec!["idealayout", "layout"]).unwrap();
        assert!(check_flags(&cli).is_ok());
    }

    #[test]
    fn test_verbose_flag() {
        let args = vec!["idealayout", "--verbose", "layout"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
    }
}
