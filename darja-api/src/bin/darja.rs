use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use darja_api::SegmentationService;
use darja_segmenter::{Lexicon, SegmenterConfig};
use darja_storage::{LocalCategoryStore, SinkFormat};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "darja", about = "Clitic segmenter for Algerian Arabic")]
struct Cli {
    /// Root word list, one word per line
    #[arg(long, env = "DARJA_ROOTS", global = true)]
    roots: Option<PathBuf>,

    /// Terminal word list, one word per line
    #[arg(long, env = "DARJA_TERMINALS", global = true)]
    terminals: Option<PathBuf>,

    /// Directory receiving the category files
    #[arg(long, env = "DARJA_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Category file format (lines or json)
    #[arg(long, default_value = "lines", global = true)]
    format: SinkFormat,

    /// Keep segmenting the word that follows ال or لل
    #[arg(long, global = true)]
    recurse_after_article: bool,

    /// Allow several person or preposition prefixes on one word
    #[arg(long, global = true)]
    allow_stacked_prefixes: bool,

    /// Write لل as ل+ل instead of ل+ال
    #[arg(long, global = true)]
    literal_double_lam: bool,

    /// Emit logs as JSON
    #[arg(long, env = "DARJA_LOG_JSON", global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment TEXT, or stdin when omitted
    Segment {
        text: Option<String>,

        /// Also print the category buckets as JSON
        #[arg(long)]
        categories: bool,
    },
    /// Read one JSON request per line and write one JSON reply per line
    Pipe,
    /// Segment every line of FILE
    Batch { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_observability(cli.json_logs);

    let service = build_service(&cli)?;

    match cli.command {
        Command::Segment { text, categories } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let output = service.segment_text(&text)?;
            println!("{}", output.text);
            if categories {
                println!("{}", serde_json::to_string_pretty(&output.buckets)?);
            }
        }
        Command::Pipe => {
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                writeln!(stdout, "{}", service.handle_json(&line))?;
                stdout.flush()?;
            }
        }
        Command::Batch { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let lines: Vec<&str> = content.lines().collect();
            let outputs = service.segment_batch(&lines)?;
            let mut stdout = io::stdout().lock();
            for output in outputs {
                writeln!(stdout, "{}", output.text)?;
            }
        }
    }

    Ok(())
}

fn build_service(cli: &Cli) -> anyhow::Result<SegmentationService> {
    let mut lexicon = Lexicon::new();
    if let Some(path) = &cli.roots {
        lexicon = lexicon.load_roots(path);
    }
    if let Some(path) = &cli.terminals {
        lexicon = lexicon.load_terminals(path);
    }
    info!(
        roots = lexicon.root_count(),
        terminals = lexicon.terminal_count(),
        "lexicon loaded"
    );

    let config = SegmenterConfig {
        recurse_after_article: cli.recurse_after_article,
        limit_stacked_prefixes: !cli.allow_stacked_prefixes,
        restore_elided_article: !cli.literal_double_lam,
    };
    let mut service = SegmentationService::new(lexicon).with_config(config);

    if let Some(dir) = &cli.output_dir {
        let store = LocalCategoryStore::new(dir)
            .with_context(|| format!("opening output directory {}", dir.display()))?
            .with_format(cli.format);
        info!("Category output directory: {:?}", store.root());
        service = service.with_sink(Arc::new(store));
    }

    Ok(service)
}

fn init_observability(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,darja_api=debug".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_line_number(true)
            .with_file(true)
            .json()
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
