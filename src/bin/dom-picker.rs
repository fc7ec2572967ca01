//! dom-picker CLI
//!
//! Loads a document fixture, prints element identities, or replays a script of
//! parent-frame messages and pointer events against an embedded editor,
//! writing every outbound message as a JSON line on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dom_picker::{
    DefaultAction, Document, Editor, EditorEvent, EditorOptions, ElementRef, InboundEnvelope, InboundMessage,
    JsonLinesTransport, OutboundMessage, identify_element,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

#[derive(Parser)]
#[command(name = "dom-picker")]
#[command(version)]
#[command(about = "Cross-frame DOM element picker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print index, tag and identifier of every element
    Ids {
        /// Document fixture (ElementNode JSON)
        document: PathBuf,
    },
    /// Replay a JSON-lines event script against the document
    Run {
        /// Document fixture (ElementNode JSON)
        document: PathBuf,

        /// Script file (default: stdin)
        script: Option<PathBuf>,

        /// Additional origin to accept messages from (repeatable)
        #[arg(long = "allow-origin", value_name = "ORIGIN")]
        allow_origins: Vec<String>,
    },
    /// Print the JSON schema of inbound and outbound messages
    Schema,
}

/// One line of a replay script
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum ScriptEvent {
    Message { origin: String, data: Value },
    Click { target: TargetSelector },
    PointerOver { target: TargetSelector },
    PointerOut { target: TargetSelector },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetSelector {
    /// Select by `id` attribute
    Id { id: String },
    /// Select by position in document order
    Index { index: usize },
}

impl TargetSelector {
    fn resolve(&self, document: &Document) -> Option<ElementRef> {
        match self {
            TargetSelector::Id { id } => document.find_by_id_attr(id),
            TargetSelector::Index { index } => document.element_at(*index),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ids { document } => print_ids(&document).await,
        Command::Run {
            document,
            script,
            allow_origins,
        } => run_script(&document, script.as_deref(), allow_origins).await,
        Command::Schema => print_schema(),
    }
}

async fn load_document(path: &Path) -> Result<Document> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    Ok(Document::from_json(&json)?)
}

async fn print_ids(path: &Path) -> Result<()> {
    let document = load_document(path).await?;
    for (index, el) in document.elements().into_iter().enumerate() {
        let tag = document.tag_name(el).unwrap_or_default();
        if let Some(id) = identify_element(&document, el) {
            println!("{}\t{}\t{}", index, tag, id);
        }
    }
    Ok(())
}

async fn run_script(path: &Path, script: Option<&Path>, allow_origins: Vec<String>) -> Result<()> {
    let document = load_document(path).await?;
    log::info!("Loaded {} with {} elements", path.display(), document.count_elements());
    let options = allow_origins
        .into_iter()
        .fold(EditorOptions::default(), |opts, origin| opts.allow_origin(origin));
    let mut editor = Editor::new(document, options, JsonLinesTransport::new(std::io::stdout()));

    let reader: Box<dyn AsyncRead + Unpin> = match script {
        Some(script) => Box::new(
            tokio::fs::File::open(script)
                .await
                .with_context(|| format!("Failed to open script {}", script.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let mut lines = BufReader::new(reader).lines();
    let mut line_number = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let event: ScriptEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Skipping script line {}: {}", line_number, e);
                continue;
            }
        };
        let Some(event) = to_editor_event(event, editor.document()) else {
            log::warn!("Skipping script line {}: target not found", line_number);
            continue;
        };
        if editor.dispatch(event) == DefaultAction::Prevent {
            log::info!("Line {}: default click action prevented", line_number);
        }
    }

    log::info!(
        "Replayed {} lines; {} element(s) selected, state {}",
        line_number,
        editor.selection().len(),
        editor.state()
    );
    Ok(())
}

fn to_editor_event(event: ScriptEvent, document: &Document) -> Option<EditorEvent> {
    let event = match event {
        ScriptEvent::Message { origin, data } => EditorEvent::Message(InboundEnvelope::new(origin, data)),
        ScriptEvent::Click { target } => EditorEvent::Click {
            target: target.resolve(document)?,
        },
        ScriptEvent::PointerOver { target } => EditorEvent::PointerOver {
            target: target.resolve(document)?,
        },
        ScriptEvent::PointerOut { target } => EditorEvent::PointerOut {
            target: target.resolve(document)?,
        },
    };
    Some(event)
}

fn print_schema() -> Result<()> {
    let inbound = schemars::schema_for!(InboundMessage);
    let outbound = schemars::schema_for!(OutboundMessage);
    let schema = serde_json::json!({
        "inbound": inbound,
        "outbound": outbound,
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
