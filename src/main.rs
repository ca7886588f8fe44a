mod config;
mod extract;
mod types;
mod writer;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use config::{load_config_file, resolve_base_dir};
use extract::extract_code_blocks;
use types::CodeBlock;
use writer::FileManager;

/// One message to process, with a label for log lines.
struct Message {
    source: String,
    text: String,
}

fn main() -> Result<()> {
    let matches = Command::new("md2files")
        .version("0.1.0")
        .about("md2files: writes ````lang:path fenced blocks from a message out to files.")
        .arg(
            Arg::new("inputs")
                .help("Message files to process (reads stdin when none are given)")
                .num_args(0..),
        )
        .arg(
            Arg::new("base-dir")
                .short('o')
                .long("base-dir")
                .value_name("DIR")
                .help("Directory block paths are resolved against")
                .required(false),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("List extracted blocks without writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("With --dry-run, print the block list as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .unwrap_or_default()
        .map(PathBuf::from)
        .collect();
    let messages = read_messages(&inputs)?;

    if matches.get_flag("dry-run") {
        let blocks: Vec<CodeBlock> = messages
            .iter()
            .flat_map(|m| extract_code_blocks(&m.text))
            .collect();
        return list_blocks(&blocks, matches.get_flag("json"));
    }

    let config = load_config_file(Path::new("."))?;
    let base_dir = resolve_base_dir(
        matches.get_one::<String>("base-dir").map(PathBuf::from),
        config.as_ref(),
    );
    let manager = FileManager::new(base_dir)?;

    for message in &messages {
        tracing::debug!(
            "Processing {} into {}",
            message.source,
            manager.base_dir().display()
        );
        manager.process_message(&message.text);
    }

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--debug`.
fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(io::stderr)
        .init();
}

fn read_messages(inputs: &[PathBuf]) -> Result<Vec<Message>> {
    if inputs.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            bail!("no input files given and stdin is a terminal; pipe a message or pass a file");
        }
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read message from stdin")?;
        return Ok(vec![Message {
            source: "<stdin>".to_string(),
            text,
        }]);
    }

    inputs
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Message {
                source: path.display().to_string(),
                text,
            })
        })
        .collect()
}

fn list_blocks(blocks: &[CodeBlock], json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut handle, blocks)?;
        writeln!(handle)?;
    } else {
        for block in blocks {
            writeln!(
                handle,
                "{}\t{}\t{} bytes",
                block.language.as_deref().unwrap_or("-"),
                block.rel_path,
                block.content.len()
            )?;
        }
    }

    handle.flush()?;
    Ok(())
}
