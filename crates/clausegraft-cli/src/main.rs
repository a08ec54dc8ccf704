mod display;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clausegraft_core::{EditOp, clause_batch};
use clausegraft_docx::corpus::series_a_document;
use clausegraft_docx::{Composer, DocxDocument, normalize};
use clausegraft_parse::{ParserConfig, extract};

#[derive(Parser)]
#[command(name = "clausegraft", version, about = "Stable-id clause structuring and surgical DOCX edits")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    parser: ParserArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ParserArgs {
    /// JSON file with parser style conventions.
    #[arg(long, global = true, env = "CLAUSEGRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Style prefix that opens an article.
    #[arg(long, global = true, env = "CLAUSEGRAFT_TOP_HEADING")]
    top_heading: Option<String>,

    /// Style prefix that opens a section.
    #[arg(long, global = true, env = "CLAUSEGRAFT_SECOND_HEADING")]
    second_heading: Option<String>,

    /// Exact style name that also opens an article.
    #[arg(long, global = true, env = "CLAUSEGRAFT_TITLE_STYLE")]
    title_style: Option<String>,
}

impl ParserArgs {
    /// Defaults, then the config file, then flags and environment.
    fn load(&self) -> anyhow::Result<ParserConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading parser config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing parser config {}", path.display()))?
            }
            None => ParserConfig::default(),
        };
        if let Some(style) = &self.top_heading {
            config.top_heading = style.clone();
        }
        if let Some(style) = &self.second_heading {
            config.second_heading = style.clone();
        }
        if let Some(style) = &self.title_style {
            config.title_style = style.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Give every body paragraph a unique stable id.
    Normalize { input: PathBuf, output: PathBuf },
    /// Print `{full_text, tree}` as JSON (.docx, .txt, .pdf).
    Parse {
        file: PathBuf,
        /// Human-readable outline instead of JSON.
        #[arg(long)]
        outline: bool,
    },
    /// Print the flattened clause table.
    Table {
        file: PathBuf,
        /// Also write the table as an Arrow IPC file.
        #[arg(long)]
        ipc: Option<PathBuf>,
    },
    /// List body paragraphs with id, style and indent.
    Inspect { file: PathBuf },
    /// Apply a JSON edit batch and write the result.
    Apply {
        input: PathBuf,
        ops: PathBuf,
        output: PathBuf,
    },
    /// Replace the first paragraph matching a text (best effort).
    Replace {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        find: String,
        #[arg(long = "with")]
        replacement: String,
    },
    /// Find the first paragraph matching a text (best effort).
    Locate { file: PathBuf, text: String },
    /// Write the Series A sample agreement.
    Sample { output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("clausegraft v{}", env!("CARGO_PKG_VERSION"));
    run(cli)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Normalize { input, output } => {
            let bytes = read(&input)?;
            let normalized = normalize(&bytes).context("normalizing document")?;
            let changed = normalized.as_ref() != bytes.as_slice();
            write(&output, &normalized)?;
            info!(changed, output = %output.display(), "normalized");
        }
        Command::Parse { file, outline } => {
            let config = cli.parser.load()?;
            let extracted = extract(&file_name(&file), &read(&file)?, &config)
                .with_context(|| format!("parsing {}", file.display()))?;
            match (&extracted.tree, outline) {
                (Some(tree), true) => display::print_tree(tree),
                (None, true) => println!("{}", extracted.text),
                (_, false) => {
                    let json = serde_json::json!({
                        "full_text": extracted.text,
                        "tree": extracted.tree,
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
            }
        }
        Command::Table { file, ipc } => {
            let config = cli.parser.load()?;
            let extracted = extract(&file_name(&file), &read(&file)?, &config)?;
            let Some(tree) = extracted.tree else {
                bail!("{} has no paragraph structure", file.display());
            };
            let batch = clause_batch(&tree)?;
            println!("{}", arrow::util::pretty::pretty_format_batches(&[batch.clone()])?);
            if let Some(path) = ipc {
                let out = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let mut writer = arrow::ipc::writer::FileWriter::try_new(out, &batch.schema())?;
                writer.write(&batch)?;
                writer.finish()?;
                info!(rows = batch.num_rows(), path = %path.display(), "wrote clause table");
            }
        }
        Command::Inspect { file } => {
            let doc = DocxDocument::load(&read(&file)?)
                .with_context(|| format!("loading {}", file.display()))?;
            display::print_paragraphs(&doc);
        }
        Command::Apply { input, ops, output } => {
            let raw = std::fs::read_to_string(&ops)
                .with_context(|| format!("reading {}", ops.display()))?;
            let ops: Vec<EditOp> = serde_json::from_str(&raw).context("parsing edit batch")?;
            let mut composer = Composer::load(&read(&input)?)
                .with_context(|| format!("loading {}", input.display()))?;
            let report = composer.apply(&ops);
            write(&output, &composer.save().context("saving document")?)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Replace {
            input,
            output,
            find,
            replacement,
        } => {
            let mut composer = Composer::load(&read(&input)?)
                .with_context(|| format!("loading {}", input.display()))?;
            let key = composer.replace_clause(&find, &replacement)?;
            let id = composer.document().paragraph(key).stable_id();
            write(&output, &composer.save().context("saving document")?)?;
            println!("{}", id.as_deref().unwrap_or("-"));
        }
        Command::Locate { file, text } => {
            let composer = Composer::load(&read(&file)?)
                .with_context(|| format!("loading {}", file.display()))?;
            let key = composer.locate_best_effort(&text)?;
            let doc = composer.document();
            let paragraph = doc.paragraph(key);
            let json = serde_json::json!({
                "id": paragraph.stable_id(),
                "position": doc.position(key),
                "style": doc.style_name(key),
                "text": paragraph.text(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Command::Sample { output } => {
            write(&output, &series_a_document()?)?;
            info!(output = %output.display(), "wrote sample agreement");
        }
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clausegraft").chain(args.iter().copied())).unwrap()
    }

    fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn sample_normalize_apply_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.docx");
        let normalized = dir.path().join("normalized.docx");
        let ops = dir.path().join("ops.json");
        let edited = dir.path().join("edited.docx");

        run(cli(&["sample", arg(&sample)])).unwrap();
        run(cli(&["normalize", arg(&sample), arg(&normalized)])).unwrap();

        std::fs::write(
            &ops,
            r#"[{"type": "split", "id": "1A000001", "parts": ["THIS AGREEMENT", "is made today."]},
                {"type": "update_text", "id": "unknown", "text": "skipped"}]"#,
        )
        .unwrap();
        run(cli(&["apply", arg(&normalized), arg(&ops), arg(&edited)])).unwrap();

        let doc = DocxDocument::load(&std::fs::read(&edited).unwrap()).unwrap();
        let texts: Vec<String> = doc.paragraphs().map(|(_, p)| p.text()).skip(1).take(2).collect();
        assert_eq!(texts, vec!["THIS AGREEMENT", "is made today."]);
        assert!(doc.paragraphs().all(|(_, p)| p.stable_id().is_some()));
    }

    #[test]
    fn replace_writes_the_edited_document() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.docx");
        let out = dir.path().join("out.docx");
        run(cli(&["sample", arg(&sample)])).unwrap();
        run(cli(&[
            "replace",
            arg(&sample),
            arg(&out),
            "--find",
            "governed by and construed",
            "--with",
            "6.1 This Agreement is governed by English law.",
        ]))
        .unwrap();

        let composer = Composer::load(&std::fs::read(&out).unwrap()).unwrap();
        assert!(composer.locate_best_effort("State of Delaware").is_err());
        assert!(composer.locate_best_effort("English law").is_ok());
    }

    #[test]
    fn unsupported_table_input_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "flat text").unwrap();
        assert!(run(cli(&["table", arg(&notes)])).is_err());
        assert!(run(cli(&["parse", arg(&notes)])).is_ok());
    }

    #[test]
    fn table_writes_arrow_ipc() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.docx");
        let ipc = dir.path().join("clauses.arrow");
        run(cli(&["sample", arg(&sample)])).unwrap();
        run(cli(&["table", arg(&sample), "--ipc", arg(&ipc)])).unwrap();

        let reader =
            arrow::ipc::reader::FileReader::try_new(File::open(&ipc).unwrap(), None).unwrap();
        let rows: usize = reader.map(|batch| batch.unwrap().num_rows()).sum();
        assert_eq!(rows, 25);
    }

    #[test]
    fn parser_flags_override_defaults() {
        let parsed = cli(&["--top-heading", "Clause Title", "inspect", "x.docx"]);
        let config = parsed.parser.load().unwrap();
        assert_eq!(config.top_heading, "Clause Title");
        assert_eq!(config.second_heading, "Heading 2");
    }
}
