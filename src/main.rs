use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use docbatch::{Document, GeneratorConfig, InputType, Mode, RawItem, RequestGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

/// Turn a stream of inputs into index/train/search requests (one JSON object per line).
#[derive(Debug, Parser)]
#[command(name = "docbatch", version, about)]
struct Cli {
    /// JSON file with a generator config; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Documents per request (0 = everything in one request)
    #[arg(long)]
    batch_size: Option<usize>,
    #[arg(long)]
    first_doc_id: Option<u64>,
    #[arg(long)]
    first_request_id: Option<u64>,
    /// Draw doc ids at random from the u32 range
    #[arg(long)]
    random_doc_id: bool,
    /// Seed for random doc ids
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, allow_hyphen_values = true)]
    top_k: Option<i64>,
    #[arg(long, value_enum)]
    input_type: Option<InputType>,
    #[arg(long)]
    mime_type: Option<String>,
    /// Read inputs from files under this directory instead of stdin lines
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Increase logging verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .context(format!("Failed to read config at {}", path.display()))?;
                serde_json::from_str(&raw)
                    .context(format!("Failed to parse config at {}", path.display()))?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(size) = self.batch_size {
            config.batch_size = size;
        }
        if let Some(id) = self.first_doc_id {
            config.first_doc_id = id;
        }
        if let Some(id) = self.first_request_id {
            config.first_request_id = id;
        }
        if self.random_doc_id {
            config.random_doc_id = true;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(input_type) = self.input_type {
            config.input_type = input_type;
        }
        if let Some(mime) = &self.mime_type {
            config.mime_type = Some(mime.clone());
        }

        Ok(config)
    }

    /// The `--seed` to apply, once random ids are known to be on
    fn resolve_seed(&self, config: &GeneratorConfig) -> Result<Option<u64>> {
        match self.seed {
            Some(_) if !config.random_doc_id => {
                bail!("--seed needs random doc ids (--random-doc-id or \"random_doc_id\": true)")
            }
            seed => Ok(seed),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Parse one JSON document record, skipping it with a warning when malformed
fn parse_record(raw: &str, origin: &str) -> Option<RawItem> {
    match serde_json::from_str::<Document>(raw) {
        Ok(doc) => Some(RawItem::Document(doc)),
        Err(e) => {
            warn!("skipping malformed document record from {}: {}", origin, e);
            None
        }
    }
}

fn line_inputs<R: BufRead>(reader: R, input_type: InputType) -> impl Iterator<Item = RawItem> {
    reader
        .lines()
        .enumerate()
        .map_while(|(n, line)| match line {
            Ok(line) => Some((n, line)),
            Err(e) => {
                warn!("stopped reading input at line {}: {}", n + 1, e);
                None
            }
        })
        .filter_map(move |(n, line)| match input_type {
            InputType::Protobuf => {
                if line.trim().is_empty() {
                    return None;
                }
                parse_record(&line, &format!("line {}", n + 1))
            }
            _ => Some(RawItem::Text(line)),
        })
}

fn dir_inputs(dir: &Path, input_type: InputType) -> Result<impl Iterator<Item = RawItem>> {
    if input_type == InputType::DataUri {
        bail!("--dir cannot produce data URIs; use --input-type file-path or buffer");
    }
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        });

    Ok(files.filter_map(move |entry| {
        let path = entry.path();
        match input_type {
            InputType::FilePath | InputType::DataUri => {
                Some(RawItem::Text(path.display().to_string()))
            }
            InputType::Buffer => match fs::read(path) {
                Ok(bytes) => Some(RawItem::Bytes(bytes)),
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    None
                }
            },
            InputType::Protobuf => match fs::read_to_string(path) {
                Ok(raw) => parse_record(&raw, &path.display().to_string()),
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                    None
                }
            },
        }
    }))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.resolve_config()?;
    let seed = cli.resolve_seed(&config)?;
    info!(
        mode = %config.mode,
        input_type = %config.input_type,
        batch_size = config.batch_size,
        "generating requests"
    );

    let items: Box<dyn Iterator<Item = RawItem>> = match &cli.dir {
        Some(dir) => Box::new(dir_inputs(dir, config.input_type)?),
        None => Box::new(line_inputs(io::stdin().lock(), config.input_type)),
    };

    let mut generator = RequestGenerator::new(items, config);
    if let Some(seed) = seed {
        generator = generator.with_rng(ChaCha8Rng::seed_from_u64(seed));
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut emitted = 0usize;
    let mut documents = 0usize;

    for request in generator {
        let request = request?;
        documents += request.docs().len();
        serde_json::to_writer(&mut out, &request).context("Failed to serialize request")?;
        out.write_all(b"\n").context("Failed to write request")?;
        emitted += 1;
    }
    out.flush().context("Failed to flush output")?;

    info!(requests = emitted, documents, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["docbatch"]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(cli.dir.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "docbatch",
            "--mode",
            "search",
            "--batch-size",
            "4",
            "--top-k",
            "7",
            "--input-type",
            "file-path",
            "--mime-type",
            "text/plain",
            "--first-request-id",
            "3",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.mode, Mode::Search);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.top_k, 7);
        assert_eq!(config.input_type, InputType::FilePath);
        assert_eq!(config.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(config.first_request_id, 3);
    }

    #[test]
    fn test_cli_negative_top_k_parses() {
        let cli = Cli::try_parse_from(["docbatch", "--top-k", "-1"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap().top_k, -1);
    }

    #[test]
    fn test_cli_seed_requires_random() {
        let cli = Cli::try_parse_from(["docbatch", "--seed", "1"]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert!(cli.resolve_seed(&config).is_err());

        let cli = Cli::try_parse_from(["docbatch", "--random-doc-id", "--seed", "1"]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert!(config.random_doc_id);
        assert_eq!(cli.resolve_seed(&config).unwrap(), Some(1));
    }

    #[test]
    fn test_cli_seed_with_random_from_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("docbatch.json");
        fs::write(&path, r#"{"random_doc_id": true, "batch_size": 3}"#).unwrap();

        let cli = Cli::try_parse_from([
            "docbatch",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "1",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert!(config.random_doc_id);
        assert_eq!(config.batch_size, 3);
        assert_eq!(cli.resolve_seed(&config).unwrap(), Some(1));
    }

    #[test]
    fn test_cli_flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("docbatch.json");
        fs::write(&path, r#"{"mode": "train", "top_k": 5}"#).unwrap();

        let cli = Cli::try_parse_from(["docbatch", "--config", path.to_str().unwrap(), "--top-k", "9"])
            .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.mode, Mode::Train);
        assert_eq!(config.top_k, 9);
    }

    fn texts(items: Vec<RawItem>) -> Vec<String> {
        items.into_iter().map(RawItem::into_text).collect()
    }

    #[test]
    fn test_line_inputs_text() {
        let input = io::Cursor::new("alpha\n\nbeta\n");
        let items: Vec<RawItem> = line_inputs(input, InputType::Buffer).collect();

        assert_eq!(
            items,
            vec![
                RawItem::Text("alpha".into()),
                RawItem::Text(String::new()),
                RawItem::Text("beta".into()),
            ]
        );
    }

    #[test]
    fn test_line_inputs_protobuf_skips_blank_and_malformed() {
        let input = io::Cursor::new(
            "{\"payload\": {\"file_path\": \"a.txt\"}}\n\n   \nnot json\n{\"payload\": {\"data_uri\": \"data:,b\"}}\n",
        );
        let items: Vec<RawItem> = line_inputs(input, InputType::Protobuf).collect();

        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], RawItem::Document(d) if d.file_path() == Some("a.txt")));
        assert!(matches!(&items[1], RawItem::Document(d) if d.data_uri() == Some("data:,b")));
    }

    #[test]
    fn test_dir_inputs_sorted_file_paths() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("sub").join("c.txt"), "c").unwrap();

        let items: Vec<RawItem> = dir_inputs(tmp.path(), InputType::FilePath).unwrap().collect();
        let expected: Vec<String> = [
            tmp.path().join("a.txt"),
            tmp.path().join("b.txt"),
            tmp.path().join("sub").join("c.txt"),
        ]
        .iter()
        .map(|p| p.display().to_string())
        .collect();

        assert_eq!(texts(items), expected);
    }

    #[test]
    fn test_dir_inputs_buffer_reads_contents() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("one.bin"), [0u8, 1, 2]).unwrap();
        fs::write(tmp.path().join("two.bin"), b"xyz").unwrap();

        let items: Vec<RawItem> = dir_inputs(tmp.path(), InputType::Buffer).unwrap().collect();
        assert_eq!(
            items,
            vec![RawItem::Bytes(vec![0, 1, 2]), RawItem::Bytes(b"xyz".to_vec())]
        );
    }

    #[test]
    fn test_dir_inputs_protobuf_skips_malformed_records() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("1.json"), r#"{"payload": {"file_path": "x.png"}}"#).unwrap();
        fs::write(tmp.path().join("2.json"), "{broken").unwrap();

        let items: Vec<RawItem> = dir_inputs(tmp.path(), InputType::Protobuf).unwrap().collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(&items[0], RawItem::Document(d) if d.file_path() == Some("x.png")));
    }

    #[test]
    fn test_dir_inputs_rejects_data_uri_and_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(dir_inputs(tmp.path(), InputType::DataUri).is_err());
        assert!(dir_inputs(&tmp.path().join("missing"), InputType::FilePath).is_err());
    }

    #[test]
    fn test_cli_missing_config_file() {
        let cli = Cli::try_parse_from(["docbatch", "--config", "/nonexistent/docbatch.json"]).unwrap();
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_parse_record_skips_garbage() {
        assert!(parse_record("not json", "test").is_none());
        let item = parse_record(r#"{"payload": {"data_uri": "data:,x"}}"#, "test").unwrap();
        assert!(matches!(item, RawItem::Document(ref d) if d.data_uri() == Some("data:,x")));
    }
}
