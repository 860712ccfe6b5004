use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use wavyte_loader::{
    Document, DocumentLoader, FsImageSource, FsTransport, ImageSource, LoaderOpts, PreparedImage,
    ResolveMode, Texture,
};

#[derive(Parser, Debug)]
#[command(name = "wavyte-loader", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a document and print what it resolved to as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Fail on layers referencing unknown assets.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Upper bound on concurrent image fetches.
    #[arg(long)]
    max_fetches: Option<usize>,

    /// Do not read image files; image assets get empty placeholder textures.
    #[arg(long, default_value_t = false)]
    skip_images: bool,
}

struct PlaceholderImages;

#[async_trait]
impl ImageSource for PlaceholderImages {
    async fn load(&self, _path: &str) -> anyhow::Result<Texture> {
        Ok(Texture::new(PreparedImage {
            width: 0,
            height: 0,
            rgba8_premul: Arc::new(Vec::new()),
        }))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args).await,
    }
}

async fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let root = args
        .in_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let location = args
        .in_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("input path '{}' has no file name", args.in_path.display()))?
        .to_string();

    let images: Arc<dyn ImageSource> = if args.skip_images {
        Arc::new(PlaceholderImages)
    } else {
        Arc::new(FsImageSource::new(root.clone()))
    };

    let mut opts = LoaderOpts::default();
    if args.strict {
        opts.resolve_mode = ResolveMode::Strict;
    }
    if let Some(n) = args.max_fetches {
        opts.max_concurrent_fetches = n;
    }

    let loader = DocumentLoader::new(Arc::new(FsTransport::new(root)), images).with_opts(opts);
    let doc = loader
        .load_from_path(&location)
        .await
        .with_context(|| format!("load '{}'", args.in_path.display()))?;

    let summary = summarize(&doc);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(doc: &Document) -> Value {
    let assets: Vec<Value> = doc
        .assets()
        .iter()
        .map(|a| {
            json!({
                "id": a.id(),
                "image_path": a.image_path(),
                "texture": a.texture().map(|t| {
                    let (w, h) = t.size();
                    json!([w, h])
                }),
                "composition_layers": a.composition_layers().map(<[_]>::len),
            })
        })
        .collect();

    let mut layers = Vec::new();
    let cycles = doc.walk_layers(&mut |depth, layer| {
        layers.push(json!({
            "depth": depth,
            "kind": layer.kind(),
            "name": layer.header().name,
            "ref_id": layer.reference_id(),
            "asset": layer.asset().and_then(|a| a.id().map(str::to_string)),
        }));
    });

    json!({
        "assets": assets,
        "layers": layers,
        "cycles": cycles.into_iter().map(|c| c.path).collect::<Vec<_>>(),
    })
}
