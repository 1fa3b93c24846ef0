//! embed-wikimedia CLI: render Wikimedia embeds from the command line
//!
//! Usage:
//!   embed-wikimedia embed <url> [--width N] [--lang CODE] [--align KEYWORD]
//!   embed-wikimedia lookup <project> <title> [--width N] [--lang CODE] [--align KEYWORD]

use anyhow::{bail, Context};
use embed_wikimedia::{Embedder, RenderAttributes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "embed" => cmd_embed(&args[2..]).await,
        "lookup" => cmd_lookup(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("embed-wikimedia {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"embed-wikimedia: Wikimedia embed renderer

USAGE:
    embed-wikimedia <COMMAND> [OPTIONS]

COMMANDS:
    embed <url>                 Print the embed HTML for a Wikipedia, Commons or Wikidata URL
    lookup <project> <title>    Print the lookup JSON for a title (wikipedia, commons, wikidata)
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --width <N>                 Image width in pixels
    --lang <CODE>               Language (wiki language for Wikipedia, label language otherwise)
    --align <KEYWORD>           left, center, right or none

ENVIRONMENT:
    EMBED_WIKIMEDIA_LANG        Host language for labels and captions
    EMBED_WIKIMEDIA_DEBUG       Bypass cached responses
    RUST_LOG                    Log filter, e.g. embed_wikimedia=debug"#
    );
}

/// Split positional arguments from `--key value` attribute options.
fn split_args(args: &[String]) -> anyhow::Result<(Vec<&str>, RenderAttributes)> {
    let mut positional = Vec::new();
    let mut pairs = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.strip_prefix("--") {
            Some(key) => {
                let value = iter
                    .next()
                    .with_context(|| format!("missing value for --{key}"))?;
                pairs.push((key, value.as_str()));
            }
            None => positional.push(arg.as_str()),
        }
    }
    Ok((positional, RenderAttributes::from_pairs(pairs)))
}

async fn cmd_embed(args: &[String]) -> anyhow::Result<()> {
    let (positional, attrs) = split_args(args)?;
    let [url] = positional.as_slice() else {
        bail!("usage: embed-wikimedia embed <url> [options]");
    };
    let embedder = Embedder::from_env()?;
    match embedder.embed_url(url, &attrs).await {
        Some(result) => {
            println!("{}", result.to_html());
            Ok(())
        }
        None => bail!("not an embeddable Wikimedia URL: {url}"),
    }
}

async fn cmd_lookup(args: &[String]) -> anyhow::Result<()> {
    let (positional, attrs) = split_args(args)?;
    let [project, title] = positional.as_slice() else {
        bail!("usage: embed-wikimedia lookup <project> <title> [options]");
    };
    let embedder = Embedder::from_env()?;
    let response = embedder.lookup(project, title, &attrs).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
