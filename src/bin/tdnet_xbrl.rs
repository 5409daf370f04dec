use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;
use tdnet_xbrl::{resolve, EngineConfig, Resolution, TaxonomyCache};
use tokio::sync::mpsc;

#[derive(StructOpt, Debug)]
#[structopt(name = "tdnet-xbrl", about = "Resolve TDNET/EDINET inline XBRL archives")]
struct Opt {
    /// Disclosure archives (ZIP) to resolve
    #[structopt(parse(from_os_str))]
    archives: Vec<PathBuf>,

    /// Directory holding the global taxonomy label linkbases
    #[structopt(long, parse(from_os_str))]
    taxonomy_dir: Option<PathBuf>,

    /// Keep only facts of the current period contexts
    #[structopt(long)]
    current_only: bool,

    /// Print only the merged label table of each archive
    #[structopt(long)]
    labels_only: bool,

    /// Print the category code table and exit
    #[structopt(long)]
    list_categories: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let opt = Opt::from_args();

    let mut config = EngineConfig::from_env()?;
    if let Some(dir) = opt.taxonomy_dir.clone() {
        config.taxonomy_dir = Some(dir);
    }
    config.current_period_only |= opt.current_only;

    if opt.list_categories {
        println!("{}", config.categories.describe());
        return Ok(());
    }
    if opt.archives.is_empty() {
        return Err(anyhow!("No archives given"));
    }

    let taxonomy = config.taxonomy_dir.clone().map(|dir| Arc::new(TaxonomyCache::from_dir(dir)));
    if taxonomy.is_none() {
        log::info!("No taxonomy directory configured, using archive labels only");
    }
    let config = Arc::new(config);

    let (tx, mut rx) = mpsc::channel(opt.archives.len().max(1));
    let mut handles = Vec::new();

    for (i, path) in opt.archives.iter().enumerate() {
        let tx = tx.clone();
        let path = path.clone();
        let taxonomy = taxonomy.clone();
        let config = Arc::clone(&config);

        let handle = tokio::task::spawn_blocking(move || {
            let result = std::fs::read(&path)
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))
                .and_then(|bytes| {
                    resolve(&bytes, taxonomy.as_deref(), &config).map_err(anyhow::Error::from)
                });
            tx.blocking_send((i, path, result))
                .map_err(|_| anyhow!("Result channel closed"))
        });
        handles.push(handle);
    }

    drop(tx);

    let mut results: Vec<(usize, PathBuf, Result<Resolution>)> = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    for handle in handles {
        handle.await??;
    }
    results.sort_by_key(|(i, _, _)| *i);

    let mut failed = 0;
    for (_, path, result) in results {
        match result {
            Ok(resolution) => {
                let mut output = Map::new();
                output.insert("archive".to_string(), Value::String(path.display().to_string()));
                if opt.labels_only {
                    output.insert("labels".to_string(), serde_json::to_value(&resolution.labels)?);
                } else {
                    output.insert("resolution".to_string(), serde_json::to_value(&resolution)?);
                }
                println!("{}", serde_json::to_string(&output)?);
            }
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} archive(s) could not be resolved", failed));
    }
    Ok(())
}
