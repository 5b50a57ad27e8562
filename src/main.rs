use anyhow::Result;
use clap::{Parser, Subcommand};
use searchcoord::cluster::StaticClusterView;
use searchcoord::fetch::HttpFetcher;
use searchcoord::ingest::Dispatcher;
use searchcoord::search::Coordinator;
use searchcoord::Config;

#[derive(Parser, Debug)]
#[command(name = "searchcoord")]
#[command(about = "Coordination layer for a distributed full-text search cluster")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a local file or http:// reference into the cluster
    Index { reference: String },
    /// Query the cluster across all shards
    Search {
        query: String,
        /// Also request the extracted content field
        #[arg(long)]
        with_contents: bool,
    },
    /// Remove every document from the index
    DeleteAll,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let view = StaticClusterView::from_config(&config.cluster);

    match cli.command {
        Command::Index { reference } => {
            let fetcher = HttpFetcher::new(config.fetch.spool_dir.clone(), config.fetch_timeout());
            let dispatcher = Dispatcher::new(view, fetcher, &config);
            match dispatcher.index(&reference).await {
                Ok(()) => println!("indexed {}", reference),
                Err(err) => {
                    log::error!("indexing {} failed: {}", reference, err);
                    std::process::exit(1);
                }
            }
        }
        Command::Search {
            query,
            with_contents,
        } => {
            let coordinator = Coordinator::new(view, &config);
            match coordinator.search(&query, with_contents).await? {
                None => println!("cluster unavailable: no healthy master and no shards"),
                Some(result) => {
                    println!(
                        "{} match(es) in {} ms",
                        result.matches.len(),
                        result.elapsed_ms
                    );
                    for id in &result.matches {
                        println!("{}", id);
                    }
                }
            }
        }
        Command::DeleteAll => {
            let fetcher = HttpFetcher::new(config.fetch.spool_dir.clone(), config.fetch_timeout());
            let dispatcher = Dispatcher::new(view, fetcher, &config);
            dispatcher.delete_all().await?;
            println!("index cleared");
        }
    }

    Ok(())
}
