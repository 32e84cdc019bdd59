use clap::Parser;
use gist_search::api::create_router;
use gist_search::config::Config;
use gist_search::github::GithubClient;
use gist_search::search::GistSearcher;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(about = "Search a user's public gists with a regular expression")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    // A missing token is fatal here, never per request.
    let config = Config::from_env()?;
    let client = GithubClient::from_config(&config)?;
    let searcher = Arc::new(GistSearcher::new(client, config.fetch_concurrency));

    let app = create_router(searcher);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(
        "listening on {} (upstream {}, fetch concurrency {})",
        args.bind,
        config.github_api_url,
        config.fetch_concurrency
    );
    axum::serve(listener, app).await?;
    Ok(())
}
