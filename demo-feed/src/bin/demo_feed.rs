use clap::Parser;
use demo_feed::{run_server, FeedArgs};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated OBD-II and camera feed for the dashboard")]
struct Args {
    #[command(flatten)]
    feed: FeedArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    info!("Starting demo feed in {:?} mode", args.feed.mode);
    if args.feed.dropout_every > 0 {
        info!("  adapter dropout every {} ticks", args.feed.dropout_every);
    }

    run_server(args.feed).await
}
