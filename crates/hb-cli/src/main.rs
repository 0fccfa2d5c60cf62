use hb_cli::{cli, commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = cli::build().get_matches();
    let mut stdout = std::io::stdout();

    if let Err(err) = commands::run(&matches, &mut stdout).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
