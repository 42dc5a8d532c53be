use staticd::config::Config;
use staticd::server::listener::Listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let listener = Listener::bind(&cfg).await?;

    tokio::select! {
        res = listener.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            // Stop accepting and let in-flight handlers fall away with the
            // runtime; they are not joined.
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
