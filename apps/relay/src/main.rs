mod cli;
mod context_factory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}
