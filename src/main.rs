use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    companion_analytics::cli::run_cli().await
}
