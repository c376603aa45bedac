use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dex_cli::main_entry().await
}
