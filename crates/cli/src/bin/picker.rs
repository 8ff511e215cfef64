use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    picker_cli::main_entry().await
}
