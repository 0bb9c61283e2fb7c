#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cardmatch_server::run().await
}
