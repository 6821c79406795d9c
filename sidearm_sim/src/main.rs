#[tokio::main]
async fn main() -> std::io::Result<()> {
    sidearm_sim::run_with_config().await
}
