#[tokio::main]
async fn main() {
    std::process::exit(pulsarctl_cli::run().await);
}
