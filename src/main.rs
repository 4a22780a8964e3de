use clap::Parser;
use harbor_client::cli::{Args, Runner};

#[tokio::main]
async fn main() {
    let runner = Runner::new(Args::parse());

    if let Err(e) = runner.run().await {
        runner.logger().error(&e.to_string());
        std::process::exit(1);
    }
}
