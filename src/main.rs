use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = isoserve::cli::Cli::parse();
    if let Err(e) = isoserve::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
