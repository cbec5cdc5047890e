#[tokio::main]
async fn main() {
    if let Err(e) = sqlobject_cli::run(std::env::args().collect()).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
