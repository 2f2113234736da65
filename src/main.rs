#[tokio::main]
async fn main() {
    if let Err(err) = burnout_dashboard_lib::run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
