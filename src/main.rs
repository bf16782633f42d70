#[tokio::main]
async fn main() {
    carecircle_lib::init_tracing();

    if let Err(e) = carecircle_lib::run().await {
        tracing::error!("{e}");
        eprintln!("carecircle: {e}");
        std::process::exit(1);
    }
}
