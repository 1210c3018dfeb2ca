#[tokio::main]
async fn main() {
    grocery::start_server().await;
}
