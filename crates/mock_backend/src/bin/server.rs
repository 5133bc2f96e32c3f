use mock_backend::{run_server, InMemoryFinanceRepository};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let empty = env::var("MOCK_EMPTY").is_ok();

    println!("Finance Mock Backend");
    println!("====================");
    println!("Listening on: {}:{}", host, port);
    println!("Seed data: {}", if empty { "none" } else { "sample customers" });
    println!();

    let repo = if empty {
        Arc::new(InMemoryFinanceRepository::new())
    } else {
        Arc::new(InMemoryFinanceRepository::seeded())
    };

    run_server(repo, &host, port).await?;

    Ok(())
}
