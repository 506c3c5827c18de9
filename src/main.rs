use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/bisini.db".to_string());

    let pool = bisini::db::init_pool(&database_url).await;

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("import") {
        let Some(path) = args.get(2) else {
            eprintln!("usage: bisini import <file.json>");
            std::process::exit(2);
        };
        if let Err(e) = bisini::cli::import_dump(&pool, path).await {
            eprintln!("Import failed: {e}");
            std::process::exit(1);
        }
        return;
    }

    let app = bisini::build_app(pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(addr).await.unwrap();

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}
