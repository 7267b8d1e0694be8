use std::sync::Arc;

use tallybook_store::{InMemoryTransactionStore, PgTransactionStore, TransactionStore, ensure_schema};

#[tokio::main]
async fn main() {
    tallybook_observability::init();

    let store: Arc<dyn TransactionStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("failed to connect to DATABASE_URL");

            ensure_schema(&pool)
                .await
                .expect("failed to bootstrap transactions schema");

            Arc::new(PgTransactionStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using volatile in-memory store");
            Arc::new(InMemoryTransactionStore::new())
        }
    };

    let app = tallybook_api::app::build_app(store);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
