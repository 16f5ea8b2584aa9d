/// Configuration for the forum database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[cfg(feature = "postgres")]
pub use self::pool::DatabaseConnections;

#[cfg(feature = "postgres")]
mod pool {
    use std::time::Duration;

    use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

    use super::DatabaseConfig;

    /// Pooled connection to the forum database.
    ///
    /// # Example
    /// ```ignore
    /// let db = DatabaseConnections::init(&config).await?;
    /// let posts = PostgresPostRepository::new(db.main.clone());
    /// ```
    pub struct DatabaseConnections {
        pub main: DbConn,
    }

    impl DatabaseConnections {
        /// Open the pool described by `config`.
        pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
            tracing::info!("Initializing database connection...");

            let opts = ConnectOptions::new(&config.url)
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(300))
                .sqlx_logging(true)
                .to_owned();

            let main = Database::connect(opts).await?;
            tracing::info!("Database connected (pool: {})", config.max_connections);

            Ok(Self { main })
        }

        /// Round-trip to the server; used by the health endpoint.
        pub async fn ping(&self) -> Result<(), DbErr> {
            self.main.ping().await
        }
    }
}
