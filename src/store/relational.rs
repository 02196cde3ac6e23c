//! Product rows in MySQL through a lazily connecting `sqlx` pool.
//! Every checkout selects the configured database with `USE`, since the pool itself
//! connects without one so that `/init-db` can create it.

use crate::config::RelationalConfig;
use crate::error::StoreError;
use crate::model::{Product, ProductInput};
use crate::store::ProductStore;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Executor, MySql};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS Produtos (
        Id INT AUTO_INCREMENT PRIMARY KEY,
        Nome VARCHAR(255) NOT NULL,
        Descricao TEXT,
        Preco DECIMAL(10, 2) NOT NULL
    )
"#;

pub struct MySqlProductStore {
    pool: MySqlPool,
    database: String,
}

impl MySqlProductStore {
    /// Build the pool without connecting; the first checkout opens the first connection.
    pub fn connect_lazy(config: &RelationalConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password);
        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);
        Self::with_pool(pool, &config.database)
    }

    pub fn with_pool(pool: MySqlPool, database: &str) -> Self {
        MySqlProductStore {
            pool,
            database: database.to_string(),
        }
    }

    /// Pooled connection with the product database selected. The guard returns the
    /// connection to the pool when dropped, on success and error paths alike.
    async fn checkout(&self) -> Result<PoolConnection<MySql>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let use_db = format!("USE {}", quote_ident(&self.database));
        (&mut *conn).execute(use_db.as_str()).await?;
        Ok(conn)
    }
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        let db = quote_ident(&self.database);
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", db);
        let use_db = format!("USE {}", db);
        // Plain strings go over the text protocol; MySQL cannot prepare `USE`.
        for statement in [create_db.as_str(), use_db.as_str(), CREATE_TABLE] {
            (&mut *conn).execute(statement).await?;
        }
        tracing::info!(database = %self.database, "product schema ready");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.checkout().await?;
        let rows = sqlx::query_as::<_, Product>("SELECT Id, Nome, Descricao, Preco FROM Produtos")
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.checkout().await?;
        let row = sqlx::query_as::<_, Product>(
            "SELECT Id, Nome, Descricao, Preco FROM Produtos WHERE Id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    async fn create(&self, input: ProductInput) -> Result<u64, StoreError> {
        let mut conn = self.checkout().await?;
        let result = sqlx::query("INSERT INTO Produtos (Nome, Descricao, Preco) VALUES (?, ?, ?)")
            .bind(input.nome)
            .bind(input.descricao)
            .bind(input.preco)
            .execute(&mut *conn)
            .await?;
        Ok(result.last_insert_id())
    }

    async fn update(&self, id: i64, input: ProductInput) -> Result<bool, StoreError> {
        let mut conn = self.checkout().await?;
        let result =
            sqlx::query("UPDATE Produtos SET Nome = ?, Descricao = ?, Preco = ? WHERE Id = ?")
                .bind(input.nome)
                .bind(input.descricao)
                .bind(input.preco)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Zero affected rows also covers a matched row whose values were already equal.
        let exists: Option<(i32,)> = sqlx::query_as("SELECT Id FROM Produtos WHERE Id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(exists.is_some())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.checkout().await?;
        let result = sqlx::query("DELETE FROM Produtos WHERE Id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
