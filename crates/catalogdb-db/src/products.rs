//! Database operations for the `products` table.

use catalogdb_core::NormalizedRecord;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::DbError;

/// Rows per multi-row `INSERT`. Seven binds per row keeps each statement well
/// under Postgres' 65535 bind-parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

const DROP_PRODUCTS_TABLE: &str = "DROP TABLE IF EXISTS products";

const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE products ( \
     id SERIAL PRIMARY KEY, \
     product_id TEXT, \
     upc_ean TEXT, \
     brand TEXT, \
     product_name TEXT, \
     category TEXT, \
     subcategory TEXT, \
     size TEXT \
 )";

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductRow {
    /// Synthetic `SERIAL` key; reflects insertion order.
    pub id: i32,
    pub product_id: Option<String>,
    pub upc_ean: Option<String>,
    pub brand: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub size: Option<String>,
}

/// Drops and recreates the `products` table.
///
/// Both statements run in one transaction, so a failed create leaves the
/// previous table in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn create_products_table(pool: &PgPool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    sqlx::query(DROP_PRODUCTS_TABLE).execute(&mut *tx).await?;
    sqlx::query(CREATE_PRODUCTS_TABLE).execute(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!("created products table");
    Ok(())
}

/// Inserts every record, in order, and returns the number of rows written.
///
/// All inserts run inside a single transaction; if any statement fails the
/// entire load is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_products(pool: &PgPool, records: &[NormalizedRecord]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for chunk in records.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO products \
                 (product_id, upc_ean, brand, product_name, category, subcategory, size) ",
        );
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(&record.product_id)
                .push_bind(&record.upc_ean)
                .push_bind(&record.brand)
                .push_bind(&record.product_name)
                .push_bind(&record.category)
                .push_bind(&record.subcategory)
                .push_bind(&record.size);
        });

        let result = builder.build().execute(&mut *tx).await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;

    tracing::info!(rows = inserted, "inserted products");
    Ok(inserted)
}

/// Returns the number of rows in `products`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Lists products in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, product_id, upc_ean, brand, product_name, category, subcategory, size \
         FROM products \
         ORDER BY id \
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
