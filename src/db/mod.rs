/// Database layer
///
/// Connection pooling and schema migrations. All entity access goes through
/// the repository traits in [`crate::repo`]; nothing in the engines holds a
/// pool directly.
///
/// # Example
///
/// ```no_run
/// use taskboard::db::pool::{create_pool, PoolSettings};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let settings = PoolSettings {
///     url: std::env::var("DATABASE_URL").unwrap(),
///     ..Default::default()
/// };
///
/// let pool = create_pool(settings).await?;
/// # Ok(())
/// # }
/// ```
pub mod migrations;
pub mod pool;
