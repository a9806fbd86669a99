use sqlx::PgPool;

use crate::models::Actor;

pub async fn create(pool: &PgPool, name: &str, email: &str) -> Result<Actor, sqlx::Error> {
    sqlx::query_as::<_, Actor>(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
}
