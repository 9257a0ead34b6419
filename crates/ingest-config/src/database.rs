//! Postgres connection URL, explicit or assembled from parts.

use crate::env::EnvSource;

/// `DATABASE_URL` when set, otherwise built from the `POSTGRES_*` variables.
pub fn database_url(env: &impl EnvSource) -> String {
    if let Some(url) = env.lookup("DATABASE_URL") {
        return url;
    }

    let user = env.string_or("POSTGRES_USER", "lotus");
    let password = env.string_or("POSTGRES_PASSWORD", "lotus");
    let host = env.string_or("POSTGRES_HOST", "");
    let port: u16 = env.parse_or("POSTGRES_PORT", 0);
    let db = env.string_or("POSTGRES_DB", "lotus");

    format!("postgres://{user}:{password}@{host}:{port}/{db}?sslmode=disable")
}
