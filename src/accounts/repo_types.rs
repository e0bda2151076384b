use sqlx::FromRow;
use time::OffsetDateTime;

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub username: String,
    pub password_hash: String, // argon2 PHC string
    pub email: String,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Row to insert; `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}
