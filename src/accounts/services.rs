use tracing::{info, instrument};

use crate::accounts::{
    dto::RegisterRequest,
    password::hash_password,
    repo::AccountStore,
    repo_types::{Account, NewAccount},
};
use crate::error::{RegisterError, RegisterResult};

/// Fields that passed presence validation.
struct RequiredFields {
    username: String,
    password: String,
    email: String,
    security_question: String,
    security_answer: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Checks presence only; content is stored exactly as received.
fn require_fields(payload: RegisterRequest) -> RegisterResult<RequiredFields> {
    let username = present(payload.username);
    let password = present(payload.password);
    let email = present(payload.email);
    let security_question = present(payload.security_question);
    let security_answer = present(payload.security_answer);

    match (username, password, email, security_question, security_answer) {
        (
            Some(username),
            Some(password),
            Some(email),
            Some(security_question),
            Some(security_answer),
        ) => Ok(RequiredFields {
            username,
            password,
            email,
            security_question,
            security_answer,
        }),
        (username, password, email, security_question, security_answer) => {
            let missing: Vec<&str> = [
                ("username", username.is_none()),
                ("password", password.is_none()),
                ("email", email.is_none()),
                ("securityQuestion", security_question.is_none()),
                ("securityAnswer", security_answer.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            Err(RegisterError::missing_fields(&missing))
        }
    }
}

/// Validates the payload, hashes the password and inserts one account.
///
/// Validation failures return before the store is touched.
#[instrument(skip_all)]
pub async fn register(
    store: &dyn AccountStore,
    payload: RegisterRequest,
) -> RegisterResult<Account> {
    let fields = require_fields(payload)?;

    let password_hash = hash_password(&fields.password)
        .map_err(|e| RegisterError::StorageUnavailable(e.to_string()))?;

    let account = store
        .insert(&NewAccount {
            username: fields.username,
            password_hash,
            email: fields.email,
            security_question: Some(fields.security_question),
            security_answer: Some(fields.security_answer),
        })
        .await?;

    info!(username = %account.username, "account registered");
    Ok(account)
}
