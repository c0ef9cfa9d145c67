use tracing::debug;

use crate::database::Database;
use crate::models::User;

/// Outcome of a phone-keyed registration: the phone either matched an
/// existing account or a new one was created.
#[derive(Debug, Clone)]
pub enum RegisteredUser {
    Created(User),
    Existing(User),
}

impl RegisteredUser {
    pub fn user(&self) -> &User {
        match self {
            RegisteredUser::Created(user) | RegisteredUser::Existing(user) => user,
        }
    }

    pub fn id(&self) -> i64 {
        self.user().id
    }
}

/// Looks up the user by phone, creating the account when the phone is new.
/// For a known phone the stored name wins and the supplied one is
/// discarded. The lookup-then-insert branch is safe here: nothing else
/// writes to this store while an operation runs.
pub async fn get_or_create_user(
    db: &Database,
    name: &str,
    phone: &str,
) -> Result<RegisteredUser, sqlx::Error> {
    let name = name.trim();
    let phone = phone.trim();

    let existing = sqlx::query_as::<_, User>("SELECT id, name, phone FROM users WHERE phone = ?")
        .bind(phone)
        .fetch_optional(&db.pool)
        .await?;
    if let Some(user) = existing {
        return Ok(RegisteredUser::Existing(user));
    }

    let created = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, phone) VALUES (?, ?) RETURNING id, name, phone",
    )
    .bind(name)
    .bind(phone)
    .fetch_one(&db.pool)
    .await?;
    debug!("Registered user {} for phone {}", created.id, created.phone);
    Ok(RegisteredUser::Created(created))
}
