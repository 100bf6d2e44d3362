use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
///
/// Field names on the wire match what existing clients already consume.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "CreatedAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "UpdatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "DeletedAt", with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>, // set by soft delete, never cleared
    pub name: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl User {
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            state: self.state.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}

/// The five business columns written by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}
