use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use time::OffsetDateTime;

use crate::pagination::PageWindow;
use crate::users::repo::UserRepository;
use crate::users::repo_types::{User, UserFields};

/// Widths of the `VARCHAR` columns in the `users` table, in characters.
const COLUMN_WIDTHS: [(&str, usize); 5] = [
    ("name", 20),
    ("state", 20),
    ("phone", 20),
    ("email", 40),
    ("address", 200),
];

/// First field that would not fit its column, with the column width.
fn oversized(f: &UserFields) -> Option<(&'static str, usize)> {
    let values = [&f.name, &f.state, &f.phone, &f.email, &f.address];
    COLUMN_WIDTHS
        .iter()
        .zip(values)
        .find(|((_, max), v)| v.chars().count() > *max)
        .map(|((column, max), _)| (*column, *max))
}

/// In-process repository used by the handler tests.
#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<Vec<User>>,
    broken: bool,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the database connection was lost.
    pub fn broken() -> Self {
        Self {
            rows: Mutex::default(),
            broken: true,
        }
    }

    /// Raw row, including soft-deleted ones.
    pub fn raw(&self, id: i64) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.broken {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }

    fn check_widths(fields: &UserFields) -> anyhow::Result<()> {
        if let Some((column, max)) = oversized(fields) {
            return Err(anyhow!(
                "value too long for type character varying({max}) in column {column}"
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, fields: UserFields) -> anyhow::Result<User> {
        self.check()?;
        Self::check_widths(&fields)?;
        let mut rows = self.rows.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: rows.len() as i64 + 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: fields.name,
            state: fields.state,
            phone: fields.phone,
            email: fields.email,
            address: fields.address,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn soft_delete(&self, user: &User) -> anyhow::Result<()> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|u| u.id == user.id && u.deleted_at.is_none()) {
            row.deleted_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }

    async fn update_by_id(&self, id: i64, fields: &UserFields) -> anyhow::Result<Option<User>> {
        self.check()?;
        Self::check_widths(fields)?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|u| u.id == id && u.deleted_at.is_none()) else {
            return Ok(None);
        };
        row.name = fields.name.clone();
        row.state = fields.state.clone();
        row.phone = fields.phone.clone();
        row.email = fields.email.clone();
        row.address = fields.address.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<User>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.name == name && u.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_paged(&self, window: PageWindow) -> anyhow::Result<(Vec<User>, i64)> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let live: Vec<User> = rows.iter().filter(|u| u.deleted_at.is_none()).cloned().collect();
        let total = live.len() as i64;
        let skip = window.offset().unwrap_or(0).max(0) as usize;
        let take = window.limit().map_or(usize::MAX, |l| l.max(0) as usize);
        Ok((live.into_iter().skip(skip).take(take).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> UserFields {
        UserFields {
            name: "ann".into(),
            state: "active".into(),
            phone: "555-0100".into(),
            email: "ann@example.com".into(),
            address: "1 Main St".into(),
        }
    }

    #[test]
    fn fields_at_column_width_fit() {
        let mut f = fields();
        f.name = "n".repeat(20);
        f.address = "a".repeat(200);
        assert_eq!(oversized(&f), None);
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let mut f = fields();
        f.name = "é".repeat(20);
        assert_eq!(oversized(&f), None);
        f.email = "e".repeat(41);
        assert_eq!(oversized(&f), Some(("email", 40)));
    }

    #[tokio::test]
    async fn over_width_insert_and_update_fail() {
        let repo = MemoryUserRepository::new();
        let mut long = fields();
        long.phone = "5".repeat(21);
        let err = repo.insert(long.clone()).await.unwrap_err();
        assert!(err.to_string().contains("character varying(20)"));

        let user = repo.insert(fields()).await.unwrap();
        assert!(repo.update_by_id(user.id, &long).await.is_err());
        assert_eq!(repo.raw(user.id).unwrap().phone, "555-0100");
    }
}
