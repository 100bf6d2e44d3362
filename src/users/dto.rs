use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::PageParam;
use crate::users::repo_types::{User, UserFields};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("field `{0}` is required")]
pub struct MissingField(pub &'static str);

/// Request body for `POST /user/create`. Absent keys deserialize as empty
/// strings so that they fail the required-field check rather than the parser.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl TryFrom<CreateUserRequest> for UserFields {
    type Error = MissingField;

    fn try_from(r: CreateUserRequest) -> Result<Self, Self::Error> {
        validate(UserFields {
            name: r.name,
            state: r.state,
            phone: r.phone,
            email: r.email,
            address: r.address,
        })
    }
}

/// Request body for `PUT /user/update`, merged onto the stored record.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl UpdateUserRequest {
    /// Absent (or null) keys keep the current value; the merged record must
    /// still have every field non-empty.
    pub fn merge_onto(self, current: UserFields) -> Result<UserFields, MissingField> {
        validate(UserFields {
            name: self.name.unwrap_or(current.name),
            state: self.state.unwrap_or(current.state),
            phone: self.phone.unwrap_or(current.phone),
            email: self.email.unwrap_or(current.email),
            address: self.address.unwrap_or(current.address),
        })
    }
}

fn validate(f: UserFields) -> Result<UserFields, MissingField> {
    let required = [
        ("name", &f.name),
        ("state", &f.state),
        ("phone", &f.phone),
        ("email", &f.email),
        ("address", &f.address),
    ];
    if let Some((key, _)) = required.iter().find(|(_, v)| v.is_empty()) {
        return Err(MissingField(*key));
    }
    Ok(f)
}

/// Query string as decoded key/value pairs. A repeated key resolves to its
/// first value.
#[derive(Debug, Default)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl QueryPairs {
    pub fn first(&self, key: &str) -> Option<String> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }
}

/// `?id=` as sent by the client; kept raw so that a malformed id behaves
/// like an unknown one.
#[derive(Debug, Default)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl From<QueryPairs> for IdQuery {
    fn from(q: QueryPairs) -> Self {
        Self { id: q.first("id") }
    }
}

#[derive(Debug, Default)]
pub struct ReadQuery {
    pub name: Option<String>,
    pub id: Option<String>,
}

impl From<QueryPairs> for ReadQuery {
    fn from(q: QueryPairs) -> Self {
        Self {
            name: q.first("name"),
            id: q.first("id"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ListQuery {
    pub page_size: Option<String>,
    pub page_num: Option<String>,
}

impl From<QueryPairs> for ListQuery {
    fn from(q: QueryPairs) -> Self {
        Self {
            page_size: q.first("pageSize"),
            page_num: q.first("pageNum"),
        }
    }
}

impl ListQuery {
    pub fn params(&self) -> (PageParam, PageParam) {
        (
            PageParam::parse(self.page_size.as_deref()),
            PageParam::parse(self.page_num.as_deref()),
        )
    }
}

/// `data` of a successful `GET /user/list`.
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub list: Vec<User>,
    pub total: i64,
    #[serde(rename = "pageNum")]
    pub page_num: PageParam,
    #[serde(rename = "pageSize")]
    pub page_size: PageParam,
}

pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).and_then(|s| s.parse::<i64>().ok())
}
