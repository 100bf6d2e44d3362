//! Page parameters for `/user/list`.
//!
//! Clients send `pageSize`/`pageNum` as loose query strings; anything missing,
//! non-numeric, zero or negative means "unbounded", which is echoed back on the
//! wire as `-1`.

use serde::{Serialize, Serializer};

/// Wire value reported for an unbounded page parameter.
pub const UNBOUNDED: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageParam {
    Unbounded,
    /// Always strictly positive.
    Value(i64),
}

impl PageParam {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            Some(n) if n > 0 => PageParam::Value(n),
            _ => PageParam::Unbounded,
        }
    }

    pub fn as_wire(self) -> i64 {
        match self {
            PageParam::Unbounded => UNBOUNDED,
            PageParam::Value(n) => n,
        }
    }
}

impl Serialize for PageParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_wire())
    }
}

/// Row window handed to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageWindow {
    All,
    Slice { limit: i64, offset: i64 },
}

impl PageWindow {
    /// An unbounded size ignores the page number; an unbounded page number
    /// with a bounded size starts at the first row.
    pub fn from_params(size: PageParam, num: PageParam) -> Self {
        match (size, num) {
            (PageParam::Unbounded, _) => PageWindow::All,
            (PageParam::Value(limit), PageParam::Unbounded) => {
                PageWindow::Slice { limit, offset: 0 }
            }
            (PageParam::Value(limit), PageParam::Value(num)) => PageWindow::Slice {
                limit,
                offset: (num - 1).saturating_mul(limit),
            },
        }
    }

    /// `None` maps to SQL `LIMIT NULL`, i.e. no limit.
    pub fn limit(self) -> Option<i64> {
        match self {
            PageWindow::All => None,
            PageWindow::Slice { limit, .. } => Some(limit),
        }
    }

    pub fn offset(self) -> Option<i64> {
        match self {
            PageWindow::All => None,
            PageWindow::Slice { offset, .. } => Some(offset),
        }
    }
}
