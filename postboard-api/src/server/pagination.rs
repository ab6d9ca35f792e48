//! `offset`/`limit` query handling for list endpoints.

use serde::Deserialize;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 100;

/// Raw query values. They are parsed leniently, so a bad value falls back instead of rejecting
/// the request.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct PageQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    #[must_use]
    pub fn apply<T>(self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        let offset = query
            .offset
            .as_deref()
            .and_then(leading_int)
            .map_or(0, |offset| usize::try_from(offset).unwrap_or(0));

        // Zero counts as missing.
        let limit = match query.limit.as_deref().and_then(leading_int) {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => usize::try_from(limit).map_or(1, |limit| limit.clamp(1, MAX_LIMIT)),
        };

        Self { offset, limit }
    }
}

/// Parses the optionally signed decimal prefix of `value`, ignoring leading whitespace and any
/// trailing garbage: `"12abc"` is 12, `"abc"` is nothing.
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let digits_start = usize::from(value.starts_with(['+', '-']));
    let digits_len = value[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return None;
    }

    let number = &value[..digits_start + digits_len];
    Some(number.parse().unwrap_or(if number.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}
