//! Extract the contact id from the `:id` path segment.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Contact id from the path; must be an integer of at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactId(pub i64);

impl std::str::FromStr for ContactId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::validation("id", "must be an integer"))?;
        if n < 1 {
            return Err(AppError::validation("id", "must be greater than or equal to 1"));
        }
        Ok(ContactId(n))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ContactId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation("id", e.body_text()))?;
        raw.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!("1".parse::<ContactId>().unwrap(), ContactId(1));
        assert_eq!("42".parse::<ContactId>().unwrap(), ContactId(42));
        assert!("0".parse::<ContactId>().is_err());
        assert!("-3".parse::<ContactId>().is_err());
        assert!("abc".parse::<ContactId>().is_err());
    }
}
