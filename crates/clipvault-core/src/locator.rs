//! Stored object locator
//!
//! A media record references its uploaded object through an unsigned locator
//! of the form `<bucket>,<key>`. The locator is what gets persisted; signed
//! access URLs are derived from it on every read and never stored.

use std::fmt::{Display, Formatter, Result as FmtResult};

const SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("locator bucket must not be empty")]
    EmptyBucket,
    #[error("locator key must not be empty")]
    EmptyKey,
    #[error("locator part contains reserved separator ',': {0}")]
    ReservedSeparator(String),
}

/// Bucket and key of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub bucket: String,
    pub key: String,
}

impl Locator {
    /// Join `bucket` and `key` into the persisted form.
    pub fn encode(bucket: &str, key: &str) -> Result<String, LocatorError> {
        if bucket.is_empty() {
            return Err(LocatorError::EmptyBucket);
        }
        if key.is_empty() {
            return Err(LocatorError::EmptyKey);
        }
        for part in [bucket, key] {
            if part.contains(SEPARATOR) {
                return Err(LocatorError::ReservedSeparator(part.to_string()));
            }
        }
        Ok(format!("{bucket}{SEPARATOR}{key}"))
    }

    /// Parse a persisted field. Anything other than exactly two non-empty
    /// parts means "no video" and yields `None`.
    pub fn decode(field: Option<&str>) -> Option<Locator> {
        let mut parts = field?.split(SEPARATOR);
        let bucket = parts.next()?;
        let key = parts.next()?;
        if parts.next().is_some() || bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some(Locator {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode() {
        let key = "landscape/3q2-7wEjRkQ5mA0xvJt7lQ1bPz9yXhA2cF4dG6eH8iK";
        let encoded = Locator::encode("tubes", key).unwrap();
        assert_eq!(encoded, format!("tubes,{key}"));

        let decoded = Locator::decode(Some(&encoded)).unwrap();
        assert_eq!(decoded.bucket, "tubes");
        assert_eq!(decoded.key, key);
        assert_eq!(decoded.to_string(), encoded);
    }

    #[test]
    fn test_encode_rejects_bad_parts() {
        assert_eq!(Locator::encode("", "k"), Err(LocatorError::EmptyBucket));
        assert_eq!(Locator::encode("b", ""), Err(LocatorError::EmptyKey));
        assert!(matches!(
            Locator::encode("a,b", "k"),
            Err(LocatorError::ReservedSeparator(_))
        ));
        assert!(matches!(
            Locator::encode("b", "other/x,y"),
            Err(LocatorError::ReservedSeparator(_))
        ));
    }

    #[test]
    fn test_malformed_fields_mean_no_video() {
        assert_eq!(Locator::decode(None), None);
        for field in ["", "nocomma", "a,b,c", ",key", "bucket,", ","] {
            assert_eq!(Locator::decode(Some(field)), None, "{field:?}");
        }
    }
}
