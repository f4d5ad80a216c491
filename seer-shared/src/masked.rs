use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const MASK: &str = "********";

/// A secret configuration value (tokens, keys). Debug, Display and Serialize
/// all print a mask; the real value is only reachable through `expose`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(T);

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Masked<String> {
    /// True when the secret is missing in all but name (empty or whitespace).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(MASK)
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_never_printed() {
        let token = Masked::new("sync-token-123".to_string());

        assert_eq!(format!("{:?}", token), MASK);
        assert_eq!(token.to_string(), MASK);
        assert_eq!(serde_json::to_string(&token).unwrap(), format!("\"{}\"", MASK));
        assert_eq!(token.expose(), "sync-token-123");
    }

    #[test]
    fn test_deserializes_transparently() {
        let token: Masked<String> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(token.into_inner(), "abc");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Masked::new("   ".to_string()).is_blank());
        assert!(!Masked::new("x".to_string()).is_blank());
    }
}
