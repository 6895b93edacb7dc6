use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Structural corruption: {0}")]
    Corruption(String),
}

impl Error {
    pub(crate) fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::InvalidConfig("order must be at least 3".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: order must be at least 3");

        let err = Error::corruption("leaf out of order");
        assert_eq!(err.to_string(), "Structural corruption: leaf out of order");
    }
}
