use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceHealth {
    pub status: String,
    pub version: String,
}

impl Display for ServiceHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (v{})", self.status, self.version)
    }
}
