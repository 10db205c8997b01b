use strum::Display;

/// Fetch lifecycle of a view's primary data.
///
/// `Ready` with an empty list is the empty state; it is distinct from
/// `Idle` (never fetched) and `Failed` (the last fetch raised an error).
#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    #[strum(to_string = "failed")]
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
