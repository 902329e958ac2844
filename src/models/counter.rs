use serde::{Deserialize, Serialize};

/// Visit counter behind `GET /ping`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counter {
    #[serde(skip)]
    pub id: i64,
    pub visit: i64,
}
