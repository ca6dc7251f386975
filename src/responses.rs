//! Wire types returned by the users endpoint.

use serde::{Deserialize, Serialize};

use crate::types::User;

/// One slice of the user list plus the server-reported total.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub total: usize,
}
