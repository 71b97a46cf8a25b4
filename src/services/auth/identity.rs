use std::collections::BTreeSet;

use serde::Serialize;

/// The authenticated principal for one request.
///
/// Built fresh from verified token claims by the authentication stage and
/// dropped with the request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
