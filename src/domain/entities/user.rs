/// A user of the chat workspace, as seen through an adapter lookup.
///
/// Looked up, never mutated. `is_owner` gates the privileged commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub is_owner: bool,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_owner: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn owner(mut self) -> Self {
        self.is_owner = true;
        self
    }

    /// The platform mention token for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
