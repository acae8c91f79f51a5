/// A channel of the chat workspace, as seen through an adapter lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: Option<String>,
    /// True for one-on-one direct message channels.
    pub is_direct: bool,
}

impl Channel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_direct: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn direct(mut self) -> Self {
        self.is_direct = true;
        self
    }
}
