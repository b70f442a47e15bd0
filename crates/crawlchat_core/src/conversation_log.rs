use crate::render::{escape_markup, render_markup};

pub type EntryId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
    System,
}

/// One immutable line of the conversation.
///
/// `rendered` is computed once when the entry is appended and never again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    id: EntryId,
    role: Role,
    raw: String,
    rendered: String,
}

impl MessageEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn raw_content(&self) -> &str {
        &self.raw
    }

    pub fn rendered_content(&self) -> &str {
        &self.rendered
    }
}

/// Append-only, ordered store of message entries plus the transient typing
/// placeholder, which is never part of the permanent entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationLog {
    entries: Vec<MessageEntry>,
    next_id: EntryId,
    typing: bool,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// User text is escaped only; bot and system text go through the full renderer.
    pub fn append(&mut self, role: Role, raw: impl Into<String>) -> &MessageEntry {
        let raw = raw.into();
        let rendered = match role {
            Role::User => escape_markup(&raw),
            Role::Bot | Role::System => render_markup(&raw),
        };
        self.next_id += 1;
        let index = self.entries.len();
        self.entries.push(MessageEntry {
            id: self.next_id,
            role,
            raw,
            rendered,
        });
        &self.entries[index]
    }

    pub fn snapshot(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub(crate) fn show_typing(&mut self) {
        self.typing = true;
    }

    pub(crate) fn clear_typing(&mut self) {
        self.typing = false;
    }
}
