use crate::controller::TurnId;
use crate::session::{Message, Session};

/// The rendering surface the controller drives. The controller never reads
/// back from it.
pub trait ChatView {
    fn render_session_list(&mut self, sessions: &[Session], current: Option<&str>);
    fn render_messages(&mut self, messages: &[Message]);
    fn append_message(&mut self, message: &Message);
    fn show_placeholder(&mut self, turn: TurnId);
    fn remove_placeholder(&mut self, turn: TurnId);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Message(Message),
    Typing(TurnId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionItem {
    pub id: String,
    pub title: String,
    pub active: bool,
}

/// Display lists painted by the egui app each frame.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    session_items: Vec<SessionItem>,
    scroll_to_bottom: bool,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn session_items(&self) -> &[SessionItem] {
        &self.session_items
    }

    /// Returns the pending scroll request and resets it.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }
}

impl ChatView for Transcript {
    fn render_session_list(&mut self, sessions: &[Session], current: Option<&str>) {
        self.session_items = sessions
            .iter()
            .map(|session| SessionItem {
                id: session.id.clone(),
                title: session.title.clone(),
                active: current == Some(session.id.as_str()),
            })
            .collect();
    }

    fn render_messages(&mut self, messages: &[Message]) {
        self.entries = messages.iter().cloned().map(TranscriptEntry::Message).collect();
        self.scroll_to_bottom = true;
    }

    fn append_message(&mut self, message: &Message) {
        self.entries.push(TranscriptEntry::Message(message.clone()));
        self.scroll_to_bottom = true;
    }

    fn show_placeholder(&mut self, turn: TurnId) {
        self.entries.push(TranscriptEntry::Typing(turn));
        self.scroll_to_bottom = true;
    }

    fn remove_placeholder(&mut self, turn: TurnId) {
        self.entries
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing(pending) if *pending == turn));
    }
}
