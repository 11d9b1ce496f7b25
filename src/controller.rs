use crate::backend::ChatBackend;
use crate::error::BackendError;
use crate::session::store::SessionStorage;
use crate::session::{next_session_id, title_from_message, Message, Session, FALLBACK_TEXT};
use crate::view::ChatView;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnId(pub u64);

/// A submitted user message waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub turn: TurnId,
    pub session_id: String,
    pub text: String,
}

/// Owns the session store and keeps a [`ChatView`] in step with it.
///
/// Sessions are kept most-recent first and written back in full after every
/// mutation. Several turns may be in flight at once; each reply lands in the
/// session it was submitted from.
pub struct ChatController<S> {
    storage: S,
    sessions: Vec<Session>,
    current_id: Option<String>,
    pending: BTreeMap<TurnId, String>,
    next_turn: u64,
}

impl<S: SessionStorage> ChatController<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            sessions: Vec::new(),
            current_id: None,
            pending: BTreeMap::new(),
            next_turn: 0,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn current_session(&self) -> Option<&Session> {
        let id = self.current_id.as_deref()?;
        self.sessions.iter().find(|session| session.id == id)
    }

    pub fn pending_turns(&self) -> usize {
        self.pending.len()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn initialize(&mut self, view: &mut impl ChatView) {
        self.sessions = match self.storage.load() {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("ignoring unreadable chat history: {err}");
                Vec::new()
            }
        };
        info!(sessions = self.sessions.len(), "chat history loaded");

        match self.sessions.first().map(|session| session.id.clone()) {
            Some(id) => self.select_session(&id, view),
            None => self.create_session(view),
        }
    }

    pub fn create_session(&mut self, view: &mut impl ChatView) {
        let id = next_session_id(&self.sessions);
        info!(session_id = %id, "creating chat session");
        self.sessions.insert(0, Session::new(id.clone()));
        self.persist();
        self.select_session(&id, view);
    }

    pub fn select_session(&mut self, id: &str, view: &mut impl ChatView) {
        let Some(session) = self.sessions.iter().find(|session| session.id == id) else {
            debug!(session_id = %id, "ignoring selection of unknown session");
            return;
        };

        view.render_messages(&session.messages);
        for (turn, session_id) in &self.pending {
            if session_id == id {
                view.show_placeholder(*turn);
            }
        }
        self.current_id = Some(id.to_string());
        view.render_session_list(&self.sessions, self.current_id.as_deref());
    }

    /// Records a user message in the current session and opens a turn for
    /// it. Returns `None` for blank input, which changes nothing.
    pub fn submit_user_message(
        &mut self,
        text: &str,
        view: &mut impl ChatView,
    ) -> Option<ReplyRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let current_id = self.current_id.clone()?;
        let session = self
            .sessions
            .iter_mut()
            .find(|session| session.id == current_id)?;

        let renamed = session.is_untouched();
        if renamed {
            session.title = title_from_message(text);
        }
        let message = Message::user(text);
        session.messages.push(message.clone());
        self.persist();

        if renamed {
            view.render_session_list(&self.sessions, self.current_id.as_deref());
        }
        view.append_message(&message);

        let turn = TurnId(self.next_turn);
        self.next_turn += 1;
        self.pending.insert(turn, current_id.clone());
        view.show_placeholder(turn);
        debug!(turn = turn.0, session_id = %current_id, "chat turn opened");

        Some(ReplyRequest {
            turn,
            session_id: current_id,
            text: text.to_string(),
        })
    }

    /// Closes a turn: the answer, or the fallback text on any failure, is
    /// appended to the originating session.
    pub fn finish_reply(
        &mut self,
        turn: TurnId,
        outcome: Result<String, BackendError>,
        view: &mut impl ChatView,
    ) {
        view.remove_placeholder(turn);
        let Some(session_id) = self.pending.remove(&turn) else {
            debug!(turn = turn.0, "dropping reply for a discarded turn");
            return;
        };

        let message = match outcome {
            Ok(answer) => Message::bot(answer),
            Err(err) => {
                warn!(turn = turn.0, "reply failed, using fallback: {err}");
                Message::bot(FALLBACK_TEXT)
            }
        };

        let Some(session) = self.sessions.iter_mut().find(|session| session.id == session_id)
        else {
            debug!(turn = turn.0, session_id = %session_id, "session gone before reply");
            return;
        };
        session.messages.push(message.clone());
        self.persist();

        if self.current_id.as_deref() == Some(session_id.as_str()) {
            view.append_message(&message);
        }
        debug!(turn = turn.0, "chat turn closed");
    }

    /// Asks `backend` for the reply to `request` and applies it in place.
    pub async fn request_reply(
        &mut self,
        backend: &dyn ChatBackend,
        request: ReplyRequest,
        view: &mut impl ChatView,
    ) {
        let outcome = backend.ask(&request.text).await;
        self.finish_reply(request.turn, outcome, view);
    }

    /// Drops every session, in memory and on disk, and starts over with one
    /// fresh session. Callers are expected to have confirmed with the user.
    pub fn clear_all(&mut self, view: &mut impl ChatView) {
        info!(sessions = self.sessions.len(), "clearing chat history");
        if let Err(err) = self.storage.clear() {
            warn!("failed to remove stored chat history: {err}");
        }
        self.sessions.clear();
        self.pending.clear();
        self.current_id = None;
        self.create_session(view);
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.sessions) {
            warn!("failed to persist chat history: {err}");
        }
    }
}
