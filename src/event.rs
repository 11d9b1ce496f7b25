use crate::controller::TurnId;
use crate::error::BackendError;

#[derive(Debug)]
pub enum AppEvent {
    ReplyFinished {
        turn: TurnId,
        outcome: Result<String, BackendError>,
    },
}
