use crate::model::FetchState;

/// The single branch a screen renders for a given [`FetchState`].
#[derive(Debug, Clone, PartialEq)]
pub enum View<T> {
    Loading,
    Error(String),
    /// Nothing fetched yet, or the payload held nothing worth showing.
    Empty,
    Ready(T),
}

impl<T> View<T> {
    /// Map a state onto a view, delegating successful payloads to `ready`.
    /// `ready` returning `None` means the payload is empty or unusable.
    pub fn from_state(
        state: &FetchState,
        ready: impl FnOnce(&serde_json::Value) -> Option<T>,
    ) -> Self {
        match state {
            FetchState::Loading => View::Loading,
            FetchState::Failure(message) => View::Error(message.clone()),
            FetchState::Idle => View::Empty,
            FetchState::Success(data) => ready(data).map_or(View::Empty, View::Ready),
        }
    }
}
