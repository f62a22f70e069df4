//! Message processing
//!
//! Runs a message through the TEA update function, dispatching any action
//! and following up messages until the chain settles.

use std::sync::Arc;

use farmdesk_api::Backend;
use tokio::sync::mpsc;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<B>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    backend: &Arc<B>,
) where
    B: Backend + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), Arc::clone(backend));
        }

        msg = result.message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListPhase;
    use crate::state::SessionStatus;
    use farmdesk_api::test_utils::{admin_user, test_farmers, MemoryBackend};
    use farmdesk_core::Resource;

    #[tokio::test]
    async fn test_user_load_chains_into_first_list() {
        let backend = Arc::new(MemoryBackend::new().with_rows(Resource::Advisors, test_farmers(5)));
        let (tx, mut rx) = mpsc::channel(8);
        let mut state = AppState::default();

        process_message(&mut state, Message::UserLoaded(admin_user()), &tx, &backend);

        assert_eq!(state.session, SessionStatus::SignedIn);
        assert_eq!(state.current_resource(), Some(Resource::Advisors));

        let loaded = rx.recv().await.expect("list result");
        assert!(matches!(loaded, Message::ListLoaded { .. }));
        process_message(&mut state, loaded, &tx, &backend);

        let screen = state.screen.as_ref().expect("screen");
        assert_eq!(screen.list.phase, ListPhase::Loaded);
        assert_eq!(screen.list.rows.len(), 5);
        assert_eq!(backend.list_calls(), 1);
    }
}
