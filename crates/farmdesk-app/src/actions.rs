//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Each backend call runs in its own task and reports back with a
//! [`Message`]. Nothing here touches [`AppState`](crate::state::AppState).

use std::sync::Arc;

use farmdesk_api::Backend;
use farmdesk_core::prelude::*;
use tokio::sync::mpsc;

use crate::export;
use crate::message::{Message, RequestFailure};
use crate::UpdateAction;

/// Execute an action by spawning a background task
pub fn handle_action<B>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, backend: Arc<B>)
where
    B: Backend + Send + Sync + 'static,
{
    match action {
        UpdateAction::LoadCurrentUser => {
            tokio::spawn(async move {
                let msg = match backend.current_user().await {
                    Ok(user) => Message::UserLoaded(user),
                    Err(e) => Message::UserLoadFailed(RequestFailure::from(e)),
                };
                send(&msg_tx, msg).await;
            });
        }

        UpdateAction::LoadList {
            resource,
            token,
            query,
        } => {
            tokio::spawn(async move {
                debug!("Loading {} page {}", resource.slug(), query.page);
                let msg = match backend.list(resource, &query).await {
                    Ok(page) => Message::ListLoaded {
                        resource,
                        token,
                        page,
                    },
                    Err(e) => Message::ListFailed {
                        resource,
                        token,
                        failure: RequestFailure::from(e),
                    },
                };
                send(&msg_tx, msg).await;
            });
        }

        UpdateAction::CreateRecord { resource, record } => {
            tokio::spawn(async move {
                let msg = match backend.create(resource, &record).await {
                    Ok(record) => Message::RecordSaved {
                        resource,
                        record,
                        created: true,
                    },
                    Err(e) => Message::SaveFailed {
                        resource,
                        failure: RequestFailure::from(e),
                    },
                };
                send(&msg_tx, msg).await;
            });
        }

        UpdateAction::UpdateRecord {
            resource,
            id,
            record,
        } => {
            tokio::spawn(async move {
                let msg = match backend.update(resource, &id, &record).await {
                    Ok(record) => Message::RecordSaved {
                        resource,
                        record,
                        created: false,
                    },
                    Err(e) => Message::SaveFailed {
                        resource,
                        failure: RequestFailure::from(e),
                    },
                };
                send(&msg_tx, msg).await;
            });
        }

        UpdateAction::DeleteRecord {
            resource,
            id,
            deleted_by,
        } => {
            tokio::spawn(async move {
                let msg = match backend.delete(resource, &id, &deleted_by).await {
                    Ok(()) => Message::RecordDeleted { resource, id },
                    Err(e) => Message::DeleteFailed {
                        resource,
                        failure: RequestFailure::from(e),
                    },
                };
                send(&msg_tx, msg).await;
            });
        }

        UpdateAction::CheckUnique {
            resource,
            exclude_id,
            checks,
        } => {
            for check in checks {
                let backend = Arc::clone(&backend);
                let msg_tx = msg_tx.clone();
                let exclude_id = exclude_id.clone();
                tokio::spawn(async move {
                    let result = backend
                        .check_unique(resource, &check.field, &check.value, exclude_id.as_deref())
                        .await;
                    let msg = match result {
                        Ok(available) => Message::UniqueChecked {
                            resource,
                            field: check.field,
                            token: check.token,
                            available,
                        },
                        Err(e) => Message::UniqueCheckFailed {
                            resource,
                            field: check.field,
                            token: check.token,
                            failure: RequestFailure::from(e),
                        },
                    };
                    send(&msg_tx, msg).await;
                });
            }
        }

        UpdateAction::SyncColumns { key, columns } => {
            // Fire-and-forget: the local copy is already stored
            tokio::spawn(async move {
                if let Err(e) = backend.save_columns(&key, &columns).await {
                    warn!("Column sync for {} failed: {}", key, e);
                }
            });
        }

        UpdateAction::WriteCsv { path, content } => {
            tokio::spawn(async move {
                let result =
                    tokio::task::spawn_blocking(move || export::write_export(&path, &content))
                        .await;
                let msg = match result {
                    Ok(Ok(path)) => Message::ExportWritten { path },
                    Ok(Err(e)) => Message::ExportFailed {
                        message: e.to_string(),
                    },
                    Err(e) => Message::ExportFailed {
                        message: format!("Export task failed: {}", e),
                    },
                };
                send(&msg_tx, msg).await;
            });
        }
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed; dropping result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestSequence;
    use farmdesk_api::test_utils::{test_farmers, MemoryBackend};
    use farmdesk_api::ListQuery;
    use farmdesk_core::Resource;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_rows(Resource::Farmers, test_farmers(30)))
    }

    #[tokio::test]
    async fn test_load_list_reports_page() {
        let (tx, mut rx) = mpsc::channel(4);
        let token = RequestSequence::new().issue();
        handle_action(
            UpdateAction::LoadList {
                resource: Resource::Farmers,
                token,
                query: ListQuery::new(2, 10),
            },
            tx,
            backend(),
        );

        match rx.recv().await {
            Some(Message::ListLoaded {
                token: got, page, ..
            }) => {
                assert_eq!(got, token);
                assert_eq!(page.rows.len(), 10);
                assert_eq!(page.total, 30);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_panicked() {
        let backend = backend();
        backend.fail_next(503, "maintenance");
        let (tx, mut rx) = mpsc::channel(4);
        handle_action(UpdateAction::LoadCurrentUser, tx, backend);

        match rx.recv().await {
            Some(Message::UserLoadFailed(failure)) => {
                assert_eq!(failure.status, Some(503));
                assert!(!failure.unauthorized);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_passes_deleted_by() {
        let backend = backend();
        let (tx, mut rx) = mpsc::channel(4);
        handle_action(
            UpdateAction::DeleteRecord {
                resource: Resource::Farmers,
                id: "3".into(),
                deleted_by: "ana".into(),
            },
            tx,
            Arc::clone(&backend),
        );

        assert!(matches!(
            rx.recv().await,
            Some(Message::RecordDeleted { ref id, .. }) if id == "3"
        ));
        let deletes = backend.deletes();
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].deleted_by, "ana");
    }

    #[tokio::test]
    async fn test_write_csv_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("farmers.csv");
        let (tx, mut rx) = mpsc::channel(4);
        handle_action(
            UpdateAction::WriteCsv {
                path: path.clone(),
                content: "a".into(),
            },
            tx,
            backend(),
        );

        match rx.recv().await {
            Some(Message::ExportWritten { path: written }) => assert_eq!(written, path),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
