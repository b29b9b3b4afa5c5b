//! Long-operation event plumbing
//!
//! Backend calls run on the tokio runtime while the GUI thread drains
//! an event channel. A `Processing` event is sent before the task is
//! spawned, so for any one operation the receiver always sees
//! `Processing` before its terminal `Succeeded`/`Failed` event.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::error::Result;

pub type OperationId = u64;

/// Lifecycle events for one spawned backend call
#[derive(Debug)]
pub enum OperationEvent<T> {
    Processing { operation: OperationId },
    Succeeded { operation: OperationId, value: T },
    Failed { operation: OperationId, error: ClientError },
}

impl<T> OperationEvent<T> {
    pub fn operation(&self) -> OperationId {
        match self {
            OperationEvent::Processing { operation }
            | OperationEvent::Succeeded { operation, .. }
            | OperationEvent::Failed { operation, .. } => *operation,
        }
    }
}

/// Spawns backend calls and reports their lifecycle on a channel
pub struct Operations<T> {
    events: mpsc::UnboundedSender<OperationEvent<T>>,
    next_id: AtomicU64,
}

impl<T: Send + 'static> Operations<T> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OperationEvent<T>>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                events,
                next_id: AtomicU64::new(1),
            },
            receiver,
        )
    }

    /// Run `future` in the background, reporting its outcome by id.
    ///
    /// Send failures are ignored: a dropped receiver means the UI is
    /// shutting down and nobody is listening.
    pub fn spawn<F>(&self, future: F) -> OperationId
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let operation = self.next_id.fetch_add(1, Ordering::Relaxed);
        let events = self.events.clone();
        let _ = events.send(OperationEvent::Processing { operation });
        tokio::spawn(async move {
            let event = match future.await {
                Ok(value) => OperationEvent::Succeeded { operation, value },
                Err(error) => OperationEvent::Failed { operation, error },
            };
            let _ = events.send(event);
        });
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_processing_precedes_terminal_event() {
        let (operations, mut events) = Operations::new();
        let id = operations.spawn(async { Ok(41) });

        match events.recv().await {
            Some(OperationEvent::Processing { operation }) => assert_eq!(operation, id),
            other => panic!("Expected Processing first, got {:?}", other),
        }
        match events.recv().await {
            Some(OperationEvent::Succeeded { operation, value }) => {
                assert_eq!(operation, id);
                assert_eq!(value, 41);
            }
            other => panic!("Expected Succeeded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_is_reported_with_the_same_id() {
        let (operations, mut events) = Operations::<i32>::new();
        let id = operations.spawn(async { Err(ClientError::Server(503)) });

        assert_eq!(events.recv().await.map(|e| e.operation()), Some(id));
        match events.recv().await {
            Some(OperationEvent::Failed { operation, error }) => {
                assert_eq!(operation, id);
                assert!(matches!(error, ClientError::Server(503)));
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let (operations, mut events) = Operations::new();
        let first = operations.spawn(async { Ok(()) });
        let second = operations.spawn(async { Ok(()) });
        assert_ne!(first, second);

        // Both Processing events are sent synchronously, in spawn order
        assert_eq!(events.recv().await.map(|e| e.operation()), Some(first));
        assert_eq!(events.recv().await.map(|e| e.operation()), Some(second));
    }
}
