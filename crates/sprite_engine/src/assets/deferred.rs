//! Cancellation-aware deferred results
//!
//! A loader hands out a [`Deferred`] and keeps the matching [`Resolver`].
//! Dropping the `Deferred` cancels the request: the resolver notices and a
//! late `resolve` is discarded instead of reaching a torn-down scene.

use super::AssetError;
use std::task::Poll;

/// Create a connected resolver / deferred pair
pub fn deferred<T>() -> (Resolver<T>, Deferred<T>) {
    let (sender, receiver) = flume::bounded(1);
    (
        Resolver { sender },
        Deferred {
            receiver,
            finished: false,
        },
    )
}

/// Producer side of a deferred result
#[derive(Debug)]
pub struct Resolver<T> {
    sender: flume::Sender<Result<T, AssetError>>,
}

impl<T> Resolver<T> {
    /// Deliver the result. Returns false when the request was cancelled.
    pub fn resolve(self, result: Result<T, AssetError>) -> bool {
        self.sender.send(result).is_ok()
    }

    /// Whether the consumer has gone away
    pub fn is_cancelled(&self) -> bool {
        self.sender.is_disconnected()
    }
}

/// Consumer side of a deferred result, polled once per frame
#[derive(Debug)]
pub struct Deferred<T> {
    receiver: flume::Receiver<Result<T, AssetError>>,
    finished: bool,
}

impl<T> Deferred<T> {
    /// A deferred that is already resolved
    pub fn ready(result: Result<T, AssetError>) -> Self {
        let (resolver, deferred) = deferred();
        resolver.resolve(result);
        deferred
    }

    /// Check for the result without blocking. Yields `Ready` exactly once.
    pub fn poll(&mut self) -> Poll<Result<T, AssetError>> {
        if self.finished {
            return Poll::Pending;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finished = true;
                Poll::Ready(result)
            }
            Err(flume::TryRecvError::Empty) => Poll::Pending,
            Err(flume::TryRecvError::Disconnected) => {
                self.finished = true;
                Poll::Ready(Err(AssetError::Abandoned))
            }
        }
    }

    /// Whether `poll` has already yielded its result
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_once() {
        let (resolver, mut pending) = deferred::<u32>();
        assert!(pending.poll().is_pending());
        assert!(resolver.resolve(Ok(7)));
        assert_eq!(pending.poll(), Poll::Ready(Ok(7)));
        assert!(pending.poll().is_pending());
        assert!(pending.is_finished());
    }

    #[test]
    fn test_dropping_deferred_cancels() {
        let (resolver, pending) = deferred::<u32>();
        drop(pending);
        assert!(resolver.is_cancelled());
        assert!(!resolver.resolve(Ok(1)));
    }

    #[test]
    fn test_dropped_resolver_is_reported() {
        let (resolver, mut pending) = deferred::<u32>();
        drop(resolver);
        assert_eq!(pending.poll(), Poll::Ready(Err(AssetError::Abandoned)));
    }
}
