//! Observable state containers shared between producers and the presentation layer.
//!
//! A [`Store`] is a cloneable handle over a `tokio::sync::watch` channel. Every
//! write publishes a complete value, so a reader either sees the state before
//! an update or after it, never a partially applied one.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

pub struct Store<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&*self.tx.borrow()).finish()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Run `f` against the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver notified after every published write.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Replace the whole value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Modify in place and publish once `f` returns.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Like [`Store::update`] but only notifies subscribers when `f` returns true.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

impl<T: Clone> Store<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_complete_updates() {
        let store = Store::new((0_u32, 0_u32));
        let mut rx = store.subscribe();

        store.update(|pair| {
            pair.0 = 1;
            pair.1 = 1;
        });

        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), (1, 1));
    }

    #[test]
    fn writes_without_subscribers_are_kept() {
        let store = Store::new(1_u32);
        assert_eq!(store.replace(2), 1);
        store.update(|v| *v += 1);
        assert_eq!(store.get(), 3);
    }

    #[test]
    fn update_if_skips_notification_when_unchanged() {
        let store = Store::new(5_u32);
        let rx = store.subscribe();
        assert!(!store.update_if(|_| false));
        assert!(!rx.has_changed().expect("sender alive"));
        assert!(store.update_if(|v| {
            *v = 6;
            true
        }));
        assert!(rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn clones_share_state() {
        let store = Store::new(String::from("a"));
        let other = store.clone();
        other.replace(String::from("b"));
        assert_eq!(store.read(|s| s.len()), 1);
        assert_eq!(store.get(), "b");
    }
}
