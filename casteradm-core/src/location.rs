// URL fragment with hashchange notification

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Callback invoked with the new fragment (without `#`) on every hashchange
pub type HashChangeListener = Rc<dyn Fn(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct LocationState {
    fragment: String,
    pending: VecDeque<String>,
    listeners: Vec<(ListenerId, HashChangeListener)>,
    next_id: u64,
}

/// The fragment part of the current URL.
///
/// Changing the fragment queues a hashchange event instead of notifying
/// listeners right away; `dispatch_pending` delivers queued events, playing
/// the role of the host event loop. Clones share the same location.
#[derive(Clone, Default)]
pub struct Location {
    state: Rc<RefCell<LocationState>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(hash: &str) -> Self {
        let location = Self::new();
        location.state.borrow_mut().fragment = strip_hash(hash).to_string();
        location
    }

    /// Fragment including the leading `#`, or an empty string when there is none
    pub fn hash(&self) -> String {
        let state = self.state.borrow();
        if state.fragment.is_empty() {
            String::new()
        } else {
            format!("#{}", state.fragment)
        }
    }

    pub fn fragment(&self) -> String {
        self.state.borrow().fragment.clone()
    }

    /// Rewrite the fragment. A hashchange is queued only when the value changes.
    pub fn set_hash(&self, hash: &str) {
        let fragment = strip_hash(hash);
        let mut state = self.state.borrow_mut();
        if state.fragment == fragment {
            return;
        }

        trace!("hashchange queued: #{} -> #{}", state.fragment, fragment);
        state.fragment = fragment.to_string();
        state.pending.push_back(fragment.to_string());
    }

    pub fn add_listener(&self, listener: impl Fn(&str) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        let listener: HashChangeListener = Rc::new(listener);
        state.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn has_pending(&self) -> bool {
        !self.state.borrow().pending.is_empty()
    }

    /// Deliver the hashchange events queued so far. Events queued by the
    /// listeners themselves wait for the next call.
    pub fn dispatch_pending(&self) -> usize {
        let events: Vec<String> = self.state.borrow_mut().pending.drain(..).collect();

        for fragment in &events {
            // Snapshot so listeners can add or remove listeners while running
            let listeners: Vec<HashChangeListener> = self
                .state
                .borrow()
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();

            for listener in listeners {
                listener(fragment);
            }
        }

        events.len()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Location")
            .field("fragment", &state.fragment)
            .field("pending", &state.pending.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

fn strip_hash(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hash_formatting() {
        let location = Location::new();
        assert_eq!(location.hash(), "");

        let location = Location::with_hash("#sources");
        assert_eq!(location.hash(), "#sources");
        assert_eq!(location.fragment(), "sources");
    }

    #[test]
    fn test_set_hash_is_delivered_on_dispatch() {
        let location = Location::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        location.add_listener(move |fragment| seen_clone.borrow_mut().push(fragment.to_string()));

        location.set_hash("auth");
        assert!(seen.borrow().is_empty());
        assert!(location.has_pending());

        assert_eq!(location.dispatch_pending(), 1);
        assert_eq!(*seen.borrow(), vec!["auth".to_string()]);
    }

    #[test]
    fn test_same_hash_queues_nothing() {
        let location = Location::with_hash("auth");
        location.set_hash("#auth");
        assert!(!location.has_pending());
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let location = Location::new();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let id = location.add_listener(move |_| calls_clone.set(calls_clone.get() + 1));

        location.remove_listener(id);
        location.set_hash("settings");
        location.dispatch_pending();

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_reentrant_set_hash_waits_for_next_dispatch() {
        let location = Location::new();
        let inner = location.clone();
        location.add_listener(move |fragment| {
            if fragment == "bogus" {
                inner.set_hash("dashboard");
            }
        });

        location.set_hash("bogus");
        assert_eq!(location.dispatch_pending(), 1);
        assert!(location.has_pending());
        assert_eq!(location.dispatch_pending(), 1);
        assert_eq!(location.fragment(), "dashboard");
    }
}
