// Hash based page router

use crate::location::{ListenerId, Location};
use crate::page::Page;
use crate::store::{Subscription, Writable};
use tracing::debug;

/// Publishes the page named by the URL fragment.
///
/// The current page is recomputed whenever the location fires a hashchange.
/// Fragments that do not name a page resolve to the dashboard; the fragment
/// itself is left as is.
pub struct Router {
    location: Location,
    page: Writable<Page>,
    listener: ListenerId,
}

impl Router {
    pub fn new(location: Location) -> Self {
        let page = Writable::new(resolve(&location.fragment()));

        let store = page.clone();
        let current = location.clone();
        // Handlers see the fragment as it is now, not as it was when the event was queued
        let listener = location.add_listener(move |_| {
            let next = resolve(&current.fragment());
            debug!("Route changed to {}", next);
            store.set(next);
        });

        Self {
            location,
            page,
            listener,
        }
    }

    /// Called once right away with the current page, then on every change
    pub fn subscribe(&self, callback: impl Fn(&Page) + 'static) -> Subscription {
        self.page.subscribe(callback)
    }

    pub fn current(&self) -> Page {
        self.page.get()
    }

    /// Write `page` into the URL fragment as given. It is checked only when
    /// the resulting hashchange is handled.
    pub fn go(&self, page: &str) {
        debug!("Navigating to #{}", page);
        self.location.set_hash(page);
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.location.remove_listener(self.listener);
    }
}

fn resolve(fragment: &str) -> Page {
    let page = Page::from_fragment(fragment);
    if page.as_str() != fragment {
        debug!("Unknown route #{}, showing {}", fragment, page);
    }
    page
}
