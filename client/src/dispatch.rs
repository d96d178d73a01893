//! The dispatch registry: data-domain name to the refresh capability of the
//! currently mounted widget.
//!
//! This is the only channel by which the push-event router reaches concrete
//! widgets. It holds capabilities, not data, so the router stays decoupled
//! from any widget's internal state shape.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

/// Data domains a widget can own. At most one active entry per domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Domain {
    Blocks,
    Peers,
    Mempool,
    #[strum(serialize = "default-wallet")]
    Wallet,
    Power,
}

/// A refresh trigger. Must not block: long work is spawned by the capability
/// itself, so dispatching never stalls the event loop.
pub type RefreshFn = Arc<dyn Fn() + Send + Sync>;

/// Proof of registration. Unregistering with a stale token — one whose
/// domain has since been re-registered — is a no-op, so a late unmount
/// cannot evict its replacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchToken {
    domain: Domain,
    serial: u64,
}

struct Entry {
    serial: u64,
    refresh: RefreshFn,
}

#[derive(Default)]
pub struct RefreshDispatcher {
    entries: Mutex<HashMap<Domain, Entry>>,
    serial: AtomicU64,
}

impl RefreshDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the refresh capability for a domain. Last registered wins:
    /// a view swap unregisters the old widget before the new one registers,
    /// so replacement is expected rather than an error.
    pub fn register(&self, domain: Domain, refresh: RefreshFn) -> DispatchToken {
        let serial = self.serial.fetch_add(1, Ordering::Relaxed) + 1;
        let mut entries = self.entries.lock().unwrap();
        if entries.insert(domain, Entry { serial, refresh }).is_some() {
            tracing::debug!(%domain, "dispatch entry replaced");
        }
        DispatchToken { domain, serial }
    }

    pub fn unregister(&self, token: &DispatchToken) {
        let mut entries = self.entries.lock().unwrap();
        if entries
            .get(&token.domain)
            .is_some_and(|entry| entry.serial == token.serial)
        {
            entries.remove(&token.domain);
        }
    }

    /// Invokes the registered capability for the domain, if any. A domain
    /// with no mounted widget is "no subscriber", not an error; the trigger
    /// is dropped, never queued or replayed.
    pub fn dispatch(&self, domain: Domain) -> bool {
        let refresh = {
            self.entries
                .lock()
                .unwrap()
                .get(&domain)
                .map(|entry| entry.refresh.clone())
        };
        match refresh {
            Some(refresh) => {
                refresh();
                true
            }
            None => {
                tracing::trace!(%domain, "no subscriber for domain");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter_fn(counter: &Arc<AtomicUsize>) -> RefreshFn {
        let counter = counter.clone();
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn second_registration_replaces_the_first() {
        let dispatcher = RefreshDispatcher::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        dispatcher.register(Domain::Blocks, counter_fn(&first));
        dispatcher.register(Domain::Blocks, counter_fn(&second));

        assert!(dispatcher.dispatch(Domain::Blocks));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispatch_without_subscriber_is_a_noop() {
        let dispatcher = RefreshDispatcher::new();
        assert!(!dispatcher.dispatch(Domain::Peers));
    }

    #[test]
    fn unregister_removes_the_entry() {
        let dispatcher = RefreshDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let token = dispatcher.register(Domain::Mempool, counter_fn(&count));

        dispatcher.unregister(&token);
        assert!(!dispatcher.dispatch(Domain::Mempool));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stale_token_cannot_evict_the_replacement() {
        let dispatcher = RefreshDispatcher::new();
        let old = Arc::new(AtomicUsize::new(0));
        let new = Arc::new(AtomicUsize::new(0));

        let stale = dispatcher.register(Domain::Wallet, counter_fn(&old));
        dispatcher.register(Domain::Wallet, counter_fn(&new));
        dispatcher.unregister(&stale);

        assert!(dispatcher.dispatch(Domain::Wallet));
        assert_eq!(new.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn domain_names_match_their_display_form() {
        assert_eq!(Domain::Wallet.to_string(), "default-wallet");
        assert_eq!(Domain::Blocks.to_string(), "blocks");
        assert_eq!(Domain::Power.to_string(), "power");
    }
}
