//! controller::registry
//!
//! Lookup of live controllers by id.
//!
//! # Lifecycle
//!
//! A controller enters the registry through [`Registry::create`] and
//! leaves it only through [`Registry::close`]. Nothing is reclaimed
//! implicitly: a controller that is never closed stays reachable for the
//! life of the process. [`ScopedController`] closes on drop, so a test
//! holding one releases its controller on every exit path, including
//! panics.
//!
//! # Locking
//!
//! The registry has its own mutex, independent of any controller's. It is
//! released before a closing controller's repositories are discarded, so
//! the two locks are never nested.
//!
//! # Example
//!
//! ```
//! use mockscm::controller::registry::Registry;
//!
//! let registry = Registry::new();
//! let id = {
//!     let scm = registry.scoped();
//!     let id = scm.id().clone();
//!     assert!(registry.lookup(id.as_str()).is_some());
//!     id
//! };
//! // Dropping the guard closed the controller.
//! assert!(registry.lookup(id.as_str()).is_none());
//! ```

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::info;

use super::clock::{Clock, SystemClock};
use super::{Controller, ControllerId};

/// A map of live controllers keyed by id.
#[derive(Debug, Default)]
pub struct Registry {
    controllers: Mutex<HashMap<ControllerId, Controller>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an empty registry.
    ///
    /// Tests that need isolation from other tests in the same process use
    /// their own registry; everything else shares [`Registry::global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Create and register an empty controller with wall-clock timestamps.
    pub fn create(&self) -> Controller {
        self.create_with_clock(Arc::new(SystemClock))
    }

    /// Create and register an empty controller with a custom time source.
    pub fn create_with_clock(&self, clock: Arc<dyn Clock>) -> Controller {
        let controller = Controller::with_clock(clock);
        self.controllers
            .lock()
            .insert(controller.id().clone(), controller.clone());
        info!(controller = %controller.id(), "created controller");
        controller
    }

    /// Create a controller that is closed when the returned guard drops.
    pub fn scoped(&self) -> ScopedController<'_> {
        ScopedController {
            registry: self,
            controller: self.create(),
        }
    }

    /// Like [`Registry::scoped`], with a custom time source.
    pub fn scoped_with_clock(&self, clock: Arc<dyn Clock>) -> ScopedController<'_> {
        ScopedController {
            registry: self,
            controller: self.create_with_clock(clock),
        }
    }

    /// Find a live controller by id.
    ///
    /// `None` is the normal answer for an id whose controller has been
    /// closed, or that never existed.
    pub fn lookup(&self, id: &str) -> Option<Controller> {
        self.controllers.lock().get(&ControllerId::from(id)).cloned()
    }

    /// Snapshot of all live controllers, ordered by id.
    pub fn all(&self) -> Vec<Controller> {
        let mut all: Vec<Controller> = self.controllers.lock().values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Number of live controllers.
    pub fn len(&self) -> usize {
        self.controllers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unregister `controller` and discard its repositories.
    ///
    /// Returns `false` if it was not registered here (for example, already
    /// closed); the controller is left untouched in that case.
    pub fn close(&self, controller: &Controller) -> bool {
        let removed = self.controllers.lock().remove(controller.id());
        match removed {
            Some(controller) => {
                controller.release();
                info!(controller = %controller.id(), "closed controller");
                true
            }
            None => false,
        }
    }
}

/// Create a controller in the process-wide registry.
pub fn create() -> Controller {
    Registry::global().create()
}

/// Find a controller in the process-wide registry.
pub fn lookup(id: &str) -> Option<Controller> {
    Registry::global().lookup(id)
}

/// Snapshot of the process-wide registry.
pub fn all() -> Vec<Controller> {
    Registry::global().all()
}

/// Close a controller in the process-wide registry.
pub fn close(controller: &Controller) -> bool {
    Registry::global().close(controller)
}

/// A registered controller that closes itself when dropped.
#[derive(Debug)]
pub struct ScopedController<'a> {
    registry: &'a Registry,
    controller: Controller,
}

impl ScopedController<'_> {
    /// A clone of the underlying handle.
    ///
    /// The clone stops being usable once this guard drops.
    pub fn controller(&self) -> Controller {
        self.controller.clone()
    }
}

impl Deref for ScopedController<'_> {
    type Target = Controller;

    fn deref(&self) -> &Controller {
        &self.controller
    }
}

impl Drop for ScopedController<'_> {
    fn drop(&mut self) {
        self.registry.close(&self.controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_registers() {
        let registry = Registry::new();
        let scm = registry.create();
        let found = registry.lookup(scm.id().as_str()).unwrap();
        assert_eq!(found.id(), scm.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_unknown_is_none() {
        let registry = Registry::new();
        assert!(registry.lookup("mockscm-missing").is_none());
    }

    #[test]
    fn lookup_shares_state_with_creator() {
        let registry = Registry::new();
        let scm = registry.create();
        scm.create_repository("foo").unwrap();
        let revived = registry.lookup(scm.id().as_str()).unwrap();
        assert_eq!(revived.list_repositories(), vec!["foo"]);
    }

    #[test]
    fn close_removes_and_discards() {
        let registry = Registry::new();
        let scm = registry.create();
        scm.create_repository("foo").unwrap();

        assert!(registry.close(&scm));
        assert!(registry.lookup(scm.id().as_str()).is_none());
        assert!(scm.list_repositories().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn close_twice_is_harmless() {
        let registry = Registry::new();
        let scm = registry.create();
        assert!(registry.close(&scm));
        assert!(!registry.close(&scm));
    }

    #[test]
    fn new_ids_after_close() {
        let registry = Registry::new();
        let first = registry.create();
        let first_id = first.id().clone();
        registry.close(&first);
        let second = registry.create();
        assert_ne!(second.id(), &first_id);
    }

    #[test]
    fn all_is_sorted_snapshot() {
        let registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let ids: Vec<_> = registry.all().iter().map(|c| c.id().clone()).collect();
        let mut expected = vec![a.id().clone(), b.id().clone()];
        expected.sort();
        assert_eq!(ids, expected);

        registry.close(&a);
        assert_eq!(registry.all().len(), 1);
    }

    #[test]
    fn scoped_closes_on_drop() {
        let registry = Registry::new();
        let id = {
            let scm = registry.scoped();
            scm.create_repository("foo").unwrap();
            scm.id().clone()
        };
        assert!(registry.lookup(id.as_str()).is_none());
    }

    #[test]
    fn scoped_closes_on_panic() {
        let registry = Registry::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scm = registry.scoped();
            panic!("test body failed");
        }));
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn global_functions_use_one_registry() {
        let scm = create();
        assert!(lookup(scm.id().as_str()).is_some());
        assert!(all().iter().any(|c| c.id() == scm.id()));
        assert!(close(&scm));
        assert!(lookup(scm.id().as_str()).is_none());
    }
}
