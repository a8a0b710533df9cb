//! In-memory store of open request-editor tabs.
//!
//! The store is the single source of truth for open tabs, their order and
//! the active pointer. Every operation is a synchronous state transition that
//! cannot fail; ids that are not open are ignored so that callbacks resolving
//! after a tab was closed cannot corrupt the store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::debug;

use pulse_domain::{Tab, TabId, TabUpdate};

/// A store shared between the workbench components.
pub type SharedTabStore = Arc<RwLock<TabStore>>;

/// Identifies one activation of a tab.
///
/// The generation increases on every change of the active pointer, so a
/// ticket taken before an `A -> B -> A` sequence is stale even though `A` is
/// active again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTicket {
    /// The activated tab.
    pub id: TabId,
    /// Activation counter at the time the ticket was issued.
    pub generation: u64,
}

/// Holds all open tabs, the active pointer and each tab's last run.
#[derive(Debug)]
pub struct TabStore {
    order: Vec<TabId>,
    tabs: HashMap<TabId, Tab>,
    active: Option<TabId>,
    generation: u64,
    next_synthetic: u64,
    active_tx: watch::Sender<Option<ActiveTicket>>,
}

impl TabStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (active_tx, _) = watch::channel(None);
        Self {
            order: Vec::new(),
            tabs: HashMap::new(),
            active: None,
            generation: 0,
            next_synthetic: 1,
            active_tx,
        }
    }

    /// Creates an empty store ready to be shared.
    #[must_use]
    pub fn shared() -> SharedTabStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Opens a tab and makes it active.
    ///
    /// Opening an id that is already open updates its data in place without
    /// duplicating it in the tab order, and keeps its run history.
    pub fn open_tab(&mut self, mut tab: Tab) {
        let id = tab.id.clone();
        if let Some(existing) = self.tabs.get_mut(&id) {
            if tab.last_run.is_none() {
                tab.last_run = existing.last_run.take();
            }
            tab.execution = std::mem::take(&mut existing.execution);
        } else {
            self.order.push(id.clone());
        }
        self.tabs.insert(id.clone(), tab);
        debug!(tab = %id, open = self.order.len(), "opened tab");
        self.activate(id);
    }

    /// Opens a blank unsaved tab with a fresh placeholder id.
    pub fn open_new_tab(&mut self) -> TabId {
        let id = loop {
            let candidate = TabId::synthetic(self.next_synthetic);
            self.next_synthetic += 1;
            if !self.tabs.contains_key(&candidate) {
                break candidate;
            }
        };
        self.open_tab(Tab::unsaved(id.clone()));
        id
    }

    /// Points the active pointer at an open tab.
    ///
    /// Returns false, leaving the store unchanged, if the id is not open.
    pub fn set_active_tab(&mut self, id: &TabId) -> bool {
        if !self.tabs.contains_key(id) {
            debug!(tab = %id, "ignoring activation of a tab that is not open");
            return false;
        }
        self.activate(id.clone());
        true
    }

    /// Closes a tab.
    ///
    /// If it was active, the tab that followed it becomes active, or the one
    /// before it if it was last; closing the only tab clears the pointer.
    pub fn close_tab(&mut self, id: &TabId) -> bool {
        let Some(position) = self.order.iter().position(|open| open == id) else {
            return false;
        };
        self.order.remove(position);
        self.tabs.remove(id);

        if self.active.as_ref() == Some(id) {
            let next = self
                .order
                .get(position)
                .or_else(|| self.order.last())
                .cloned();
            match next {
                Some(next) => self.activate(next),
                None => self.deactivate(),
            }
        }
        debug!(tab = %id, open = self.order.len(), "closed tab");
        true
    }

    /// Applies a typed update to an open tab.
    ///
    /// Returns false, leaving the store unchanged, if the id is not open.
    pub fn update_tab(&mut self, id: &TabId, update: TabUpdate) -> bool {
        match self.tabs.get_mut(id) {
            Some(tab) => {
                tab.apply(update);
                true
            }
            None => {
                debug!(tab = %id, "dropping update for a tab that is not open");
                false
            }
        }
    }

    /// Returns the active tab id.
    #[must_use]
    pub const fn active_id(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.as_ref().and_then(|id| self.tabs.get(id))
    }

    /// Returns an open tab by id.
    #[must_use]
    pub fn tab(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    /// Returns true if the id is open.
    #[must_use]
    pub fn contains(&self, id: &TabId) -> bool {
        self.tabs.contains_key(id)
    }

    /// Returns the open ids in display order.
    #[must_use]
    pub fn open_ids(&self) -> &[TabId] {
        &self.order
    }

    /// Returns the open tabs in display order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.order.iter().filter_map(|id| self.tabs.get(id))
    }

    /// Returns the number of open tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no tab is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns a ticket for the current activation.
    #[must_use]
    pub fn active_ticket(&self) -> Option<ActiveTicket> {
        self.active.clone().map(|id| ActiveTicket {
            id,
            generation: self.generation,
        })
    }

    /// Returns true if the ticket still describes the current activation.
    #[must_use]
    pub fn is_current(&self, ticket: &ActiveTicket) -> bool {
        self.generation == ticket.generation && self.active.as_ref() == Some(&ticket.id)
    }

    /// Subscribes to changes of the active pointer.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveTicket>> {
        self.active_tx.subscribe()
    }

    fn activate(&mut self, id: TabId) {
        if self.active.as_ref() == Some(&id) {
            return;
        }
        self.generation += 1;
        self.active = Some(id);
        self.publish();
    }

    fn deactivate(&mut self) {
        self.generation += 1;
        self.active = None;
        self.publish();
    }

    fn publish(&self) {
        self.active_tx.send_replace(self.active_ticket());
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}
