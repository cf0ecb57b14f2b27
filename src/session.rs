//! TTY sessions and the session registry
//!
//! A session pairs one Term with one LineDiscipline. Sessions live in an
//! arena: a `SessionId` is a slot index plus the generation the slot had when
//! the session was created, so a handle kept past `destroy_session` simply
//! stops resolving.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use spin::Mutex;
use watos_ldisc::{LdiscConfig, LineDiscipline};
use watos_terminal::{GeometryError, SharedTerm, Term};

use crate::config::MAX_SESSIONS;

/// Stable handle to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId {
    index: u16,
    generation: u32,
}

impl SessionId {
    /// Slot number, stable for the session's lifetime (tty<index>)
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tty{}", self.index)
    }
}

/// One terminal session
pub struct TtySession {
    id: SessionId,
    term: SharedTerm,
    ldisc: LineDiscipline,
}

impl TtySession {
    pub(crate) fn new(id: SessionId, cols: usize, rows: usize) -> Result<Self, GeometryError> {
        let term = Term::new(cols, rows)?;
        Ok(TtySession {
            id,
            term: Arc::new(Mutex::new(term)),
            ldisc: LineDiscipline::new(LdiscConfig::default()),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The session's Term, for capture and direct mutation
    pub fn term(&self) -> &SharedTerm {
        &self.term
    }

    pub fn ldisc(&self) -> &LineDiscipline {
        &self.ldisc
    }

    /// (cols, rows) of the Term
    pub fn size(&self) -> (usize, usize) {
        let term = self.term.lock();
        (term.cols(), term.rows())
    }
}

enum Entry {
    Vacant,
    /// Handed out by `reserve`, session still being built
    Reserved,
    Occupied(Arc<TtySession>),
}

struct Slot {
    generation: u32,
    entry: Entry,
}

/// Arena of live sessions
pub struct SessionRegistry {
    slots: Vec<Slot>,
    live: usize,
}

impl SessionRegistry {
    pub const fn new() -> Self {
        SessionRegistry {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Claim a free slot; None when `MAX_SESSIONS` slots are in use
    pub fn reserve(&mut self) -> Option<SessionId> {
        let index = match self
            .slots
            .iter()
            .position(|slot| matches!(slot.entry, Entry::Vacant))
        {
            Some(index) => index,
            None if self.slots.len() < MAX_SESSIONS => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Entry::Vacant,
                });
                self.slots.len() - 1
            }
            None => return None,
        };
        let slot = &mut self.slots[index];
        slot.entry = Entry::Reserved;
        Some(SessionId {
            index: index as u16,
            generation: slot.generation,
        })
    }

    /// Give back a reservation that never became a session
    pub fn release(&mut self, id: SessionId) {
        if let Some(slot) = self.slot_mut(id) {
            if matches!(slot.entry, Entry::Reserved) {
                slot.entry = Entry::Vacant;
            }
        }
    }

    /// Fill the reserved slot named by the session's id
    pub fn insert(&mut self, session: Arc<TtySession>) -> bool {
        let Some(slot) = self.slot_mut(session.id()) else {
            return false;
        };
        if !matches!(slot.entry, Entry::Reserved) {
            return false;
        }
        slot.entry = Entry::Occupied(session);
        self.live += 1;
        true
    }

    /// Remove a live session, retiring its handle
    pub fn remove(&mut self, id: SessionId) -> Option<Arc<TtySession>> {
        let slot = self.slot_mut(id)?;
        match core::mem::replace(&mut slot.entry, Entry::Vacant) {
            Entry::Occupied(session) => {
                slot.generation = slot.generation.wrapping_add(1);
                self.live -= 1;
                Some(session)
            }
            other => {
                slot.entry = other;
                None
            }
        }
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<TtySession>> {
        let slot = self.slots.get(id.index())?;
        match &slot.entry {
            Entry::Occupied(session) if slot.generation == id.generation => Some(session.clone()),
            _ => None,
        }
    }

    /// Handles of all live sessions, in slot order
    pub fn ids(&self) -> Vec<SessionId> {
        self.slots
            .iter()
            .filter_map(|slot| match &slot.entry {
                Entry::Occupied(session) => Some(session.id()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot_mut(&mut self, id: SessionId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
