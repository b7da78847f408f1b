//! Payload storage with stable handles.
//!
//! Index records refer to payloads by [`PayloadId`]. Replacing a payload
//! keeps its handle; removing a node frees the slot without reusing the id,
//! so a stale handle can only ever miss, never alias another payload.

use std::fmt;

use drs_payload::Payload;

/// Stable handle to a payload owned by a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayloadId(u32);

impl PayloadId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Slot index of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload #{}", self.0)
    }
}

/// Arena owning every payload of a container.
#[derive(Debug, Clone, Default)]
pub struct PayloadArena {
    slots: Vec<Option<Payload>>,
}

impl PayloadArena {
    /// Take ownership of a payload and return its handle.
    pub fn insert(&mut self, payload: Payload) -> PayloadId {
        let id = PayloadId::from_index(self.slots.len());
        self.slots.push(Some(payload));
        id
    }

    /// Borrow a payload.
    pub fn get(&self, id: PayloadId) -> Option<&Payload> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutably borrow a payload.
    pub fn get_mut(&mut self, id: PayloadId) -> Option<&mut Payload> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Swap in a new payload under the same handle, returning the old one.
    pub fn replace(&mut self, id: PayloadId, payload: Payload) -> Option<Payload> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.is_none() {
            return None;
        }
        slot.replace(payload)
    }

    /// Free a slot. The handle stays dead afterwards.
    pub fn remove(&mut self, id: PayloadId) -> Option<Payload> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Number of live payloads.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no payload is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drs_payload::RawPayload;

    fn raw(bytes: &[u8]) -> Payload {
        Payload::Raw(RawPayload::new(bytes.to_vec()))
    }

    #[test]
    fn test_replace_keeps_handle() {
        let mut arena = PayloadArena::default();
        let id = arena.insert(raw(b"texture"));

        let old = arena.replace(id, raw(b"")).unwrap();
        assert_eq!(old, raw(b"texture"));
        assert_eq!(arena.get(id), Some(&raw(b"")));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut arena = PayloadArena::default();
        let first = arena.insert(raw(b"a"));
        assert!(arena.remove(first).is_some());

        let second = arena.insert(raw(b"b"));
        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
        assert!(arena.replace(first, raw(b"c")).is_none());
        assert_eq!(arena.len(), 1);
    }
}
