//! Shared, lock-protected container handles.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::handle::ContainerHandle;

/// A [`ContainerHandle`] shared across threads.
///
/// Every access goes through one exclusive lock per container, so edits and
/// saves from different threads never interleave.
#[derive(Debug, Clone)]
pub struct SharedContainer {
    inner: Arc<Mutex<ContainerHandle>>,
}

impl SharedContainer {
    pub fn new(handle: ContainerHandle) -> Self {
        Self {
            inner: Arc::new(Mutex::new(handle)),
        }
    }

    /// Lock the container for exclusive access.
    pub fn lock(&self) -> MutexGuard<'_, ContainerHandle> {
        self.inner.lock()
    }

    /// Encode under the lock.
    pub fn save(&self) -> Result<Vec<u8>> {
        self.inner.lock().save()
    }
}

impl From<ContainerHandle> for SharedContainer {
    fn from(handle: ContainerHandle) -> Self {
        Self::new(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelType;
    use drs_payload::{Payload, RawPayload};

    #[test]
    fn test_edits_from_threads_are_serialized() {
        let shared = SharedContainer::new(ContainerHandle::for_model_type(ModelType::StaticObjectNoCollision).unwrap());
        let mesh = shared.lock().payload_id("CGeoMesh").unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let mut handle = shared.lock();
                    handle
                        .edit_payload(mesh, |payload| {
                            if let Payload::Raw(raw) = payload {
                                raw.bytes_mut().extend_from_slice(&[0; 10]);
                            }
                        })
                        .unwrap();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(shared.lock().container().record("CGeoMesh").unwrap().node_size(), 40);
        let bytes = shared.save().unwrap();
        assert!(!shared.lock().is_stale());
        assert_eq!(
            shared.lock().get_payload("CGeoMesh"),
            Some(&Payload::Raw(RawPayload::new(vec![0; 40])))
        );
        assert!(!bytes.is_empty());
    }
}
