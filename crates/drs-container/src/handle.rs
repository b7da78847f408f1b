//! Editing handle over a container.
//!
//! [`ContainerHandle`] is what an editor holds on to between loads and
//! saves. It pairs a container with the registry its payloads are sized and
//! encoded through, and tracks whether recorded offsets are out of date.

use std::fs;
use std::path::Path;

use drs_payload::{NodeKind, Payload, PayloadRegistry};

use crate::arena::PayloadId;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::ModelType;

#[derive(Debug, Clone)]
pub struct ContainerHandle {
    container: Container,
    registry: PayloadRegistry,
}

impl ContainerHandle {
    /// Wrap a container, using the standard registry.
    pub fn new(container: Container) -> Self {
        Self::with_registry(container, PayloadRegistry::standard())
    }

    pub fn with_registry(container: Container, registry: PayloadRegistry) -> Self {
        Self { container, registry }
    }

    /// Decode a DRS file from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_registry(data, PayloadRegistry::standard())
    }

    pub fn from_bytes_with_registry(data: &[u8], registry: PayloadRegistry) -> Result<Self> {
        let container = Container::decode(data, &registry)?;
        Ok(Self { container, registry })
    }

    /// Read and decode a DRS file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        log::debug!("opened {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data)
    }

    /// Author an empty container of `model_type`.
    pub fn for_model_type(model_type: ModelType) -> Result<Self> {
        let registry = PayloadRegistry::standard();
        let container = Container::for_model_type(model_type, &registry)?;
        Ok(Self { container, registry })
    }

    /// Replace the container with a freshly decoded one. On error the
    /// current container is kept.
    pub fn reload(&mut self, data: &[u8]) -> Result<()> {
        self.container = Container::decode(data, &self.registry)?;
        Ok(())
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn into_container(self) -> Container {
        self.container
    }

    pub fn registry(&self) -> &PayloadRegistry {
        &self.registry
    }

    /// Payload of a named node.
    pub fn get_payload(&self, node_name: &str) -> Option<&Payload> {
        self.container.payload_by_name(node_name).map(|(_, payload)| payload)
    }

    /// Handle of a named node's payload.
    pub fn payload_id(&self, node_name: &str) -> Option<PayloadId> {
        self.container.record(node_name).map(|r| r.payload())
    }

    pub fn payload(&self, id: PayloadId) -> Option<&Payload> {
        self.container.payload(id)
    }

    /// Mutable access to a payload. Call
    /// [`notify_payload_changed`](Self::notify_payload_changed) afterwards if
    /// its size may have changed, or use [`edit_payload`](Self::edit_payload).
    pub fn payload_mut(&mut self, id: PayloadId) -> Option<&mut Payload> {
        self.container.payload_mut(id)
    }

    /// Edit a payload in place and refresh its recorded size.
    pub fn edit_payload<R>(&mut self, id: PayloadId, edit: impl FnOnce(&mut Payload) -> R) -> Result<R> {
        if self.container.record_index_for_payload(id).is_none() {
            return Err(Error::UnknownPayload(id));
        }
        let payload = self.container.payload_mut(id).ok_or(Error::UnknownPayload(id))?;
        let result = edit(payload);
        self.notify_payload_changed(id)?;
        Ok(result)
    }

    /// Swap in a new payload; the handle keeps referring to the node.
    pub fn replace_payload(&mut self, id: PayloadId, payload: Payload) -> Result<Payload> {
        let old = self.container.replace_payload(id, payload)?;
        self.notify_payload_changed(id)?;
        Ok(old)
    }

    /// Refresh the recorded size of the node owning `id` and mark offsets
    /// stale. Returns the new size.
    pub fn notify_payload_changed(&mut self, id: PayloadId) -> Result<u32> {
        let size = self.container.refresh_node_size(id, &self.registry)?;
        log::debug!("{id} changed, now {size} bytes");
        Ok(size)
    }

    /// Names of the payload-bearing nodes, in record order.
    pub fn list_payload_node_names(&self) -> Vec<&'static str> {
        self.container.node_names()
    }

    /// Re-run classification over the current node set.
    pub fn classify_model_type(&mut self) -> Result<ModelType> {
        self.container.reclassify().require()
    }

    pub fn insert_node(&mut self, kind: NodeKind, payload: Payload) -> Result<PayloadId> {
        self.container.insert_node(kind, payload, &self.registry)
    }

    pub fn remove_node(&mut self, node_name: &str) -> Result<Payload> {
        self.container.remove_node(node_name)
    }

    /// Recompute sizes and offsets without encoding.
    pub fn recompute(&mut self) -> Result<Layout> {
        self.container.recompute(&self.registry)
    }

    /// Whether recorded sizes or offsets are out of date.
    pub fn is_stale(&self) -> bool {
        self.container.is_layout_stale()
    }

    /// Recompute the layout and encode.
    pub fn save(&mut self) -> Result<Vec<u8>> {
        self.container.encode(&self.registry)
    }

    /// Encode a copy of the container, decode the bytes again and compare
    /// the result against the container as it stood before encoding.
    ///
    /// Returns the encoded bytes and the differences found; the handle is
    /// left untouched.
    pub fn verify_round_trip(&self) -> Result<(Vec<u8>, Vec<String>)> {
        let before = self.container.summary(&self.registry)?;
        let bytes = self.container.clone().encode(&self.registry)?;
        let after = Container::decode(&bytes, &self.registry)?.summary(&self.registry)?;
        Ok((bytes, before.differences(&after)))
    }

    /// Encode fully in memory, then write `path` in one call. Nothing is
    /// written if encoding fails.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.save()?;
        fs::write(path, &bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}
