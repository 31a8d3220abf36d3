use std::sync::Arc;

use tracing::debug;

use artifex_store::{InMemoryKeyStore, KeyStore};
use artifex_types::{empty_document, ArtifactKind, ChainId, Document, ForkTime, Path, DEPLOY_MARKER};

use crate::error::RegistryResult;

/// Root segment for key-dump pass-through records. Key material is opaque
/// to the registry; generation and encryption live in the external
/// key-management collaborator.
const KEYS_ROOT: &str = "keys";

/// Root segment for client-test scratch records.
const TEST_ROOT: &str = "test";

/// Kind-specific addressing over a [`KeyStore`].
///
/// The registry holds a shared handle to the store and owns no other state.
/// Its lifecycle belongs to the hosting service: construct one explicitly
/// and pass it where it is needed.
#[derive(Clone)]
pub struct ArtifactRegistry {
    store: Arc<dyn KeyStore>,
}

impl ArtifactRegistry {
    /// Build a registry over an existing store handle.
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Build a registry over a fresh in-memory store. For tests and
    /// ephemeral embedding.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKeyStore::new()))
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    fn kind_path(kind: ArtifactKind, name: &str) -> RegistryResult<Path> {
        Ok(Path::new([kind.root()])?.child(name)?)
    }

    fn deploy_path(
        chain: &ChainId,
        deploy_name: &str,
        fork: Option<&ForkTime>,
    ) -> RegistryResult<Path> {
        let leaf = match fork {
            Some(fork) => fork.segment(),
            None => DEPLOY_MARKER.to_string(),
        };
        Ok(Path::new([ArtifactKind::Deploy.root()])?
            .child(chain.as_str())?
            .child(deploy_name)?
            .child(leaf)?)
    }

    // ---- Compiled contracts ----

    pub fn read_compile(&self, contract_name: &str) -> RegistryResult<Document> {
        let path = Self::kind_path(ArtifactKind::Compile, contract_name)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_compile(
        &self,
        contract_name: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::Compile, contract_name)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    /// All compiled contracts, keyed by contract name.
    pub fn read_all_compiles(&self) -> RegistryResult<Document> {
        Ok(self.store.subtree(&Path::new([ArtifactKind::Compile.root()])?)?)
    }

    // ---- Compiler outputs ----

    pub fn read_compile_output(&self, source_file: &str) -> RegistryResult<Document> {
        let path = Self::kind_path(ArtifactKind::CompileOutput, source_file)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_compile_output(
        &self,
        source_file: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::CompileOutput, source_file)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    // ---- Flattened sources ----

    pub fn read_flattened_source(&self, source_file: &str) -> RegistryResult<Document> {
        let path = Self::kind_path(ArtifactKind::FlattenedSource, source_file)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_flattened_source(
        &self,
        source_file: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::FlattenedSource, source_file)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    // ---- Links ----

    pub fn read_link(&self, link_name: &str) -> RegistryResult<Document> {
        let path = Self::kind_path(ArtifactKind::Link, link_name)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_link(
        &self,
        link_name: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::Link, link_name)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    /// All links, keyed by link name.
    pub fn read_all_links(&self) -> RegistryResult<Document> {
        Ok(self.store.subtree(&Path::new([ArtifactKind::Link.root()])?)?)
    }

    // ---- Deployments ----

    /// Every deployment on every chain, keyed by chain id, then deployment
    /// name, then `deploy`/fork-time leaf.
    pub fn read_all_deploys(&self) -> RegistryResult<Document> {
        Ok(self.store.subtree(&Path::new([ArtifactKind::Deploy.root()])?)?)
    }

    /// Every deployment on one chain, keyed by deployment name.
    pub fn read_deploys_for_chain(&self, chain: &ChainId) -> RegistryResult<Document> {
        let prefix = Path::new([ArtifactKind::Deploy.root()])?.child(chain.as_str())?;
        Ok(self.store.subtree(&prefix)?)
    }

    /// One deployment name's full record: the current deployment plus every
    /// historical fork.
    pub fn read_deploy_record(&self, chain: &ChainId, deploy_name: &str) -> RegistryResult<Document> {
        let prefix = Path::new([ArtifactKind::Deploy.root()])?
            .child(chain.as_str())?
            .child(deploy_name)?;
        Ok(self.store.subtree(&prefix)?)
    }

    /// Read one deployment: the current record when `fork` is `None`, a
    /// specific historical fork otherwise.
    pub fn read_deploy(
        &self,
        chain: &ChainId,
        deploy_name: &str,
        fork: Option<&ForkTime>,
    ) -> RegistryResult<Document> {
        let path = Self::deploy_path(chain, deploy_name, fork)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    /// Write one deployment record. Same-name redeployments go to a fork
    /// time; the current record is only replaced under explicit overwrite.
    pub fn write_deploy(
        &self,
        chain: &ChainId,
        deploy_name: &str,
        value: Document,
        overwrite: bool,
        fork: Option<&ForkTime>,
    ) -> RegistryResult<bool> {
        let path = Self::deploy_path(chain, deploy_name, fork)?;
        let stored = self.store.set(&path, value, overwrite)?;
        debug!(%chain, deploy_name, ?fork, stored, "deploy write");
        Ok(stored)
    }

    // ---- Key dumps (pass-through) ----

    pub fn read_key_dump(&self, chain: &ChainId, address: &str) -> RegistryResult<Document> {
        let path = Path::new([KEYS_ROOT])?.child(chain.as_str())?.child(address)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_key_dump(
        &self,
        chain: &ChainId,
        address: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Path::new([KEYS_ROOT])?.child(chain.as_str())?.child(address)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    // ---- Test scratch space ----

    pub fn read_test_space(&self, space: &str) -> RegistryResult<Document> {
        let path = Path::new([TEST_ROOT])?.child(space)?;
        Ok(self.store.get_or(&path, empty_document())?)
    }

    pub fn write_test_space(
        &self,
        space: &str,
        value: Document,
        overwrite: bool,
    ) -> RegistryResult<bool> {
        let path = Path::new([TEST_ROOT])?.child(space)?;
        Ok(self.store.set(&path, value, overwrite)?)
    }

    pub fn clear_test_space(&self, space: &str) -> RegistryResult<bool> {
        let path = Path::new([TEST_ROOT])?.child(space)?;
        Ok(self.store.clear(&path)?)
    }

    // ---- Reset tooling ----

    /// Remove one link record. Test/reset tooling only.
    pub fn clear_link(&self, link_name: &str) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::Link, link_name)?;
        Ok(self.store.clear(&path)?)
    }

    /// Remove one compiled contract record. Test/reset tooling only.
    pub fn clear_compile(&self, contract_name: &str) -> RegistryResult<bool> {
        let path = Self::kind_path(ArtifactKind::Compile, contract_name)?;
        Ok(self.store.clear(&path)?)
    }

    /// Remove one deployment record. Test/reset tooling only.
    pub fn clear_deploy(
        &self,
        chain: &ChainId,
        deploy_name: &str,
        fork: Option<&ForkTime>,
    ) -> RegistryResult<bool> {
        let path = Self::deploy_path(chain, deploy_name, fork)?;
        Ok(self.store.clear(&path)?)
    }
}

impl std::fmt::Debug for ArtifactRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactRegistry").finish_non_exhaustive()
    }
}
