use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::foundation::error::{PromoError, PromoResult};

/// A temporary resource held by the encoder for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Provider-unique id.
    pub id: u64,
    /// Scratch location backing the resource.
    pub path: PathBuf,
}

/// Provider of per-render encoder resources.
pub trait WorkerResources {
    /// Acquire a fresh resource. Failures are [`PromoError::ResourceAcquisition`].
    fn acquire(&self) -> PromoResult<ResourceHandle>;
    /// Give the resource back. Called exactly once per acquired handle.
    fn release(&self, handle: &ResourceHandle);
}

/// Scope guard that releases its handle when dropped, on every exit path.
pub struct ResourceGuard<'a> {
    provider: &'a dyn WorkerResources,
    handle: ResourceHandle,
}

impl<'a> ResourceGuard<'a> {
    /// Acquire a handle from `provider`.
    pub fn acquire(provider: &'a dyn WorkerResources) -> PromoResult<Self> {
        let handle = provider.acquire()?;
        tracing::debug!(id = handle.id, path = %handle.path.display(), "acquired worker resource");
        Ok(Self { provider, handle })
    }

    /// The guarded handle.
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Scratch path of the guarded handle.
    pub fn path(&self) -> &Path {
        &self.handle.path
    }
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        self.provider.release(&self.handle);
        tracing::debug!(id = self.handle.id, "released worker resource");
    }
}

/// Scratch ids are process-wide so separate providers never hand out the same file.
static NEXT_SCRATCH_ID: AtomicU64 = AtomicU64::new(0);

/// Attempts before giving up on finding an unused scratch name.
const SCRATCH_CREATE_ATTEMPTS: u32 = 16;

/// Default provider: fresh scratch files under a directory, deleted on release.
///
/// Files are created exclusively; an existing file is never reused or truncated.
#[derive(Debug)]
pub struct ScratchFiles {
    dir: PathBuf,
}

impl Default for ScratchFiles {
    fn default() -> Self {
        Self::in_dir(std::env::temp_dir())
    }
}

impl ScratchFiles {
    /// Scratch files under the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch files under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl WorkerResources for ScratchFiles {
    fn acquire(&self) -> PromoResult<ResourceHandle> {
        if !self.dir.is_dir() {
            return Err(PromoError::resource(format!(
                "scratch directory '{}' does not exist",
                self.dir.display()
            )));
        }

        for _ in 0..SCRATCH_CREATE_ATTEMPTS {
            let id = NEXT_SCRATCH_ID.fetch_add(1, Ordering::Relaxed);
            let path = self.dir.join(format!(
                "promogif-{}-{}-{id}.gif",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos())
                    .unwrap_or(0)
            ));
            match std::fs::File::create_new(&path) {
                Ok(_) => return Ok(ResourceHandle { id, path }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(PromoError::resource(format!(
                        "create scratch file '{}': {e}",
                        path.display()
                    )));
                }
            }
        }
        Err(PromoError::resource(format!(
            "no free scratch file name in '{}'",
            self.dir.display()
        )))
    }

    fn release(&self, handle: &ResourceHandle) {
        let _ = std::fs::remove_file(&handle.path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/resources.rs"]
mod tests;
