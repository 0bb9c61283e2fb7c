//! Audio cue controller.
//!
//! Owns at most one loaded clip, tagged with the screen that requested it.
//! Every transition runs under a FIFO lock, and a generation counter lets a
//! load that was overtaken by a newer request release itself instead of
//! becoming a second live handle.

use crate::error::CueError;
use crate::types::{CueRef, ScreenId};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Platform audio operations the controller drives.
pub trait CueBackend: Send + Sync + 'static {
    type Handle: Send;

    fn load(&self, cue: &CueRef) -> impl Future<Output = Result<Self::Handle, CueError>> + Send;

    fn play(&self, handle: &mut Self::Handle) -> impl Future<Output = Result<(), CueError>> + Send;

    fn stop(&self, handle: &mut Self::Handle) -> impl Future<Output = Result<(), CueError>> + Send;

    fn unload(&self, handle: Self::Handle) -> impl Future<Output = Result<(), CueError>> + Send;
}

/// What happened to a play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueOutcome {
    Playing,
    /// A newer request arrived before this one started playing.
    Superseded,
    /// The backend failed; the game continues without sound.
    Failed,
}

struct Loaded<H> {
    owner: ScreenId,
    cue: CueRef,
    handle: H,
}

/// Latest play request, used to cancel an owner's load still in flight.
struct Request {
    generation: u64,
    owner: ScreenId,
}

pub struct CueController<B: CueBackend> {
    backend: B,
    current: Mutex<Option<Loaded<B::Handle>>>,
    latest: Mutex<Option<Request>>,
    generation: AtomicU64,
}

impl<B: CueBackend> CueController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: Mutex::new(None),
            latest: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The cue currently owned by the controller, if any.
    pub async fn current_cue(&self) -> Option<CueRef> {
        self.current.lock().await.as_ref().map(|l| l.cue.clone())
    }

    /// Screen that requested the current cue.
    pub async fn current_owner(&self) -> Option<ScreenId> {
        self.current.lock().await.as_ref().map(|l| l.owner.clone())
    }

    /// Stop and release the current clip, then load and start `cue` on
    /// behalf of `owner`.
    ///
    /// Returns once playback has been started, not when it ends.
    pub async fn play(&self, owner: &ScreenId, cue: &CueRef) -> CueOutcome {
        let generation = {
            let mut latest = self.latest.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *latest = Some(Request {
                generation,
                owner: owner.clone(),
            });
            generation
        };
        let mut current = self.current.lock().await;

        if let Some(old) = current.take() {
            self.release(old).await;
        }
        if self.is_stale(generation) {
            return CueOutcome::Superseded;
        }

        let mut handle = match self.backend.load(cue).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(%owner, %cue, "failed to load cue: {}", e);
                return CueOutcome::Failed;
            }
        };

        if self.is_stale(generation) {
            tracing::debug!(%owner, %cue, "cue superseded while loading");
            if let Err(e) = self.backend.unload(handle).await {
                tracing::warn!(%cue, "failed to unload superseded cue: {}", e);
            }
            return CueOutcome::Superseded;
        }

        if let Err(e) = self.backend.play(&mut handle).await {
            tracing::warn!(%owner, %cue, "failed to start cue: {}", e);
            if let Err(e) = self.backend.unload(handle).await {
                tracing::warn!(%cue, "failed to unload cue: {}", e);
            }
            return CueOutcome::Failed;
        }

        tracing::debug!(%owner, %cue, "cue playing");
        *current = Some(Loaded {
            owner: owner.clone(),
            cue: cue.clone(),
            handle,
        });
        CueOutcome::Playing
    }

    /// Teardown for `owner`: release its clip, finished or not, and cancel
    /// its load if one is still in flight.
    ///
    /// A clip requested by another screen is left alone. Returns whether
    /// anything was released.
    pub async fn stop_and_release(&self, owner: &ScreenId) -> bool {
        {
            let mut latest = self.latest.lock().await;
            if latest.as_ref().is_some_and(|r| &r.owner == owner) {
                self.generation.fetch_add(1, Ordering::SeqCst);
                *latest = None;
            }
        }

        let mut current = self.current.lock().await;
        if !current.as_ref().is_some_and(|l| &l.owner == owner) {
            tracing::debug!(%owner, "no cue owned by screen");
            return false;
        }
        match current.take() {
            Some(old) => {
                self.release(old).await;
                true
            }
            None => false,
        }
    }

    async fn release(&self, loaded: Loaded<B::Handle>) {
        let Loaded { cue, mut handle, .. } = loaded;
        if let Err(e) = self.backend.stop(&mut handle).await {
            tracing::warn!(%cue, "failed to stop cue: {}", e);
        }
        if let Err(e) = self.backend.unload(handle).await {
            tracing::warn!(%cue, "failed to unload cue: {}", e);
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}
