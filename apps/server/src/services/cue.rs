//! Cue backend that hands playback to the front-end.
//!
//! The server cannot drive the device speaker, so "playing" a cue means
//! publishing it as the now-playing clip. The front-end polls `GET /api/cue`
//! and plays whatever is published there; an empty slot means silence.

use std::path::{Component, Path, PathBuf};

use cardmatch_core::{CueBackend, CueController, CueError, CueRef};
use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::NowPlaying;

/// Route prefix under which the asset directory is served.
pub const ASSETS_ROUTE: &str = "/assets";

pub type ShellCueController = CueController<ClientCueBackend>;

/// Clip handed to the front-end.
#[derive(Debug)]
pub struct ClientCue {
    id: Uuid,
    cue: CueRef,
    url: String,
}

pub struct ClientCueBackend {
    asset_dir: PathBuf,
    now_playing: watch::Sender<Option<NowPlaying>>,
}

impl ClientCueBackend {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        let (now_playing, _) = watch::channel(None);
        Self {
            asset_dir: asset_dir.into(),
            now_playing,
        }
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.now_playing.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NowPlaying>> {
        self.now_playing.subscribe()
    }

    fn resolve(&self, cue: &CueRef) -> Result<PathBuf, CueError> {
        let relative = Path::new(cue.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CueError::Load {
                cue: cue.to_string(),
                reason: "path leaves the asset directory".to_string(),
            });
        }
        Ok(self.asset_dir.join(relative))
    }
}

impl CueBackend for ClientCueBackend {
    type Handle = ClientCue;

    async fn load(&self, cue: &CueRef) -> Result<ClientCue, CueError> {
        let path = self.resolve(cue)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| CueError::NotFound(cue.to_string()))?;
        if !metadata.is_file() {
            return Err(CueError::NotFound(cue.to_string()));
        }

        Ok(ClientCue {
            id: Uuid::new_v4(),
            cue: cue.clone(),
            url: format!("{}/{}", ASSETS_ROUTE, cue.as_str()),
        })
    }

    async fn play(&self, handle: &mut ClientCue) -> Result<(), CueError> {
        self.now_playing.send_replace(Some(NowPlaying {
            id: handle.id,
            cue: handle.cue.clone(),
            url: handle.url.clone(),
            started_at: Utc::now(),
        }));
        Ok(())
    }

    async fn stop(&self, handle: &mut ClientCue) -> Result<(), CueError> {
        self.now_playing.send_if_modified(|current| {
            if current.as_ref().map(|np| np.id) == Some(handle.id) {
                *current = None;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    async fn unload(&self, handle: ClientCue) -> Result<(), CueError> {
        tracing::debug!(cue = %handle.cue, "released client cue");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardmatch_core::{CueOutcome, ScreenId};

    fn letter() -> ScreenId {
        ScreenId::new("letter")
    }

    fn asset_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sounds")).unwrap();
        std::fs::write(dir.path().join("sounds/la.mp3"), b"la").unwrap();
        std::fs::write(dir.path().join("sounds/bag.mp3"), b"bag").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_play_publishes_now_playing() {
        let dir = asset_dir();
        let controller = CueController::new(ClientCueBackend::new(dir.path()));

        let outcome = controller.play(&letter(), &CueRef::new("sounds/la.mp3")).await;
        assert_eq!(outcome, CueOutcome::Playing);

        let now_playing = controller.backend().now_playing().unwrap();
        assert_eq!(now_playing.cue, CueRef::new("sounds/la.mp3"));
        assert_eq!(now_playing.url, "/assets/sounds/la.mp3");
    }

    #[tokio::test]
    async fn test_next_cue_replaces_published_one() {
        let dir = asset_dir();
        let controller = CueController::new(ClientCueBackend::new(dir.path()));

        controller.play(&letter(), &CueRef::new("sounds/la.mp3")).await;
        let first = controller.backend().now_playing().unwrap();
        controller.play(&letter(), &CueRef::new("sounds/bag.mp3")).await;
        let second = controller.backend().now_playing().unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.cue, CueRef::new("sounds/bag.mp3"));
    }

    #[tokio::test]
    async fn test_missing_asset_degrades_to_silence() {
        let dir = asset_dir();
        let controller = CueController::new(ClientCueBackend::new(dir.path()));

        controller.play(&letter(), &CueRef::new("sounds/la.mp3")).await;
        let outcome = controller.play(&letter(), &CueRef::new("sounds/missing.mp3")).await;

        assert_eq!(outcome, CueOutcome::Failed);
        assert_eq!(controller.backend().now_playing(), None);
    }

    #[tokio::test]
    async fn test_path_outside_assets_rejected() {
        let dir = asset_dir();
        let controller = CueController::new(ClientCueBackend::new(dir.path()));

        let outcome = controller.play(&letter(), &CueRef::new("../secret.mp3")).await;
        assert_eq!(outcome, CueOutcome::Failed);
    }

    #[tokio::test]
    async fn test_release_clears_now_playing() {
        let dir = asset_dir();
        let controller = CueController::new(ClientCueBackend::new(dir.path()));
        let mut updates = controller.backend().subscribe();

        controller.play(&letter(), &CueRef::new("sounds/la.mp3")).await;
        controller.stop_and_release(&letter()).await;

        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), None);
    }
}
