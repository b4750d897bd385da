use std::sync::Arc;

use thiserror::Error;

use super::EditorCanvas;
use crate::config::AppConfig;
use crate::geometry::Size;
use crate::scene::{decode_image, ImagePixels, LoadError, LoadResult, ObjectId};
use crate::search::{ImageFetcher, ImageRecord};
use crate::viewport::ResizeManager;
use crate::worker::{spawn_worker, WorkerTask};

const DEFAULT_ALT_TEXT: &str = "Unsplash image";
const DEFAULT_AUTHOR: &str = "Unknown";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No image selected or image data is invalid. Please go back and select an image.")]
    InvalidSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub title: String,
    pub credit: String,
}

/// What changed during one [`EditorSession::poll`].
#[derive(Debug, Default)]
pub struct PollOutcome {
    pub background: Option<ObjectId>,
    pub load_error: Option<LoadError>,
    pub resized: Option<Size>,
    pub stale_discarded: usize,
}

struct PendingLoad {
    generation: u64,
    url: String,
    task: WorkerTask<LoadResult<ImagePixels>>,
}

/// One editing session over a selected stock image.
pub struct EditorSession {
    record: ImageRecord,
    canvas: EditorCanvas,
    viewport: ResizeManager,
    fetcher: Arc<dyn ImageFetcher + Send + Sync>,
    generation: u64,
    pending: Vec<PendingLoad>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("record", &self.record.id)
            .field("canvas", &self.canvas)
            .field("generation", &self.generation)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn validate_record(record: &ImageRecord) -> Result<&str, ValidationError> {
    record.regular_url().ok_or_else(|| {
        tracing::warn!(id = %record.id, "selected image has no usable urls");
        ValidationError::InvalidSelection
    })
}

impl EditorSession {
    /// Validates the record before any canvas exists, then mounts the viewport and starts
    /// loading the background.
    pub fn open(
        record: ImageRecord,
        config: &AppConfig,
        mut viewport: ResizeManager,
        fetcher: Arc<dyn ImageFetcher + Send + Sync>,
    ) -> Result<Self, ValidationError> {
        validate_record(&record)?;
        viewport.mount();
        let canvas = EditorCanvas::new(viewport.surface_size(), config.fit_margin());
        let mut session = Self {
            record,
            canvas,
            viewport,
            fetcher,
            generation: 0,
            pending: Vec::new(),
        };
        session.start_load();
        Ok(session)
    }

    /// Switches to another image: the scene is cleared and earlier loads become stale.
    pub fn select_image(&mut self, record: ImageRecord) -> Result<(), ValidationError> {
        validate_record(&record)?;
        self.record = record;
        self.canvas.clear();
        self.generation = self.generation.saturating_add(1);
        self.start_load();
        Ok(())
    }

    pub fn record(&self) -> &ImageRecord {
        &self.record
    }

    pub fn canvas(&self) -> &EditorCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut EditorCanvas {
        &mut self.canvas
    }

    pub fn viewport(&self) -> &ResizeManager {
        &self.viewport
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn caption(&self) -> Caption {
        let title = self
            .record
            .alt_description
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or(DEFAULT_ALT_TEXT);
        let author = self
            .record
            .author_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_AUTHOR);
        Caption {
            title: format!("Currently editing: {title}"),
            credit: format!("Photo by {author} on Unsplash"),
        }
    }

    /// Applies finished loads for the current selection and runs due layout passes.
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome::default();

        if let Some(size) = self.viewport.tick() {
            self.canvas.set_surface_size(size);
            outcome.resized = Some(size);
        }

        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut load in std::mem::take(&mut self.pending) {
            let Some(result) = load.task.try_take() else {
                if !load.task.is_finished() {
                    still_pending.push(load);
                }
                continue;
            };
            if load.generation != self.generation {
                tracing::debug!(
                    url = %load.url,
                    generation = load.generation,
                    current = self.generation,
                    "discarding stale background load"
                );
                outcome.stale_discarded += 1;
                continue;
            }
            match result.and_then(|pixels| self.canvas.set_background(load.url.clone(), pixels)) {
                Ok(id) => outcome.background = Some(id),
                Err(err) => {
                    tracing::warn!(
                        url = %load.url,
                        error = %err,
                        "background image failed to load"
                    );
                    outcome.load_error = Some(err);
                }
            }
        }
        self.pending = still_pending;
        outcome
    }

    fn start_load(&mut self) {
        let Some(url) = self.record.regular_url().map(str::to_string) else {
            return;
        };
        let fetcher = Arc::clone(&self.fetcher);
        let worker_url = url.clone();
        tracing::info!(%url, generation = self.generation, "loading background image");
        let task = spawn_worker(move || {
            let bytes = fetcher.fetch(&worker_url)?;
            decode_image(&worker_url, &bytes)
        });
        self.pending.push(PendingLoad {
            generation: self.generation,
            url,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    use crate::scene::encoded_png;
    use crate::search::{sample_images, ImageAuthor, ImageUrls};
    use crate::viewport::{ContainerSize, ManualClock, ResizeEvent};

    struct FixedContainer(Size);

    impl ContainerSize for FixedContainer {
        fn container_size(&self) -> Size {
            self.0
        }

        fn window_size(&self) -> Size {
            Size::new(1440, 900)
        }
    }

    /// Serves fixed bytes per URL; URLs registered as gated block until released.
    #[derive(Default)]
    struct StubFetcher {
        bodies: HashMap<String, Vec<u8>>,
        gates: Mutex<HashMap<String, mpsc::Receiver<()>>>,
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> LoadResult<Vec<u8>> {
            let gate = self.gates.lock().ok().and_then(|mut gates| gates.remove(url));
            if let Some(gate) = gate {
                let _ = gate.recv_timeout(Duration::from_secs(5));
            }
            self.bodies.get(url).cloned().ok_or_else(|| LoadError::Fetch {
                url: url.to_string(),
                message: "404".to_string(),
            })
        }
    }

    fn record(id: &str, url: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            urls: Some(ImageUrls {
                regular: url.to_string(),
                small: url.to_string(),
            }),
            alt_description: None,
            user: None,
        }
    }

    fn viewport(clock: Rc<ManualClock>) -> ResizeManager {
        let (_tx, rx) = mpsc::channel::<ResizeEvent>();
        ResizeManager::new(
            Box::new(FixedContainer(Size::new(1000, 700))),
            Box::new(rx),
            clock,
            &AppConfig::default(),
        )
    }

    fn drain(session: &mut EditorSession) -> Vec<PollOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.push(session.poll());
            if !session.is_loading() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn record_without_urls_is_refused_before_canvas_exists() {
        let clock = Rc::new(ManualClock::new(0));
        let mut record = record("x", "https://img/x");
        record.urls = None;
        let err = EditorSession::open(
            record,
            &AppConfig::default(),
            viewport(clock),
            Arc::new(StubFetcher::default()),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSelection);
        assert_eq!(
            err.to_string(),
            "No image selected or image data is invalid. Please go back and select an image."
        );
    }

    #[test]
    fn loaded_background_lands_at_index_zero() {
        let clock = Rc::new(ManualClock::new(0));
        let mut fetcher = StubFetcher::default();
        fetcher
            .bodies
            .insert("https://img/a".to_string(), encoded_png(40, 20, [9, 9, 9, 255]));
        let mut session = EditorSession::open(
            record("a", "https://img/a"),
            &AppConfig::default(),
            viewport(clock),
            Arc::new(fetcher),
        )
        .unwrap();
        session.canvas_mut().add_shape("rectangle");

        let loaded: Vec<_> = drain(&mut session)
            .into_iter()
            .filter_map(|outcome| outcome.background)
            .collect();
        assert_eq!(loaded.len(), 1);
        assert_eq!(session.canvas().stack().ids()[0], loaded[0]);
        assert_eq!(session.canvas().layers().ids()[0], loaded[0]);
    }

    #[test]
    fn stale_load_resolving_after_newer_selection_is_ignored() {
        let clock = Rc::new(ManualClock::new(0));
        let (release, gate) = mpsc::channel();
        let mut fetcher = StubFetcher::default();
        fetcher
            .bodies
            .insert("https://img/slow".to_string(), encoded_png(10, 10, [255, 0, 0, 255]));
        fetcher
            .bodies
            .insert("https://img/fast".to_string(), encoded_png(20, 10, [0, 0, 255, 255]));
        fetcher
            .gates
            .lock()
            .unwrap()
            .insert("https://img/slow".to_string(), gate);

        let mut session = EditorSession::open(
            record("slow", "https://img/slow"),
            &AppConfig::default(),
            viewport(clock),
            Arc::new(fetcher),
        )
        .unwrap();
        session.select_image(record("fast", "https://img/fast")).unwrap();

        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.push(session.poll());
            if !session.canvas().stack().is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        release.send(()).unwrap();
        outcomes.extend(drain(&mut session));

        let stale: usize = outcomes.iter().map(|outcome| outcome.stale_discarded).sum();
        assert_eq!(stale, 1);
        assert_eq!(session.canvas().stack().len(), 1);
        let background = session.canvas().stack().background().unwrap();
        assert_eq!(
            background.as_image().map(|image| image.source_url.as_str()),
            Some("https://img/fast")
        );
    }

    #[test]
    fn failed_fetch_leaves_canvas_without_background() {
        let clock = Rc::new(ManualClock::new(0));
        let mut session = EditorSession::open(
            record("missing", "https://img/missing"),
            &AppConfig::default(),
            viewport(clock),
            Arc::new(StubFetcher::default()),
        )
        .unwrap();
        let errors: Vec<_> = drain(&mut session)
            .into_iter()
            .filter_map(|outcome| outcome.load_error)
            .collect();
        assert!(matches!(errors.as_slice(), [LoadError::Fetch { .. }]));
        assert!(session.canvas().stack().background().is_none());
    }

    #[test]
    fn initial_layout_resizes_surface_after_delay() {
        let clock = Rc::new(ManualClock::new(0));
        let mut session = EditorSession::open(
            sample_images().remove(0),
            &AppConfig::default(),
            viewport(Rc::clone(&clock)),
            Arc::new(StubFetcher::default()),
        )
        .unwrap();
        assert!(session.poll().resized.is_none());
        clock.advance(Duration::from_millis(300));
        assert_eq!(session.poll().resized, Some(Size::new(760, 680)));
        assert_eq!(session.canvas().surface_size(), Size::new(760, 680));
    }

    #[test]
    fn caption_falls_back_for_missing_fields() {
        let clock = Rc::new(ManualClock::new(0));
        let mut session = EditorSession::open(
            record("a", "https://img/a"),
            &AppConfig::default(),
            viewport(Rc::clone(&clock)),
            Arc::new(StubFetcher::default()),
        )
        .unwrap();
        assert_eq!(
            session.caption(),
            Caption {
                title: "Currently editing: Unsplash image".to_string(),
                credit: "Photo by Unknown on Unsplash".to_string(),
            }
        );

        let mut named = record("b", "https://img/b");
        named.alt_description = Some("a quiet lake".to_string());
        named.user = Some(ImageAuthor {
            name: Some("Ana".to_string()),
        });
        session.select_image(named).unwrap();
        assert_eq!(session.caption().title, "Currently editing: a quiet lake");
        assert_eq!(session.caption().credit, "Photo by Ana on Unsplash");
    }
}
