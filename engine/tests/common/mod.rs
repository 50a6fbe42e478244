//! Fakes shared by the engine integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use engine::model::{DecodedImage, ThemeDescriptor};
use engine::{Clock, ContentLocator, ContentSource, EngineSettings, FetchError, KeyValueStore, ThemeEngine};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ROOT: &str = "https://cdn.test/gamedata/";

/// Content source that serves one descriptor and echoes image URLs.
#[derive(Default)]
pub struct FakeCdn {
    descriptor: Mutex<ThemeDescriptor>,
    descriptor_calls: AtomicUsize,
    image_calls: AtomicUsize,
    offline: AtomicBool,
    failing_image: Mutex<Option<String>>,
    latency: Option<Duration>,
}

impl FakeCdn {
    pub fn serving(descriptor: ThemeDescriptor) -> Self {
        Self {
            descriptor: Mutex::new(descriptor),
            ..Default::default()
        }
    }

    /// Every request waits `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn serve(&self, descriptor: ThemeDescriptor) {
        *self.descriptor.lock().unwrap() = descriptor;
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Image requests whose URL ends with `suffix` answer 500.
    pub fn fail_images_ending_with(&self, suffix: Option<&str>) {
        *self.failing_image.lock().unwrap() = suffix.map(str::to_string);
    }

    pub fn descriptor_calls(&self) -> usize {
        self.descriptor_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ContentSource for FakeCdn {
    async fn fetch_descriptor(&self, url: &str) -> Result<ThemeDescriptor, FetchError> {
        self.descriptor_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::RequestFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.descriptor.lock().unwrap().clone())
    }

    async fn fetch_image(&self, url: &str) -> Result<DecodedImage, FetchError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        let failing = self.failing_image.lock().unwrap().clone();
        if self.offline.load(Ordering::SeqCst)
            || failing.is_some_and(|suffix| url.ends_with(&suffix))
        {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        Ok(DecodedImage::new(url, url.as_bytes().to_vec()))
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub fn settings() -> EngineSettings {
    EngineSettings {
        locator: ContentLocator::new(ROOT),
        ..EngineSettings::default()
    }
}

pub fn theme_engine(
    cdn: Arc<FakeCdn>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<ManualClock>,
) -> ThemeEngine {
    ThemeEngine::new(cdn, store, settings()).with_clock(clock)
}

/// A small theme exercising every record kind.
pub fn descriptor() -> ThemeDescriptor {
    serde_json::from_value(json!({
        "textures": [
            { "id": "t1", "path": "gui/theme/images/foo.tga" },
            { "id": "t2", "path": "gui/theme/images/bar.tga" }
        ],
        "pixmaps": [
            { "id": "p1", "texture": "t1", "x": 0, "y": 0, "width": 16, "height": 16 },
            { "id": "p2", "texture": "t2", "x": 16, "y": 0, "width": 8, "height": 8 }
        ],
        "colors": [
            { "id": "c1", "red": 10, "green": 20, "blue": 30 },
            { "id": "c2", "colorUsed": "c1", "alpha": 50 },
            { "id": "c3", "colorUsed": "c2" },
            { "id": "c4", "red": 255, "green": 255, "blue": 255, "alpha": 40, "comment": "overlay" }
        ],
        "themeElement": [
            {
                "id": "e1",
                "type": "window",
                "specificPixmaps": [{ "id": "p1", "texture": "t1" }],
                "childrenThemeElements": [
                    { "id": "e1.title", "specificPixmaps": [{ "id": "p2", "texture": "t2" }] },
                    { "id": "e1.body", "specificPixmaps": [{ "id": "p3", "texture": "t9" }] }
                ]
            },
            { "id": "e2" }
        ],
        "appSkinParts": [
            { "path": "theme/appSkin/close_button.png" },
            { "path": "theme/appSkin/frame.png", "scale": 2 }
        ]
    }))
    .unwrap()
}
