use super::clock::{Clock, SystemClock};
use super::settings::EngineSettings;
use crate::cache::{CUSTOM_COLORS_KEY, CacheGateway, KeyValueStore, THEME_DATA_KEY};
use crate::color::{Channel, ColorResolver, CustomColor, OverrideOutcome, Rgba};
use crate::common::{ColorError, ThemeError};
use crate::content::ContentSource;
use crate::model::{ColorRecord, DecodedImage, FlatElement, Pixmap, SkinPart, ThemeDescriptor};
use crate::registry::{ElementRegistry, PixmapRegistry, SkinPartRegistry, TextureRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Where a successful [`ThemeEngine::load`] got its theme from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A theme was already resident; nothing was done.
    AlreadyLoaded,
    /// The descriptor came from a fresh cache entry.
    FromCache,
    /// The descriptor was fetched and the cache refreshed.
    FromNetwork,
}

/// Everything derived from one descriptor. Built completely before it is
/// installed, so readers never see a half-loaded theme.
#[derive(Debug)]
struct LoadedTheme {
    textures: TextureRegistry,
    pixmaps: PixmapRegistry,
    colors: ColorResolver,
    elements: ElementRegistry,
    skin_parts: SkinPartRegistry,
}

/// Loads the theme and answers queries about it.
///
/// One engine owns one theme. The descriptor comes from the cache while it
/// is fresh and from the [`ContentSource`] otherwise; textures are always
/// fetched. Custom colors are layered on top of the theme colors and written
/// through to the store, so they survive reloads and restarts.
///
/// # Concurrency
///
/// Loads are serialized: a caller that arrives while a load is running waits
/// for it and then decides again, so a non-forced second caller sees the
/// installed theme and does no I/O. Custom-color changes wait behind the
/// same gate, so a reload never installs a theme built from a stale layer.
/// Queries take a read lock and never wait on network or store traffic.
///
/// # Examples
///
/// ```no_run
/// use engine::{EngineSettings, FileStore, HttpContentSource, ThemeEngine};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ThemeEngine::new(
///     Arc::new(HttpContentSource::new()?),
///     Arc::new(FileStore::new("/tmp/wakfu-theme")),
///     EngineSettings::default(),
/// );
/// engine.load(false).await?;
/// let hex = engine.resolve_hex("c1", false).await?;
/// # Ok(())
/// # }
/// ```
pub struct ThemeEngine {
    source: Arc<dyn ContentSource>,
    cache: CacheGateway,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
    load_gate: Mutex<()>,
    theme: RwLock<Option<LoadedTheme>>,
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ThemeEngine {
    pub fn new(
        source: Arc<dyn ContentSource>,
        store: Arc<dyn KeyValueStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            cache: CacheGateway::new(store),
            clock: Arc::new(SystemClock),
            settings,
            load_gate: Mutex::new(()),
            theme: RwLock::new(None),
        }
    }

    /// Replaces the clock used for cache freshness.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Loads the theme unless one is resident and `force` is `false`.
    ///
    /// On failure nothing is installed and a previously loaded theme stays
    /// in place.
    pub async fn load(&self, force: bool) -> Result<LoadOutcome, ThemeError> {
        let _gate = self.load_gate.lock().await;

        if !force && self.theme.read().await.is_some() {
            log::debug!("Theme already loaded");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        if !force {
            if let Some(descriptor) = self.cached_descriptor().await {
                let theme = self.build(descriptor).await?;
                self.install(theme).await;
                log::info!("Theme loaded from cache");
                return Ok(LoadOutcome::FromCache);
            }
        }

        let url = self.settings.locator.descriptor_url();
        log::info!("Fetching theme descriptor from {url}");
        let descriptor = self.source.fetch_descriptor(&url).await.inspect_err(|e| {
            log::error!("Theme descriptor fetch failed: {e}");
        })?;
        self.refresh_cache(&descriptor).await;

        let theme = self.build(descriptor).await?;
        self.install(theme).await;
        log::info!("Theme loaded from network");
        Ok(LoadOutcome::FromNetwork)
    }

    async fn cached_descriptor(&self) -> Option<ThemeDescriptor> {
        let entry = self.cache.read(THEME_DATA_KEY).await?;
        if !entry.is_fresh(self.clock.now_millis(), self.settings.ttl) {
            log::debug!("Cached theme descriptor is stale");
            return None;
        }
        entry.parse()
    }

    async fn refresh_cache(&self, descriptor: &ThemeDescriptor) {
        let payload = match serde_json::to_string(descriptor) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Could not serialize theme descriptor for the cache: {e}");
                return;
            }
        };
        if let Err(e) = self
            .cache
            .write(THEME_DATA_KEY, &payload, self.clock.now_millis())
            .await
        {
            log::warn!("Could not cache theme descriptor: {e}");
        }
    }

    async fn build(&self, descriptor: ThemeDescriptor) -> Result<LoadedTheme, ThemeError> {
        let ThemeDescriptor {
            textures,
            pixmaps,
            colors,
            theme_elements,
            app_skin_parts,
        } = descriptor;
        let locator = &self.settings.locator;

        // Skin parts need no network, so a malformed skin path fails before
        // any texture request.
        let skin_parts = SkinPartRegistry::register_all(&app_skin_parts, locator)?;
        let textures = TextureRegistry::load_all(
            &textures,
            self.source.as_ref(),
            locator,
            self.settings.max_concurrent_fetches,
        )
        .await?;
        let pixmaps = PixmapRegistry::register_all(&pixmaps, &textures);
        let elements = ElementRegistry::register_all(&theme_elements, &textures);

        let mut colors = ColorResolver::from_colors(colors);
        let custom_colors: BTreeMap<String, CustomColor> = self
            .cache
            .read_payload(CUSTOM_COLORS_KEY)
            .await
            .unwrap_or_default();
        let applied = colors.apply_custom_colors(&custom_colors);

        log::debug!(
            "Built theme: {} textures, {} pixmaps, {} colors ({applied} customized), {} elements, {} skin parts",
            textures.len(),
            pixmaps.len(),
            colors.len(),
            elements.len(),
            skin_parts.len()
        );

        Ok(LoadedTheme {
            textures,
            pixmaps,
            colors,
            elements,
            skin_parts,
        })
    }

    async fn install(&self, theme: LoadedTheme) {
        *self.theme.write().await = Some(theme);
    }

    async fn with_theme<R>(&self, query: impl FnOnce(&LoadedTheme) -> R) -> Option<R> {
        self.theme.read().await.as_ref().map(query)
    }

    pub async fn is_loaded(&self) -> bool {
        self.theme.read().await.is_some()
    }

    pub async fn pixmap(&self, id: &str) -> Option<Pixmap> {
        self.with_theme(|theme| theme.pixmaps.get(id).cloned())
            .await
            .flatten()
    }

    pub async fn pixmaps(&self) -> Vec<Pixmap> {
        self.with_theme(|theme| theme.pixmaps.values().cloned().collect())
            .await
            .unwrap_or_default()
    }

    /// Looks a texture image up by texture id or file name.
    pub async fn texture(&self, key: &str) -> Option<DecodedImage> {
        self.with_theme(|theme| theme.textures.get(key).cloned())
            .await
            .flatten()
    }

    pub async fn theme_element(&self, id: &str) -> Option<FlatElement> {
        self.with_theme(|theme| theme.elements.get(id).cloned())
            .await
            .flatten()
    }

    pub async fn theme_elements(&self) -> Vec<FlatElement> {
        self.with_theme(|theme| theme.elements.values().cloned().collect())
            .await
            .unwrap_or_default()
    }

    pub async fn skin_part(&self, id: &str) -> Option<SkinPart> {
        self.with_theme(|theme| theme.skin_parts.get(id).cloned())
            .await
            .flatten()
    }

    pub async fn skin_parts(&self) -> Vec<SkinPart> {
        self.with_theme(|theme| theme.skin_parts.values().cloned().collect())
            .await
            .unwrap_or_default()
    }

    /// The color record for `id`, with its custom override unless
    /// `original_only`.
    pub async fn color(&self, id: &str, original_only: bool) -> Option<ColorRecord> {
        self.with_theme(|theme| theme.colors.get(id, original_only).cloned())
            .await
            .flatten()
    }

    /// All colors in declaration order.
    pub async fn colors(&self, original_only: bool) -> Vec<ColorRecord> {
        self.with_theme(|theme| {
            theme
                .colors
                .colors(original_only)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
        .unwrap_or_default()
    }

    pub async fn resolve_component(
        &self,
        id: &str,
        channel: Channel,
        original_only: bool,
    ) -> Result<Option<f64>, ThemeError> {
        resolution(
            self.with_theme(|theme| theme.colors.resolve_component(id, channel, original_only))
                .await,
        )
    }

    pub async fn resolve(&self, id: &str, original_only: bool) -> Result<Option<Rgba>, ThemeError> {
        resolution(
            self.with_theme(|theme| theme.colors.resolve(id, original_only))
                .await,
        )
    }

    pub async fn resolve_hex(
        &self,
        id: &str,
        original_only: bool,
    ) -> Result<Option<String>, ThemeError> {
        resolution(
            self.with_theme(|theme| theme.colors.resolve_hex(id, original_only))
                .await,
        )
    }

    pub async fn resolve_declaration(
        &self,
        id: &str,
        use_hex: bool,
        original_only: bool,
    ) -> Result<Option<String>, ThemeError> {
        resolution(
            self.with_theme(|theme| theme.colors.resolve_declaration(id, use_hex, original_only))
                .await,
        )
    }

    pub async fn is_overridden(&self, id: &str) -> bool {
        self.with_theme(|theme| theme.colors.is_overridden(id))
            .await
            .unwrap_or(false)
    }

    /// The custom-color layer, keyed by color id.
    pub async fn custom_colors(&self) -> BTreeMap<String, CustomColor> {
        self.with_theme(|theme| theme.colors.custom_colors())
            .await
            .unwrap_or_default()
    }

    /// Overrides color `id` and persists the custom-color layer.
    ///
    /// Without a loaded theme every id is unknown. If persisting fails the
    /// in-memory change is kept and the store error is returned.
    pub async fn set_custom_color(
        &self,
        id: &str,
        custom: CustomColor,
    ) -> Result<OverrideOutcome, ThemeError> {
        let _gate = self.load_gate.lock().await;
        let (outcome, layer) = {
            let mut guard = self.theme.write().await;
            let Some(theme) = guard.as_mut() else {
                return Ok(OverrideOutcome::UnknownColor);
            };
            let outcome = theme.colors.set_override(id, custom);
            (outcome, theme.colors.custom_colors())
        };

        match outcome {
            OverrideOutcome::UnknownColor => {
                log::warn!("Cannot customize unknown color '{id}'");
            }
            OverrideOutcome::Applied | OverrideOutcome::Redundant => {
                log::info!("Custom color '{id}': {outcome:?}");
                self.persist_custom_colors(&layer).await?;
            }
        }
        Ok(outcome)
    }

    /// Drops the override of `id`, returning whether there was one.
    pub async fn remove_custom_color(&self, id: &str) -> Result<bool, ThemeError> {
        let _gate = self.load_gate.lock().await;
        let layer = {
            let mut guard = self.theme.write().await;
            match guard.as_mut() {
                Some(theme) => {
                    if !theme.colors.clear_override(id) {
                        return Ok(false);
                    }
                    theme.colors.custom_colors()
                }
                None => return Ok(false),
            }
        };

        self.persist_custom_colors(&layer).await?;
        Ok(true)
    }

    /// Drops every override, in memory and in the store.
    pub async fn clear_custom_colors(&self) -> Result<(), ThemeError> {
        let _gate = self.load_gate.lock().await;
        if let Some(theme) = self.theme.write().await.as_mut() {
            theme.colors.clear_all_overrides();
        }
        self.cache.remove_payload(CUSTOM_COLORS_KEY).await?;
        log::info!("Custom colors cleared");
        Ok(())
    }

    async fn persist_custom_colors(
        &self,
        layer: &BTreeMap<String, CustomColor>,
    ) -> Result<(), ThemeError> {
        self.cache
            .write_payload(CUSTOM_COLORS_KEY, layer)
            .await
            .inspect_err(|e| log::error!("Could not persist custom colors: {e}"))?;
        Ok(())
    }
}

/// Folds "no theme" into "unknown color".
fn resolution<T>(resolved: Option<Result<Option<T>, ColorError>>) -> Result<Option<T>, ThemeError> {
    Ok(resolved.transpose()?.flatten())
}
