use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use clap::{Parser, Subcommand};
use engine::color::codec::{parse_hex, rgba_to_hex};
use engine::model::Pixmap;
use engine::{FileStore, HttpContentSource, LoadOutcome, OverrideOutcome, ThemeEngine, ThemeError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Inspect and customize the Wakfu client theme.
#[derive(Debug, Parser)]
#[command(name = "wakfu-theme", version, about)]
pub struct Cli {
    /// Configuration file to use instead of ./config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Load the theme and print what was found
    Load {
        /// Ignore the loaded theme and the cache
        #[arg(long)]
        force: bool,
    },
    /// Print every color as a declaration line
    Colors {
        /// Write concrete colors as normalized fractions instead of hex
        #[arg(long)]
        rgba: bool,
        /// Ignore custom colors
        #[arg(long)]
        original: bool,
    },
    /// Print the resolved hex value of one color
    Color {
        id: String,
        /// Ignore custom colors
        #[arg(long)]
        original: bool,
    },
    /// Set a custom value for a color
    SetColor {
        id: String,
        /// `#RRGGBB` or `#RRGGBBAA`
        hex: String,
    },
    /// Remove the custom value of a color
    ResetColor { id: String },
    /// Remove every custom color
    ResetColors,
    /// Print a flattened theme element
    Element { id: String },
    /// Print a pixmap and its texture binding
    Pixmap { id: String },
    /// List the application skin parts
    SkinParts,
}

/// Builds the engine described by `config`: HTTP content source and an
/// on-disk cache.
pub fn build_engine(config: &AppConfig) -> AppResult<ThemeEngine> {
    let source = HttpContentSource::with_timeout(config.request_timeout())
        .map_err(|e| AppError::Theme(ThemeError::Fetch(e)))?;
    let cache_dir = config.cache_dir().ok_or_else(|| {
        AppError::Config("no cache directory available; set cache_dir in config.toml".to_string())
    })?;
    log::debug!("Using cache directory {}", cache_dir.display());

    Ok(ThemeEngine::new(
        Arc::new(source),
        Arc::new(FileStore::new(cache_dir)),
        config.engine_settings(),
    ))
}

/// Runs `command` against `engine`, writing results to `out`.
///
/// Every command loads the theme first; only `load --force` bypasses the
/// cache.
pub async fn run<W: Write>(command: Command, engine: &ThemeEngine, out: &mut W) -> AppResult<()> {
    let force = matches!(command, Command::Load { force: true });
    let outcome = engine.load(force).await?;

    match command {
        Command::Load { .. } => {
            let headline = match outcome {
                LoadOutcome::AlreadyLoaded => "Theme already loaded",
                LoadOutcome::FromCache => "Theme loaded from cache",
                LoadOutcome::FromNetwork => "Theme loaded from network",
            };
            writeln!(out, "{headline}")?;
            writeln!(out, "  colors:      {}", engine.colors(false).await.len())?;
            writeln!(out, "  pixmaps:     {}", engine.pixmaps().await.len())?;
            writeln!(out, "  elements:    {}", engine.theme_elements().await.len())?;
            writeln!(out, "  skin parts:  {}", engine.skin_parts().await.len())?;
            writeln!(out, "  custom:      {}", engine.custom_colors().await.len())?;
        }
        Command::Colors { rgba, original } => {
            for color in engine.colors(original).await {
                match engine.resolve_declaration(&color.id, !rgba, original).await {
                    Ok(Some(line)) => writeln!(out, "{line}")?,
                    Ok(None) => log::debug!("Color '{}' has no concrete value", color.id),
                    Err(e) => log::warn!("Skipping color '{}': {e}", color.id),
                }
            }
        }
        Command::Color { id, original } => {
            let hex = engine
                .resolve_hex(&id, original)
                .await?
                .ok_or_else(|| not_found("color", &id))?;
            if !original && engine.is_overridden(&id).await {
                let theme = engine.resolve_hex(&id, true).await?.unwrap_or_default();
                writeln!(out, "{id} {hex} (custom, theme: {theme})")?;
            } else {
                writeln!(out, "{id} {hex}")?;
            }
        }
        Command::SetColor { id, hex } => {
            let custom = parse_hex(&hex).ok_or_else(|| AppError::InvalidColor(hex.clone()))?;
            match engine.set_custom_color(&id, custom).await? {
                OverrideOutcome::Applied => {
                    let code = rgba_to_hex(
                        custom.red,
                        custom.green,
                        custom.blue,
                        Some(custom.alpha_percent()),
                    );
                    writeln!(out, "Color '{id}' set to {code}")?;
                }
                OverrideOutcome::Redundant => {
                    writeln!(out, "Color '{id}' matches the theme; custom value removed")?;
                }
                OverrideOutcome::UnknownColor => return Err(not_found("color", &id)),
            }
        }
        Command::ResetColor { id } => {
            if engine.remove_custom_color(&id).await? {
                writeln!(out, "Custom value of '{id}' removed")?;
            } else {
                writeln!(out, "Color '{id}' has no custom value")?;
            }
        }
        Command::ResetColors => {
            engine.clear_custom_colors().await?;
            writeln!(out, "All custom colors removed")?;
        }
        Command::Element { id } => {
            let element = engine
                .theme_element(&id)
                .await
                .ok_or_else(|| not_found("theme element", &id))?;
            writeln!(out, "{} ({} pixmaps)", element.id, element.pixmaps.len())?;
            if !element.attributes.is_empty() {
                writeln!(out, "  {}", serde_json::Value::Object(element.attributes))?;
            }
            for pixmap in &element.pixmaps {
                writeln!(out, "  {}", describe_pixmap(pixmap))?;
            }
        }
        Command::Pixmap { id } => {
            let pixmap = engine
                .pixmap(&id)
                .await
                .ok_or_else(|| not_found("pixmap", &id))?;
            writeln!(out, "{}", describe_pixmap(&pixmap))?;
            if !pixmap.attributes.is_empty() {
                writeln!(out, "  {}", serde_json::Value::Object(pixmap.attributes))?;
            }
        }
        Command::SkinParts => {
            for part in engine.skin_parts().await {
                writeln!(out, "{}\t{}", part.id, part.asset_url)?;
            }
        }
    }

    Ok(())
}

fn not_found(kind: &'static str, id: &str) -> AppError {
    AppError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn describe_pixmap(pixmap: &Pixmap) -> String {
    let image = pixmap.image.as_ref().map_or("unbound", |image| image.url());
    format!("{} texture={} image={image}", pixmap.id, pixmap.texture)
}
