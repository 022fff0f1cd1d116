use std::path::Path;

use anyhow::{Context, Result};

use crate::data::DatasetCache;
use crate::view::{render, RenderedView, UserSelections, ViewKey};

// ---------------------------------------------------------------------------
// Headless export: every view, default selections, as JSON
// ---------------------------------------------------------------------------

/// Render all four views with default selections.
pub fn render_all(cache: &DatasetCache) -> Result<Vec<RenderedView>> {
    let data = cache
        .load()
        .with_context(|| format!("loading datasets from {}", cache.dir().display()))?;
    let selections = UserSelections::default();
    Ok(ViewKey::ALL
        .into_iter()
        .map(|key| render(key, &data, &selections))
        .collect())
}

/// Write [`render_all`] to `out` as pretty-printed JSON.
pub fn export_views(cache: &DatasetCache, out: &Path) -> Result<()> {
    let views = render_all(cache)?;
    let json = serde_json::to_string_pretty(&views).context("serializing views")?;
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    log::info!("Exported {} views to {}", views.len(), out.display());
    Ok(())
}
