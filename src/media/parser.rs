//! Turning a backend parse response into selectable media items.

use crate::api::types::BackendMedia;
use crate::media::item::{MediaItem, MediaKind};

/// Materialize backend media entries into items, all selected.
///
/// Entries with an unknown type or no URL are skipped. Ids are ordinal over
/// the kept entries, starting at 1, so they never collide within one result.
pub fn materialize(media: &[BackendMedia]) -> Vec<MediaItem> {
    let mut items = Vec::with_capacity(media.len());

    for entry in media {
        let kind = match entry.kind.parse::<MediaKind>() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!("Skipping media entry: {}", e);
                continue;
            }
        };

        let source_url = entry.url.trim();
        if source_url.is_empty() {
            tracing::warn!("Skipping {} entry without a URL", kind);
            continue;
        }

        let mut item = MediaItem::new(items.len() + 1, kind, source_url);
        item.thumbnail_url = entry
            .thumbnail
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if kind == MediaKind::Video {
            item.duration = entry.duration.clone();
        }

        items.push(item);
    }

    items
}
