//! Selection model over one parse result.

use crate::media::MediaItem;

/// Parsed media items with per-item selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: Vec<MediaItem>,
}

impl Selection {
    /// Wrap a freshly parsed item set.
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    /// Replace the whole set.
    pub fn replace(&mut self, items: Vec<MediaItem>) {
        self.items = items;
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in display order.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flip one item. Returns its new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: usize) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    /// Deselect everything if everything is selected, otherwise select everything.
    pub fn toggle_all(&mut self) {
        let target = !self.all_selected();
        for item in &mut self.items {
            item.selected = target;
        }
    }

    /// Whether every item is selected.
    pub fn all_selected(&self) -> bool {
        self.items.iter().all(|item| item.selected)
    }

    /// Number of selected items.
    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }

    /// Owned copy of the selected items, in display order.
    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.items
            .iter()
            .filter(|item| item.selected)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn selection(n: usize) -> Selection {
        Selection::new(
            (1..=n)
                .map(|id| MediaItem::new(id, MediaKind::Image, format!("https://cdn/{id}.jpg")))
                .collect(),
        )
    }

    fn states(selection: &Selection) -> Vec<bool> {
        selection.items().iter().map(|i| i.selected).collect()
    }

    #[test]
    fn test_toggle() {
        let mut s = selection(3);
        assert_eq!(s.toggle(2), Some(false));
        assert_eq!(s.selected_count(), 2);
        assert_eq!(s.toggle(2), Some(true));
        assert_eq!(s.toggle(9), None);
    }

    #[test]
    fn test_toggle_all_when_all_selected_deselects() {
        let mut s = selection(3);
        s.toggle_all();
        assert_eq!(s.selected_count(), 0);
    }

    #[test]
    fn test_toggle_all_when_partial_selects_all() {
        let mut s = selection(3);
        s.toggle(1);
        s.toggle_all();
        assert_eq!(s.selected_count(), 3);
    }

    #[test]
    fn test_toggle_all_twice_restores_uniform_state() {
        for start in [vec![], vec![1, 2, 3]] {
            let mut s = selection(3);
            for id in start {
                s.toggle(id);
            }
            let before = states(&s);
            s.toggle_all();
            s.toggle_all();
            assert_eq!(states(&s), before);
        }
    }

    #[test]
    fn test_snapshot_keeps_display_order_and_is_detached() {
        let mut s = selection(4);
        s.toggle(2);
        let snapshot = s.snapshot();
        assert_eq!(snapshot.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3, 4]);

        s.toggle(1);
        assert_eq!(snapshot.len(), 3);
    }
}
