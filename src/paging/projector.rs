//! Page projection: the visible slice and the paging control bar.

use serde::Serialize;

use super::{pages_for, Record, RecordBuffer};

/// Kind of a control in the paging bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum ControlKind {
    /// Jump to page 1
    First,
    /// Jump back by one window
    JumpBack,
    /// A numbered page button
    Page(usize),
    /// Jump forward by one window
    JumpForward,
    /// Jump to the last known page
    Last,
}

/// One control of the paging bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub kind: ControlKind,

    /// Page the control navigates to
    pub target: usize,

    pub disabled: bool,

    /// Whether this is the numbered button for the current page
    pub active: bool,
}

impl PageControl {
    pub fn label(&self) -> String {
        match self.kind {
            ControlKind::First => "««".to_string(),
            ControlKind::JumpBack => "«".to_string(),
            ControlKind::Page(page) => page.to_string(),
            ControlKind::JumpForward => "»".to_string(),
            ControlKind::Last => "»»".to_string(),
        }
    }
}

/// Paging controls for one render, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlBar {
    pub controls: Vec<PageControl>,

    /// Highest page currently known
    pub max_page: usize,

    /// False while the source may still hold pages beyond `max_page`
    pub max_page_is_final: bool,
}

impl ControlBar {
    /// Numbered page buttons only
    pub fn numbered(&self) -> impl Iterator<Item = &PageControl> {
        self.controls
            .iter()
            .filter(|c| matches!(c.kind, ControlKind::Page(_)))
    }

    /// Find a control by kind
    pub fn get(&self, kind: ControlKind) -> Option<&PageControl> {
        self.controls.iter().find(|c| c.kind == kind)
    }

    /// Page reached by activating `kind`, if it is present and enabled
    pub fn activate(&self, kind: ControlKind) -> Option<usize> {
        self.get(kind)
            .filter(|c| !c.disabled)
            .map(|c| c.target.clamp(1, self.max_page))
    }
}

/// Maps a record buffer onto fixed-size pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProjector {
    page_size: usize,
    window_size: usize,
}

impl PageProjector {
    pub fn new(page_size: usize, window_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            window_size: window_size.max(1),
        }
    }

    /// Records shown on `page` (1-based); empty when out of range
    pub fn visible_slice<'a, R: Record>(&self, buffer: &'a RecordBuffer<R>, page: usize) -> &'a [R] {
        let items = buffer.items();
        let start = page.saturating_sub(1).saturating_mul(self.page_size);
        if page == 0 || start >= items.len() {
            return &[];
        }

        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    /// Highest page reachable from the controls
    pub fn max_page(&self, items_len: usize, estimated_total_pages: usize) -> usize {
        estimated_total_pages
            .max(pages_for(items_len, self.page_size))
            .max(1)
    }

    /// Build the paging bar for `page`
    pub fn controls(
        &self,
        page: usize,
        items_len: usize,
        has_more: bool,
        estimated_total_pages: usize,
    ) -> ControlBar {
        let max_page = self.max_page(items_len, estimated_total_pages);
        let page = page.max(1);
        let window = self.window_size;

        let at_start = page == 1;
        let at_end = page >= max_page;

        let mut controls = Vec::with_capacity(window + 4);
        controls.push(PageControl {
            kind: ControlKind::First,
            target: 1,
            disabled: at_start,
            active: false,
        });
        controls.push(PageControl {
            kind: ControlKind::JumpBack,
            target: page.saturating_sub(window).max(1),
            disabled: at_start,
            active: false,
        });

        for number in self.window_range(page, max_page) {
            controls.push(PageControl {
                kind: ControlKind::Page(number),
                target: number,
                disabled: false,
                active: number == page,
            });
        }

        controls.push(PageControl {
            kind: ControlKind::JumpForward,
            target: page.saturating_add(window).min(max_page),
            disabled: at_end,
            active: false,
        });
        controls.push(PageControl {
            kind: ControlKind::Last,
            target: max_page,
            disabled: at_end,
            active: false,
        });

        ControlBar {
            controls,
            max_page,
            max_page_is_final: !has_more,
        }
    }

    /// Numbered pages centred on `page`, clamped to `[1, max_page]`.
    ///
    /// Near the end the window slides left so it keeps
    /// `min(window_size, max_page)` entries.
    fn window_range(&self, page: usize, max_page: usize) -> std::ops::RangeInclusive<usize> {
        let window = self.window_size;

        let mut start = page.saturating_sub(window / 2).max(1);
        let end = start.saturating_add(window - 1).min(max_page);
        if end + 1 < start.saturating_add(window) {
            start = (end + 1).saturating_sub(window).max(1);
        }

        start..=end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::testing::{records, TestRecord};
    use crate::paging::FetchBatch;

    fn buffer_of(count: usize, limit: usize) -> RecordBuffer<TestRecord> {
        let mut buffer = RecordBuffer::new();
        buffer
            .append(FetchBatch::new(0, limit, records(0..count), None, 0), 10)
            .unwrap();
        buffer
    }

    fn numbers(bar: &ControlBar) -> Vec<usize> {
        bar.numbered().map(|c| c.target).collect()
    }

    #[test]
    fn test_visible_slice_first_page() {
        let buffer = buffer_of(50, 50);
        let projector = PageProjector::new(10, 5);

        let ids: Vec<usize> = projector.visible_slice(&buffer, 1).iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_visible_slice_partial_last_page() {
        let buffer = buffer_of(45, 50);
        let projector = PageProjector::new(10, 5);

        let ids: Vec<usize> = projector.visible_slice(&buffer, 5).iter().map(|r| r.id).collect();
        assert_eq!(ids, (40..45).collect::<Vec<_>>());
    }

    #[test]
    fn test_visible_slice_out_of_range_is_empty() {
        let buffer = buffer_of(45, 50);
        let projector = PageProjector::new(10, 5);

        assert!(projector.visible_slice(&buffer, 0).is_empty());
        assert!(projector.visible_slice(&buffer, 6).is_empty());
        assert!(projector.visible_slice(&buffer, usize::MAX).is_empty());
    }

    #[test]
    fn test_visible_slices_tile_the_buffer() {
        let buffer = buffer_of(97, 100);
        let projector = PageProjector::new(10, 5);

        let mut seen = Vec::new();
        for page in 1..=10 {
            let slice = projector.visible_slice(&buffer, page);
            if page < 10 {
                assert_eq!(slice.len(), 10);
            } else {
                assert_eq!(slice.len(), 7);
            }
            seen.extend(slice.iter().map(|r| r.id));
        }
        assert_eq!(seen, (0..97).collect::<Vec<_>>());
    }

    #[test]
    fn test_max_page() {
        let projector = PageProjector::new(10, 5);
        assert_eq!(projector.max_page(0, 1), 1);
        assert_eq!(projector.max_page(45, 5), 5);
        assert_eq!(projector.max_page(45, 1), 5);
        assert_eq!(projector.max_page(50, 124), 124);
    }

    #[test]
    fn test_controls_on_last_page_of_exhausted_buffer() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(5, 45, false, 5);

        assert_eq!(bar.max_page, 5);
        assert!(bar.max_page_is_final);
        assert!(bar.get(ControlKind::Last).unwrap().disabled);
        assert!(bar.get(ControlKind::JumpForward).unwrap().disabled);
        assert!(!bar.get(ControlKind::First).unwrap().disabled);
        assert_eq!(numbers(&bar), vec![1, 2, 3, 4, 5]);
        assert!(bar.get(ControlKind::Page(5)).unwrap().active);
    }

    #[test]
    fn test_controls_order() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(1, 100, true, 1);

        let kinds: Vec<ControlKind> = bar.controls.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ControlKind::First,
                ControlKind::JumpBack,
                ControlKind::Page(1),
                ControlKind::Page(2),
                ControlKind::Page(3),
                ControlKind::Page(4),
                ControlKind::Page(5),
                ControlKind::JumpForward,
                ControlKind::Last,
            ]
        );
        assert!(bar.get(ControlKind::First).unwrap().disabled);
        assert!(bar.get(ControlKind::JumpBack).unwrap().disabled);
        assert!(!bar.max_page_is_final);
    }

    #[test]
    fn test_window_centres_on_page() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(10, 300, true, 1);
        assert_eq!(numbers(&bar), vec![8, 9, 10, 11, 12]);
        assert_eq!(bar.get(ControlKind::JumpBack).unwrap().target, 5);
        assert_eq!(bar.get(ControlKind::JumpForward).unwrap().target, 15);
    }

    #[test]
    fn test_window_shifts_left_near_end() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(29, 300, true, 1);
        assert_eq!(numbers(&bar), vec![26, 27, 28, 29, 30]);
        assert_eq!(bar.get(ControlKind::JumpForward).unwrap().target, 30);
    }

    #[test]
    fn test_window_never_exceeds_max_page() {
        let projector = PageProjector::new(10, 5);
        for max_page in 1..=12 {
            for page in 1..=max_page + 3 {
                let bar = projector.controls(page, max_page * 10, false, 1);
                let pages = numbers(&bar);
                assert_eq!(pages.len(), max_page.min(5), "page {} of {}", page, max_page);
                assert!(pages.iter().all(|p| (1..=max_page).contains(p)));
                assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
            }
        }
    }

    #[test]
    fn test_controls_for_huge_page() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(usize::MAX, 45, false, 5);

        assert_eq!(bar.max_page, 5);
        assert_eq!(numbers(&bar), vec![1, 2, 3, 4, 5]);
        assert!(bar.get(ControlKind::JumpForward).unwrap().disabled);
        assert_eq!(bar.activate(ControlKind::First), Some(1));
    }

    #[test]
    fn test_activation_stays_in_range() {
        let projector = PageProjector::new(10, 5);
        for max_page in 1..=12 {
            for page in 1..=max_page {
                let bar = projector.controls(page, max_page * 10, false, 1);
                for control in &bar.controls {
                    if let Some(target) = bar.activate(control.kind) {
                        assert!((1..=max_page).contains(&target));
                    }
                }
            }
        }
    }

    #[test]
    fn test_disabled_controls_do_not_activate() {
        let projector = PageProjector::new(10, 5);
        let bar = projector.controls(1, 45, false, 5);
        assert_eq!(bar.activate(ControlKind::First), None);
        assert_eq!(bar.activate(ControlKind::Last), Some(5));
        assert_eq!(bar.activate(ControlKind::Page(9)), None);
    }
}
