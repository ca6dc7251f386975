//! Screen model for the infinite-scroll user list.
//!
//! [`FeedView`] wires the paged query to the windowed list: it sizes the list
//! from the loaded users, builds rows for the rendered window, and turns
//! visibility of the trailing loading row into the next page request.
//! Everything here is plain data; `output` turns it into terminal text.

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::card::{self, ROW_HEIGHT};
use crate::error::NetworkError;
use crate::query::{FeedQuery, PageRequest, QueryStatus, PAGE_SIZE};
use crate::responses::Page;
use crate::sentinel::SentinelObserver;
use crate::output::strip_control;
use crate::viewport::{FeedList, VirtualItem};

pub const HEADER: &str = "User Feed";
pub const EMPTY_MESSAGE: &str = "No users found.";
pub const SHORT_MESSAGE: &str = "The server stopped returning users before its reported total.";
pub const LIST_ROLE: &str = "list";
pub const LIST_LABEL: &str = "User list";
pub const SENTINEL_LABEL: &str = "Loading more users";
pub const LOAD_ERROR_LABEL: &str = "Failed to load more users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Plain,
    Header,
    Title,
    Muted,
    Alert,
    Skeleton,
    /// Text that opens the given target when activated.
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    /// Control characters are dropped so server text cannot emit escapes.
    pub fn new(text: impl AsRef<str>, style: Style) -> Self {
        Self {
            text: strip_control(text.as_ref()),
            style,
        }
    }

    pub fn plain(text: impl AsRef<str>) -> Self {
        Self::new(text, Style::Plain)
    }

    /// Terminal columns taken by the text.
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn plain(text: impl AsRef<str>) -> Self {
        Self::styled(text, Style::Plain)
    }

    pub fn styled(text: impl AsRef<str>, style: Style) -> Self {
        Self::new(vec![Span::new(text, style)])
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    User,
    /// Trailing placeholder that requests the next page when seen.
    Sentinel,
    /// Trailing row after the next page failed.
    LoadError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub index: usize,
    pub start: u64,
    pub kind: RowKind,
    pub label: String,
    /// Whether keyboard focus can land on the row.
    pub focusable: bool,
    pub lines: Vec<Line>,
}

/// The windowed list as drawn: only rows in the rendered range are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFrame {
    pub role: &'static str,
    pub label: &'static str,
    pub item_count: usize,
    pub scroll_offset: u64,
    pub viewport_size: u32,
    pub rows: Vec<Row>,
}

impl ListFrame {
    /// Lines of the rendered rows that fall inside the viewport.
    pub fn visible_lines(&self) -> Vec<Line> {
        let top = self.scroll_offset;
        let bottom = top + self.viewport_size as u64;

        self.rows
            .iter()
            .flat_map(|row| {
                row.lines
                    .iter()
                    .enumerate()
                    .map(move |(i, line)| (row.start + i as u64, line))
            })
            .filter(|(at, _)| *at >= top && *at < bottom)
            .map(|(_, line)| line.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.iter().find(|row| row.index == index)
    }
}

/// The three mutually exclusive top-level renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Screen {
    Loading {
        skeletons: Vec<Vec<Line>>,
    },
    Error {
        message: String,
    },
    Loaded {
        list: ListFrame,
        /// Extra placeholder below the list while a page is in flight.
        fetching_more: Option<Vec<Line>>,
        /// Shown under the list once pagination has ended early or empty.
        notice: Option<&'static str>,
        status: String,
    },
}

impl Screen {
    pub fn lines(&self) -> Vec<Line> {
        match self {
            Screen::Loading { skeletons } => skeletons.iter().flatten().cloned().collect(),
            Screen::Error { message } => vec![
                Line::styled(format!("Something went wrong: {message}"), Style::Alert),
                Line::default(),
                Line::new(vec![
                    Span::new("[ Try again ]", Style::Title),
                    Span::new("  press r", Style::Muted),
                ]),
            ],
            Screen::Loaded {
                list,
                fetching_more,
                notice,
                status,
            } => {
                let mut lines = vec![Line::styled(HEADER, Style::Header), Line::default()];
                lines.extend(list.visible_lines());
                if let Some(skeleton) = fetching_more {
                    lines.extend(skeleton.iter().cloned());
                }
                if let Some(message) = notice {
                    lines.push(Line::default());
                    lines.push(Line::plain(*message));
                }
                lines.push(Line::default());
                lines.push(Line::styled(status.clone(), Style::Muted));
                lines
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    RowDown,
    RowUp,
    PageDown,
    PageUp,
    Top,
    Bottom,
}

pub struct FeedView {
    query: FeedQuery,
    list: FeedList,
    observer: SentinelObserver,
}

impl FeedView {
    pub fn new(viewport_rows: u16) -> Self {
        let viewport = viewport_rows.max(1) as u32 * ROW_HEIGHT;
        Self {
            query: FeedQuery::new(),
            list: FeedList::new(0, ROW_HEIGHT, viewport),
            observer: SentinelObserver::new(),
        }
    }

    #[cfg(test)]
    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    #[cfg(test)]
    pub fn list(&self) -> &FeedList {
        &self.list
    }

    /// Rows the list exposes: loaded users plus the loading row while more
    /// pages exist.
    pub fn item_count(&self) -> usize {
        let loaded = self.query.loaded_count();
        if self.query.has_next_page() {
            loaded + 1
        } else {
            loaded
        }
    }

    pub fn start(&mut self) -> Option<PageRequest> {
        self.query.start()
    }

    pub fn receive(&mut self, request: PageRequest, result: Result<Page, NetworkError>) {
        if self.query.receive(request, result) {
            self.list.set_count(self.item_count());
        }
    }

    /// Full reset: drop everything and load from offset 0.
    pub fn refetch(&mut self) -> PageRequest {
        let request = self.query.refetch();
        self.observer.disconnect();
        self.list.set_count(self.item_count());
        self.list.scroll_to_offset(0);
        request
    }

    /// The `r` action: reset after a first-load failure, re-request the
    /// failed page after a later failure, refresh everything otherwise.
    pub fn retry(&mut self) -> PageRequest {
        match self.query.retry_next_page() {
            Some(request) => request,
            None => self.refetch(),
        }
    }

    pub fn scroll(&mut self, scroll: Scroll) {
        let row = self.list.row_height() as i64;
        match scroll {
            Scroll::RowDown => self.list.scroll_by(row),
            Scroll::RowUp => self.list.scroll_by(-row),
            Scroll::PageDown => self.list.page_down(),
            Scroll::PageUp => self.list.page_up(),
            Scroll::Top => self.list.scroll_to_offset(0),
            Scroll::Bottom => self.list.scroll_to_end(),
        }
    }

    pub fn render(&self) -> Screen {
        match self.query.status() {
            QueryStatus::Pending => Screen::Loading {
                skeletons: (0..PAGE_SIZE).map(|_| card::skeleton_card()).collect(),
            },
            QueryStatus::Error => Screen::Error {
                message: self
                    .query
                    .error()
                    .map(|e| e.message.clone())
                    .unwrap_or_default(),
            },
            QueryStatus::Success => {
                let rows = self
                    .list
                    .virtual_items()
                    .into_iter()
                    .map(|item| self.row(item))
                    .collect();

                Screen::Loaded {
                    list: ListFrame {
                        role: LIST_ROLE,
                        label: LIST_LABEL,
                        item_count: self.list.count(),
                        scroll_offset: self.list.scroll_offset(),
                        viewport_size: self.list.viewport_size(),
                        rows,
                    },
                    fetching_more: self
                        .query
                        .is_fetching_next_page()
                        .then(card::skeleton_card),
                    notice: self.notice(),
                    status: self.status_line(),
                }
            }
        }
    }

    /// Re-attach the loading-row observer for the frame just drawn and
    /// request the next page if the row is in view.
    ///
    /// Skipped entirely while a next page is in flight. Disconnected while a
    /// later-page error is held, so failures are never retried on their own.
    pub fn observe_sentinel(&mut self) -> Option<PageRequest> {
        if self.query.is_fetching_next_page() {
            return None;
        }

        let sentinel_present = self.query.status() == QueryStatus::Success
            && self.query.has_next_page()
            && !self.query.is_error();
        if !sentinel_present {
            self.observer.disconnect();
            return None;
        }

        self.observer.observe(self.query.loaded_count());
        if self.observer.notify(self.list.visible_range()) && !self.query.is_fetching() {
            return self.query.fetch_next_page();
        }
        None
    }

    fn row(&self, item: VirtualItem) -> Row {
        let loaded = self.query.loaded_count();

        if let Some(user) = self.query.user(item.index) {
            return Row {
                index: item.index,
                start: item.start,
                kind: RowKind::User,
                label: card::card_label(user),
                focusable: true,
                lines: card::user_card(user),
            };
        }

        debug_assert_eq!(item.index, loaded);
        match self.query.error() {
            Some(err) => Row {
                index: item.index,
                start: item.start,
                kind: RowKind::LoadError,
                label: LOAD_ERROR_LABEL.to_string(),
                focusable: true,
                lines: card::load_error_card(&err.message),
            },
            None => Row {
                index: item.index,
                start: item.start,
                kind: RowKind::Sentinel,
                label: SENTINEL_LABEL.to_string(),
                focusable: false,
                lines: card::skeleton_card(),
            },
        }
    }

    fn notice(&self) -> Option<&'static str> {
        if self.query.has_next_page() {
            return None;
        }
        let loaded = self.query.loaded_count();
        if loaded < self.query.total() {
            Some(SHORT_MESSAGE)
        } else if loaded == 0 {
            Some(EMPTY_MESSAGE)
        } else {
            None
        }
    }

    fn status_line(&self) -> String {
        let loaded = self.query.loaded_count();
        let visible = self.list.visible_range();
        let first = (visible.start_index + 1).min(loaded);
        let last = visible.end_index.min(loaded);

        format!(
            "{first}-{last} of {} loaded ({} total) · j/k row · d/u page · g/G top/bottom · r refresh · q quit",
            loaded,
            self.query.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::page;
    use pretty_assertions::assert_eq;

    /// Drive the view like the browse loop does: render, observe, and answer
    /// every request from an in-memory list of `total` users.
    fn settle(view: &mut FeedView, total: usize) -> Vec<usize> {
        let mut offsets = Vec::new();
        let mut pending = view.start();
        while let Some(request) = pending {
            offsets.push(request.offset);
            let end = (request.offset + request.take).min(total);
            view.receive(request, Ok(page(request.offset..end, total)));
            view.render();
            pending = view.observe_sentinel();
        }
        offsets
    }

    fn loaded_view(total: usize) -> FeedView {
        let mut view = FeedView::new(5);
        let request = view.start().unwrap();
        view.receive(request, Ok(page(0..PAGE_SIZE.min(total), total)));
        view
    }

    #[test]
    fn test_initial_render_is_skeletons() {
        let view = FeedView::new(5);
        match view.render() {
            Screen::Loading { skeletons } => assert_eq!(skeletons.len(), PAGE_SIZE),
            other => panic!("expected loading screen, got {other:?}"),
        }
    }

    #[test]
    fn test_first_load_error_replaces_list() {
        let mut view = FeedView::new(5);
        let request = view.start().unwrap();
        view.receive(request, Err(NetworkError::status(500, "")));

        let screen = view.render();
        assert_eq!(
            screen,
            Screen::Error {
                message: "Failed to fetch users (status 500)".to_string()
            }
        );
        assert!(screen.lines()[0].text().starts_with("Something went wrong: "));
        assert_eq!(view.observe_sentinel(), None);

        let retry = view.retry();
        assert_eq!(retry.offset, 0);
        assert_eq!(view.query().loaded_count(), 0);
        assert!(matches!(view.render(), Screen::Loading { .. }));
    }

    #[test]
    fn test_sentinel_row_follows_loaded_users() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::Bottom);

        assert_eq!(view.item_count(), 11);
        let Screen::Loaded { list, .. } = view.render() else {
            panic!("expected loaded screen");
        };

        let sentinel = list.row(10).unwrap();
        assert_eq!(sentinel.kind, RowKind::Sentinel);
        assert_eq!(sentinel.label, SENTINEL_LABEL);
        assert!(!sentinel.focusable);

        let card = list.row(9).unwrap();
        assert_eq!(card.kind, RowKind::User);
        assert_eq!(card.label, "User card for First9 Last9");
        assert!(card.focusable);
        assert_eq!(list.role, LIST_ROLE);
        assert_eq!(list.label, LIST_LABEL);
    }

    #[test]
    fn test_no_sentinel_row_when_everything_loaded() {
        let view = loaded_view(7);
        assert_eq!(view.item_count(), 7);

        let Screen::Loaded { list, notice, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert!(list.row(7).is_none());
        assert!(list.rows.iter().all(|row| row.kind == RowKind::User));
        assert_eq!(notice, None);
    }

    #[test]
    fn test_sentinel_out_of_view_does_not_fetch() {
        let mut view = loaded_view(35);
        assert_eq!(view.observe_sentinel(), None);
        assert!(!view.query().is_fetching());
    }

    #[test]
    fn test_scrolling_to_sentinel_fetches_once() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::Bottom);

        let request = view.observe_sentinel().unwrap();
        assert_eq!(request.offset, 10);
        assert!(view.query().is_fetching_next_page());

        view.render();
        assert_eq!(view.observe_sentinel(), None);
        view.scroll(Scroll::RowUp);
        view.scroll(Scroll::Bottom);
        assert_eq!(view.observe_sentinel(), None);

        let Screen::Loaded { fetching_more, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert!(fetching_more.is_some());

        view.receive(request, Ok(page(10..20, 35)));
        assert_eq!(view.item_count(), 21);
        let Screen::Loaded { fetching_more, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert!(fetching_more.is_none());
    }

    #[test]
    fn test_tall_viewport_fills_itself() {
        let mut view = FeedView::new(40);
        let offsets = settle(&mut view, 35);

        assert_eq!(offsets, vec![0, 10, 20, 30]);
        assert_eq!(view.query().loaded_count(), 35);
        assert_eq!(view.item_count(), 35);
    }

    #[test]
    fn test_scrolling_through_everything() {
        let mut view = FeedView::new(5);
        let mut offsets = settle(&mut view, 35);
        assert_eq!(offsets, vec![0]);

        for _ in 0..20 {
            view.scroll(Scroll::PageDown);
            view.render();
            if let Some(request) = view.observe_sentinel() {
                offsets.push(request.offset);
                let end = (request.offset + request.take).min(35);
                view.receive(request, Ok(page(request.offset..end, 35)));
            }
        }

        assert_eq!(offsets, vec![0, 10, 20, 30]);
        assert_eq!(view.query().loaded_count(), 35);
        assert!(!view.query().has_next_page());
    }

    #[test]
    fn test_empty_result_shows_message() {
        let mut view = FeedView::new(5);
        let offsets = settle(&mut view, 0);

        assert_eq!(offsets, vec![0]);
        let screen = view.render();
        let Screen::Loaded { notice, list, .. } = &screen else {
            panic!("expected loaded screen");
        };
        assert_eq!(*notice, Some(EMPTY_MESSAGE));
        assert!(list.rows.is_empty());
        assert!(screen.lines().iter().any(|l| l.text() == EMPTY_MESSAGE));
        assert_eq!(view.observe_sentinel(), None);
    }

    #[test]
    fn test_empty_page_below_total_is_not_called_empty() {
        let mut view = FeedView::new(5);
        let request = view.start().unwrap();
        view.receive(request, Ok(page(0..0, 20)));

        let screen = view.render();
        let Screen::Loaded { notice, status, .. } = &screen else {
            panic!("expected loaded screen");
        };
        assert_eq!(*notice, Some(SHORT_MESSAGE));
        assert!(status.starts_with("0-0 of 0 loaded (20 total)"));
        assert!(!screen.lines().iter().any(|l| l.text() == EMPTY_MESSAGE));
        assert_eq!(view.observe_sentinel(), None);
    }

    #[test]
    fn test_short_page_after_loaded_users() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::Bottom);
        let request = view.observe_sentinel().unwrap();
        view.receive(request, Ok(page(10..10, 35)));

        assert_eq!(view.item_count(), 10);
        let Screen::Loaded { notice, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert_eq!(notice, Some(SHORT_MESSAGE));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let span = Span::plain("Ada\x1b]8;;evil\x07 Lovelace\n");
        assert_eq!(span.text, "Ada]8;;evil Lovelace");
        assert_eq!(Line::styled("a\tb", Style::Alert).text(), "ab");
    }

    #[test]
    fn test_span_width_counts_columns() {
        assert_eq!(Span::plain("Ada").width(), 3);
        assert_eq!(Span::plain("山田太郎").width(), 8);
        assert_eq!(Span::plain("◉").width(), 1);
    }

    #[test]
    fn test_later_page_failure_shows_inline_error() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::Bottom);
        let request = view.observe_sentinel().unwrap();
        view.receive(request, Err(NetworkError::status(503, "")));

        let Screen::Loaded { list, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert_eq!(list.row(10).map(|r| r.kind), Some(RowKind::LoadError));
        assert_eq!(list.row(0).map(|r| r.kind), None);
        assert_eq!(view.query().loaded_count(), 10);

        // No automatic retry however often the row is seen.
        for _ in 0..3 {
            view.scroll(Scroll::RowUp);
            view.scroll(Scroll::Bottom);
            assert_eq!(view.observe_sentinel(), None);
        }

        let retry = view.retry();
        assert_eq!(retry.offset, 10);
        view.receive(retry, Ok(page(10..20, 35)));
        assert_eq!(view.query().loaded_count(), 20);
        assert!(!view.query().is_error());
    }

    #[test]
    fn test_retry_without_error_refreshes() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::PageDown);

        let request = view.retry();
        assert_eq!(request.offset, 0);
        assert_eq!(view.list().scroll_offset(), 0);
        assert!(view.query().is_loading());
    }

    #[test]
    fn test_visible_lines_are_clipped_to_viewport() {
        let mut view = loaded_view(35);
        view.scroll(Scroll::RowDown);
        view.scroll(Scroll::RowDown);

        let Screen::Loaded { list, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        let lines = list.visible_lines();
        assert_eq!(lines.len(), 5 * ROW_HEIGHT as usize);
        assert!(lines[1].text().contains("First2 Last2"));
        assert_eq!(list.rows.first().map(|r| r.index), Some(0));
        assert_eq!(list.rows.last().map(|r| r.index), Some(9));
    }

    #[test]
    fn test_status_line_reports_window() {
        let view = loaded_view(35);
        let Screen::Loaded { status, .. } = view.render() else {
            panic!("expected loaded screen");
        };
        assert!(status.starts_with("1-5 of 10 loaded (35 total)"));
    }
}
