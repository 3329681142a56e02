//! Generic data table: column layout, row selection, per-row actions,
//! column visibility, sorting and the row window used for virtualized
//! rendering. The table holds no records and performs no I/O; handlers
//! pass the records in on every render.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Range;

pub const SELECT_WIDTH: f64 = 45.0;
pub const ROW_HEIGHT: u32 = 40;
pub const OVERSCAN_ROWS: usize = 10;

const ACTION_BUTTON_WIDTH: f64 = 45.0;
const ACTIONS_PADDING: f64 = 15.0;
const MIN_ACTIONS_WIDTH: f64 = 80.0;

/// A record the table can address by identifier.
pub trait TableRecord {
    fn record_id(&self) -> String;
}

pub type Accessor<R> = fn(&R) -> String;
pub type Predicate<R> = fn(&R) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn css_class(self) -> &'static str {
        match self {
            Align::Left => "",
            Align::Center => "text-center",
            Align::Right => "text-right",
        }
    }
}

pub struct Column<R> {
    pub label: String,
    pub key: String,
    accessor: Accessor<R>,
    render: Option<fn(&str) -> String>,
    badge: Option<Accessor<R>>,
    pub width: Option<f64>,
    pub enable_sort: bool,
    pub header_align: Align,
    pub content_align: Align,
}

impl<R> Column<R> {
    pub fn new(label: &str, key: &str, accessor: Accessor<R>) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            accessor,
            render: None,
            badge: None,
            width: None,
            enable_sort: false,
            header_align: Align::Left,
            content_align: Align::Left,
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn sortable(mut self) -> Self {
        self.enable_sort = true;
        self
    }

    pub fn render_with(mut self, render: fn(&str) -> String) -> Self {
        self.render = Some(render);
        self
    }

    /// Shows the cell as a badge with the class returned for the record.
    pub fn badge(mut self, class: Accessor<R>) -> Self {
        self.badge = Some(class);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.header_align = align;
        self.content_align = align;
        self
    }

    pub fn value(&self, record: &R) -> String {
        (self.accessor)(record)
    }

    pub fn cell(&self, record: &R) -> String {
        let value = self.value(record);
        match self.render {
            Some(render) => render(&value),
            None => value,
        }
    }

    pub fn badge_class(&self, record: &R) -> String {
        self.badge.map(|class| class(record)).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    View,
    Edit,
    Delete,
    Description,
    Share,
    Cloud,
    Console,
    Download,
    Disable,
    Format,
    Preview,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::View => "view",
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
            ActionKind::Description => "description",
            ActionKind::Share => "share",
            ActionKind::Cloud => "cloud",
            ActionKind::Console => "console",
            ActionKind::Download => "download",
            ActionKind::Disable => "disable",
            ActionKind::Format => "format",
            ActionKind::Preview => "preview",
        }
    }
}

/// Where an action sends the user. Both variants address `{prefix}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// Plain navigation.
    Link(String),
    /// Form post, for actions that change state.
    Submit(String),
}

impl ActionTarget {
    fn for_record(&self, id: &str) -> ActionTarget {
        match self {
            ActionTarget::Link(prefix) => ActionTarget::Link(join_target(prefix, id)),
            ActionTarget::Submit(prefix) => ActionTarget::Submit(join_target(prefix, id)),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ActionTarget::Link(u) | ActionTarget::Submit(u) => u,
        }
    }

    pub fn is_submit(&self) -> bool {
        matches!(self, ActionTarget::Submit(_))
    }
}

fn join_target(prefix: &str, id: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), id)
}

pub struct ItemAction<R> {
    pub kind: ActionKind,
    pub label: String,
    target: ActionTarget,
    disabled_when: Option<Predicate<R>>,
    loading_when: Option<Predicate<R>>,
}

impl<R> ItemAction<R> {
    pub fn new(kind: ActionKind, label: &str, target: ActionTarget) -> Self {
        Self {
            kind,
            label: label.to_string(),
            target,
            disabled_when: None,
            loading_when: None,
        }
    }

    pub fn view(prefix: &str) -> Self {
        Self::new(ActionKind::View, "View", ActionTarget::Link(prefix.to_string()))
    }

    pub fn disabled_when(mut self, predicate: Predicate<R>) -> Self {
        self.disabled_when = Some(predicate);
        self
    }

    pub fn loading_when(mut self, predicate: Predicate<R>) -> Self {
        self.loading_when = Some(predicate);
        self
    }

    fn is_disabled(&self, record: &R) -> bool {
        self.disabled_when.is_some_and(|p| p(record))
    }

    fn is_loading(&self, record: &R) -> bool {
        self.loading_when.is_some_and(|p| p(record))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Checkbox,
    Radio,
}

/// Identifiers of the selected records.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub mode: SelectionMode,
    pub select_all: bool,
    selected: BTreeSet<String>,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_select_all(mut self) -> Self {
        self.select_all = true;
        self
    }

    pub fn with_selected<I: IntoIterator<Item = String>>(mut self, ids: I) -> Self {
        for id in ids {
            self.toggle(&id);
        }
        self
    }

    pub fn toggle(&mut self, id: &str) {
        match self.mode {
            SelectionMode::Checkbox => {
                if !self.selected.remove(id) {
                    self.selected.insert(id.to_string());
                }
            }
            SelectionMode::Radio => {
                let was_selected = self.selected.contains(id);
                self.selected.clear();
                if !was_selected {
                    self.selected.insert(id.to_string());
                }
            }
        }
    }

    /// Selects every id, or clears the selection when all are already selected.
    pub fn toggle_all<I: IntoIterator<Item = String>>(&mut self, ids: I) {
        let ids: BTreeSet<String> = ids.into_iter().collect();
        if !ids.is_empty() && ids.is_subset(&self.selected) {
            self.selected.clear();
        } else if self.mode == SelectionMode::Checkbox {
            self.selected = ids;
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn all_selected(&self, record_count: usize) -> bool {
        self.selected.len() == record_count
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Paging configuration for tables that load rows on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfiniteScroll {
    /// Total rows available on the backend, loaded or not.
    pub records_count: usize,
}

/// Inclusive index range of rows that need to be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub start_index: usize,
    pub stop_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub key: String,
    pub label: String,
    pub width: f64,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
    pub header_class: &'static str,
    pub content_class: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub select_width: Option<f64>,
    pub columns: Vec<ColumnSlot>,
    pub actions_width: Option<f64>,
}

impl TableLayout {
    pub fn total_width(&self) -> f64 {
        self.select_width.unwrap_or(0.0)
            + self.columns.iter().map(|c| c.width).sum::<f64>()
            + self.actions_width.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoice {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub kind: ActionKind,
    pub label: String,
    pub target: ActionTarget,
    pub disabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub id: String,
    pub cells: Vec<String>,
    /// Badge class per cell; empty for plain cells.
    pub badges: Vec<String>,
    pub selected: bool,
    pub click: Option<ActionTarget>,
    pub actions: Vec<ActionButton>,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub layout: TableLayout,
    pub rows: Vec<RowView>,
    pub row_count: usize,
    pub all_selected: bool,
    pub column_choices: Vec<ColumnChoice>,
    pub scroll_to: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Loading { message: String },
    Empty { message: String },
    Grid(GridView),
}

pub struct DataTable<R> {
    pub entity_name: String,
    columns: Vec<Column<R>>,
    actions: Vec<ItemAction<R>>,
    pub selection: Option<Selection>,
    shown_columns: Option<BTreeSet<String>>,
    pub sort: Option<SortState>,
    pub infinite_scroll: Option<InfiniteScroll>,
    empty_message: String,
    loading_message: String,
    pub text_selectable: bool,
    pub auto_scroll_to_bottom: bool,
}

impl<R: TableRecord> DataTable<R> {
    pub fn new(entity_name: &str, columns: Vec<Column<R>>) -> Self {
        Self {
            entity_name: entity_name.to_string(),
            columns,
            actions: Vec::new(),
            selection: None,
            shown_columns: None,
            sort: None,
            infinite_scroll: None,
            empty_message: String::new(),
            loading_message: "Loading...".to_string(),
            text_selectable: false,
            auto_scroll_to_bottom: false,
        }
    }

    pub fn with_actions(mut self, actions: Vec<ItemAction<R>>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Enables the column selector with the given keys shown.
    pub fn with_columns_selector<I: IntoIterator<Item = String>>(mut self, shown: I) -> Self {
        self.shown_columns = Some(shown.into_iter().collect());
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_infinite_scroll(mut self, records_count: usize) -> Self {
        self.infinite_scroll = Some(InfiniteScroll { records_count });
        self
    }

    pub fn with_empty_message(mut self, message: &str) -> Self {
        self.empty_message = message.to_string();
        self
    }

    pub fn with_loading_message(mut self, message: &str) -> Self {
        self.loading_message = message.to_string();
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn empty_message(&self) -> String {
        if self.empty_message.is_empty() {
            format!("There are no {} yet.", self.entity_name)
        } else {
            self.empty_message.clone()
        }
    }

    pub fn is_column_shown(&self, key: &str) -> bool {
        self.shown_columns.as_ref().is_none_or(|s| s.contains(key))
    }

    /// Shows or hides a column. Columns are only ever hidden from view;
    /// the full definition set is kept.
    pub fn set_column_shown(&mut self, key: &str, shown: bool) {
        if !self.columns.iter().any(|c| c.key == key) {
            return;
        }
        let set = self.shown_columns.get_or_insert_with(|| {
            self.columns.iter().map(|c| c.key.clone()).collect()
        });
        if shown {
            set.insert(key.to_string());
        } else {
            set.remove(key);
        }
    }

    pub fn column_choices(&self) -> Vec<ColumnChoice> {
        if self.shown_columns.is_none() {
            return Vec::new();
        }
        self.columns
            .iter()
            .map(|c| ColumnChoice {
                key: c.key.clone(),
                label: c.label.clone(),
                checked: self.is_column_shown(&c.key),
            })
            .collect()
    }

    /// Makes `key` the sort column, or flips direction when it already is.
    /// Returns false for unknown or non-sortable columns.
    pub fn trigger_sort(&mut self, key: &str) -> bool {
        if !self.columns.iter().any(|c| c.key == key && c.enable_sort) {
            return false;
        }
        self.sort = Some(match self.sort.take() {
            Some(s) if s.column == key => SortState {
                column: s.column,
                direction: s.direction.flip(),
            },
            _ => SortState {
                column: key.to_string(),
                direction: SortDirection::Asc,
            },
        });
        true
    }

    /// Orders records by the current sort column's value.
    pub fn sort_records(&self, records: &mut [R]) {
        let Some(sort) = &self.sort else {
            return;
        };
        let Some(column) = self.columns.iter().find(|c| c.key == sort.column) else {
            return;
        };
        records.sort_by(|a, b| {
            let ord = compare_values(&column.value(a), &column.value(b));
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    fn view_action(&self) -> Option<&ItemAction<R>> {
        self.actions.iter().find(|a| a.kind == ActionKind::View)
    }

    fn button_actions(&self) -> impl Iterator<Item = &ItemAction<R>> {
        self.actions.iter().filter(|a| a.kind != ActionKind::View)
    }

    fn has_actions_column(&self) -> bool {
        self.actions.len() > 1 || (self.actions.len() == 1 && self.actions[0].kind != ActionKind::View)
    }

    pub fn actions_width(container_width: f64, total_actions: usize) -> f64 {
        let size = total_actions as f64 * ACTION_BUTTON_WIDTH + ACTIONS_PADDING;
        if size < MIN_ACTIONS_WIDTH {
            return MIN_ACTIONS_WIDTH;
        }
        if size > container_width {
            return container_width;
        }
        size
    }

    /// Width shared by each visible column that has no explicit width.
    fn rest_width(&self, container_width: f64, select: bool, actions_width: Option<f64>) -> f64 {
        let mut free = container_width;
        if select {
            free -= SELECT_WIDTH;
        }
        if let Some(w) = actions_width {
            free -= w;
        }
        let mut unsized_columns = 0usize;
        for c in self.columns.iter().filter(|c| self.is_column_shown(&c.key)) {
            match c.width {
                Some(w) => free -= w,
                None => unsized_columns += 1,
            }
        }
        if unsized_columns == 0 {
            return 0.0;
        }
        (free / unsized_columns as f64).max(0.0)
    }

    pub fn layout(&self, container_width: f64) -> TableLayout {
        let select = self.selection.is_some();
        let actions_width = self
            .has_actions_column()
            .then(|| Self::actions_width(container_width, self.button_actions().count()));
        let rest = self.rest_width(container_width, select, actions_width);

        let columns = self
            .columns
            .iter()
            .filter(|c| self.is_column_shown(&c.key))
            .map(|c| ColumnSlot {
                key: c.key.clone(),
                label: c.label.clone(),
                width: c.width.unwrap_or(rest),
                sortable: c.enable_sort,
                sorted: self
                    .sort
                    .as_ref()
                    .filter(|s| s.column == c.key)
                    .map(|s| s.direction),
                header_class: c.header_align.css_class(),
                content_class: c.content_align.css_class(),
            })
            .collect();

        TableLayout {
            select_width: select.then_some(SELECT_WIDTH),
            columns,
            actions_width,
        }
    }

    fn row_view(&self, index: usize, record: &R) -> RowView {
        let id = record.record_id();
        let selected = self.selection.as_ref().is_some_and(|s| s.is_selected(&id));

        let view = self.view_action();
        let click = view
            .filter(|v| !v.is_disabled(record))
            .map(|v| v.target.for_record(&id));

        let actions = if self.has_actions_column() {
            self.button_actions()
                .map(|a| ActionButton {
                    kind: a.kind,
                    label: a.label.clone(),
                    target: a.target.for_record(&id),
                    disabled: a.is_disabled(record),
                    loading: a.is_loading(record),
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut class = String::from("rowLine");
        if view.is_some() {
            class.push_str(" canClick");
        } else if self.text_selectable {
            class.push_str(" canSelectText");
        }

        let shown: Vec<&Column<R>> = self
            .columns
            .iter()
            .filter(|c| self.is_column_shown(&c.key))
            .collect();

        RowView {
            index,
            cells: shown.iter().map(|c| c.cell(record)).collect(),
            badges: shown.iter().map(|c| c.badge_class(record)).collect(),
            id,
            selected,
            click,
            actions,
            class,
        }
    }

    pub fn render(&self, records: &[R], loading: bool, container_width: f64) -> TableView {
        self.render_window(records, loading, container_width, 0..records.len())
    }

    /// Renders only the rows in `window`; the rest exist but are off screen.
    pub fn render_window(
        &self,
        records: &[R],
        loading: bool,
        container_width: f64,
        window: Range<usize>,
    ) -> TableView {
        if loading {
            return TableView::Loading {
                message: self.loading_message.clone(),
            };
        }
        if records.is_empty() {
            return TableView::Empty {
                message: self.empty_message(),
            };
        }

        let end = window.end.min(records.len());
        let start = window.start.min(end);
        let rows = records[start..end]
            .iter()
            .enumerate()
            .map(|(i, r)| self.row_view(start + i, r))
            .collect();

        TableView::Grid(GridView {
            layout: self.layout(container_width),
            rows,
            row_count: self
                .infinite_scroll
                .map(|s| s.records_count)
                .unwrap_or(records.len()),
            all_selected: self
                .selection
                .as_ref()
                .is_some_and(|s| s.all_selected(records.len())),
            column_choices: self.column_choices(),
            scroll_to: self
                .auto_scroll_to_bottom
                .then(|| records.len().saturating_sub(1)),
        })
    }

    pub fn is_row_loaded(index: usize, loaded: usize) -> bool {
        index < loaded
    }

    /// Rows inside `visible` that are not loaded yet, bounded by the
    /// configured record count.
    pub fn rows_to_load(&self, visible: Range<usize>, loaded: usize) -> Option<LoadRequest> {
        let total = self.infinite_scroll?.records_count;
        let end = visible.end.min(total);
        let start = visible.start.max(loaded);
        if start >= end {
            return None;
        }
        Some(LoadRequest {
            start_index: start,
            stop_index: end - 1,
        })
    }
}

/// Rows to render for a scroll position, including overscan on both sides.
pub fn visible_rows(scroll_top: u32, viewport_height: u32, total: usize) -> Range<usize> {
    if total == 0 {
        return 0..0;
    }
    let first = (scroll_top / ROW_HEIGHT) as usize;
    let count = viewport_height.div_ceil(ROW_HEIGHT) as usize;
    let start = first.saturating_sub(OVERSCAN_ROWS).min(total);
    let end = (first + count + OVERSCAN_ROWS).min(total);
    start..end.max(start)
}

// Numbers compare numerically so that "10" sorts after "9".
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        name: String,
        size: u64,
        locked: bool,
    }

    impl TableRecord for Item {
        fn record_id(&self) -> String {
            self.name.clone()
        }
    }

    fn item(name: &str, size: u64) -> Item {
        Item {
            name: name.to_string(),
            size,
            locked: false,
        }
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column::new("Name", "name", |i: &Item| i.name.clone()).sortable(),
            Column::new("Size", "size", |i: &Item| i.size.to_string())
                .width(100.0)
                .sortable(),
            Column::new("Status", "status", |i: &Item| {
                (if i.locked { "locked" } else { "open" }).to_string()
            }),
        ]
    }

    fn sum_close(layout: &TableLayout, expected: f64) {
        assert!(
            (layout.total_width() - expected).abs() < 0.01,
            "widths sum to {} not {}",
            layout.total_width(),
            expected
        );
    }

    #[test]
    fn test_unsized_columns_share_remaining_width() {
        let table = DataTable::new("items", columns());
        let layout = table.layout(1000.0);
        assert_eq!(layout.select_width, None);
        assert_eq!(layout.actions_width, None);
        assert_eq!(layout.columns[0].width, 450.0);
        assert_eq!(layout.columns[1].width, 100.0);
        assert_eq!(layout.columns[2].width, 450.0);
        sum_close(&layout, 1000.0);
    }

    #[test]
    fn test_widths_fill_container_for_all_feature_combinations() {
        for width in [320.0, 777.5, 1200.0, 1920.0] {
            for select in [false, true] {
                for n_actions in 0..4 {
                    let mut actions = vec![ItemAction::view("/ui/items")];
                    for _ in 0..n_actions {
                        actions.push(ItemAction::new(
                            ActionKind::Delete,
                            "Delete",
                            ActionTarget::Submit("/ui/items/delete".to_string()),
                        ));
                    }
                    let mut table = DataTable::new("items", columns()).with_actions(actions);
                    if select {
                        table = table.with_selection(Selection::default());
                    }
                    sum_close(&table.layout(width), width);
                }
            }
        }
    }

    #[test]
    fn test_actions_column_width_rules() {
        assert_eq!(DataTable::<Item>::actions_width(1000.0, 0), 80.0);
        assert_eq!(DataTable::<Item>::actions_width(1000.0, 1), 80.0);
        assert_eq!(DataTable::<Item>::actions_width(1000.0, 3), 150.0);
        assert_eq!(DataTable::<Item>::actions_width(100.0, 3), 100.0);

        // A lone view action makes rows clickable but adds no column.
        let table = DataTable::new("items", columns()).with_actions(vec![ItemAction::view("/x")]);
        assert_eq!(table.layout(1000.0).actions_width, None);

        let table = DataTable::new("items", columns())
            .with_actions(vec![
                ItemAction::view("/x"),
                ItemAction::new(ActionKind::Edit, "Edit", ActionTarget::Link("/e".to_string())),
            ])
            .with_selection(Selection::default());
        let layout = table.layout(1000.0);
        assert_eq!(layout.select_width, Some(45.0));
        assert_eq!(layout.actions_width, Some(80.0));
        assert_eq!(layout.columns[0].width, (1000.0 - 45.0 - 80.0 - 100.0) / 2.0);
    }

    #[test]
    fn test_hidden_columns_take_no_space() {
        let mut table = DataTable::new("items", columns())
            .with_columns_selector(vec!["name".to_string(), "size".to_string()]);
        let layout = table.layout(600.0);
        assert_eq!(layout.columns.len(), 2);
        assert_eq!(layout.columns[0].width, 500.0);
        sum_close(&layout, 600.0);

        table.set_column_shown("status", true);
        table.set_column_shown("name", false);
        table.set_column_shown("unknown", true);
        let keys: Vec<_> = table.layout(600.0).columns.into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["size", "status"]);
        assert_eq!(table.columns().len(), 3);

        let choices = table.column_choices();
        assert_eq!(choices.len(), 3);
        assert!(!choices[0].checked);
        assert!(choices[2].checked);
    }

    #[test]
    fn test_empty_and_loading_states() {
        let table = DataTable::<Item>::new("tenants", columns());
        assert_eq!(
            table.render(&[], false, 800.0),
            TableView::Empty {
                message: "There are no tenants yet.".to_string()
            }
        );

        let table = table.with_empty_message("No drives found. Is DirectPV installed?");
        assert_eq!(
            table.render(&[], false, 800.0),
            TableView::Empty {
                message: "No drives found. Is DirectPV installed?".to_string()
            }
        );
        assert_eq!(
            table.render(&[item("a", 1)], true, 800.0),
            TableView::Loading {
                message: "Loading...".to_string()
            }
        );
    }

    #[test]
    fn test_rows_actions_and_click_targets() {
        let table = DataTable::new("items", columns())
            .with_actions(vec![
                ItemAction::view("/ui/items/").disabled_when(|i: &Item| i.locked),
                ItemAction::new(
                    ActionKind::Delete,
                    "Delete",
                    ActionTarget::Submit("/ui/items/delete".to_string()),
                )
                .disabled_when(|i: &Item| i.locked)
                .loading_when(|i: &Item| i.size == 0),
            ])
            .with_selection(Selection::default().with_selected(vec!["b".to_string()]));

        let mut locked = item("b", 0);
        locked.locked = true;
        let records = vec![item("a", 10), locked];

        let TableView::Grid(grid) = table.render(&records, false, 1000.0) else {
            panic!("expected grid");
        };
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0].cells, vec!["a", "10", "open"]);
        assert_eq!(
            grid.rows[0].click,
            Some(ActionTarget::Link("/ui/items/a".to_string()))
        );
        assert_eq!(grid.rows[0].class, "rowLine canClick");
        assert!(!grid.rows[0].selected);
        assert_eq!(grid.rows[0].actions.len(), 1);
        assert_eq!(grid.rows[0].actions[0].target.url(), "/ui/items/delete/a");
        assert!(grid.rows[0].actions[0].target.is_submit());

        assert_eq!(grid.rows[1].click, None);
        assert!(grid.rows[1].selected);
        assert!(grid.rows[1].actions[0].disabled);
        assert!(grid.rows[1].actions[0].loading);
        assert!(!grid.all_selected);
        assert_eq!(grid.row_count, 2);
    }

    #[test]
    fn test_custom_render_function() {
        let table = DataTable::new(
            "items",
            vec![Column::new("Size", "size", |i: &Item| i.size.to_string())
                .render_with(|v| format!("{} B", v))
                .align(Align::Right)],
        );
        let TableView::Grid(grid) = table.render(&[item("a", 7)], false, 300.0) else {
            panic!("expected grid");
        };
        assert_eq!(grid.rows[0].cells, vec!["7 B"]);
        assert_eq!(grid.layout.columns[0].content_class, "text-right");
    }

    #[test]
    fn test_badge_class_per_record() {
        let table = DataTable::new(
            "items",
            vec![
                Column::new("Name", "name", |i: &Item| i.name.clone()),
                Column::new("State", "state", |i: &Item| {
                    if i.locked { "locked" } else { "open" }.to_string()
                })
                .badge(|i: &Item| {
                    if i.locked { "badge-error" } else { "badge-success" }.to_string()
                }),
            ],
        );
        let mut locked = item("b", 1);
        locked.locked = true;
        let TableView::Grid(grid) = table.render(&[item("a", 1), locked], false, 300.0) else {
            panic!("expected grid");
        };
        assert_eq!(grid.rows[0].badges, vec!["", "badge-success"]);
        assert_eq!(grid.rows[1].badges, vec!["", "badge-error"]);
    }

    #[test]
    fn test_selection_modes() {
        let mut s = Selection::new(SelectionMode::Checkbox);
        s.toggle("a");
        s.toggle("b");
        s.toggle("a");
        assert_eq!(s.ids().cloned().collect::<Vec<_>>(), vec!["b"]);

        s.toggle_all(vec!["a".to_string(), "b".to_string()]);
        assert!(s.all_selected(2));
        s.toggle_all(vec!["a".to_string(), "b".to_string()]);
        assert!(s.is_empty());

        let mut r = Selection::new(SelectionMode::Radio);
        r.toggle("a");
        r.toggle("b");
        assert!(r.is_selected("b"));
        assert_eq!(r.len(), 1);
        r.toggle("b");
        assert!(r.is_empty());
    }

    #[test]
    fn test_sort_trigger_and_order() {
        let mut table = DataTable::new("items", columns());
        assert!(!table.trigger_sort("status"));
        assert!(table.sort.is_none());

        assert!(table.trigger_sort("size"));
        let mut records = vec![item("c", 10), item("a", 9), item("b", 100)];
        table.sort_records(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);

        assert!(table.trigger_sort("size"));
        assert_eq!(table.sort.as_ref().map(|s| s.direction), Some(SortDirection::Desc));
        table.sort_records(&mut records);
        assert_eq!(records[0].name, "b");

        assert!(table.trigger_sort("name"));
        assert_eq!(
            table.sort,
            Some(SortState {
                column: "name".to_string(),
                direction: SortDirection::Asc
            })
        );
        let layout = table.layout(500.0);
        assert_eq!(layout.columns[0].sorted, Some(SortDirection::Asc));
        assert_eq!(layout.columns[1].sorted, None);
    }

    #[test]
    fn test_visible_rows_window() {
        assert_eq!(visible_rows(0, 400, 0), 0..0);
        assert_eq!(visible_rows(0, 400, 1000), 0..20);
        assert_eq!(visible_rows(4000, 400, 1000), 90..120);
        assert_eq!(visible_rows(39_000, 400, 1000), 965..995);
        assert_eq!(visible_rows(39_600, 400, 1000), 980..1000);
        assert_eq!(visible_rows(100_000, 400, 1000), 1000..1000);
        assert_eq!(visible_rows(0, 400, 5), 0..5);
    }

    #[test]
    fn test_infinite_scroll_requests_missing_rows() {
        let table = DataTable::<Item>::new("items", columns()).with_infinite_scroll(250);
        assert!(DataTable::<Item>::is_row_loaded(99, 100));
        assert!(!DataTable::<Item>::is_row_loaded(100, 100));
        assert_eq!(table.rows_to_load(0..50, 100), None);
        assert_eq!(
            table.rows_to_load(90..130, 100),
            Some(LoadRequest {
                start_index: 100,
                stop_index: 129
            })
        );
        assert_eq!(
            table.rows_to_load(240..300, 100),
            Some(LoadRequest {
                start_index: 240,
                stop_index: 249
            })
        );
        assert_eq!(table.rows_to_load(240..300, 250), None);

        let plain = DataTable::<Item>::new("items", columns());
        assert_eq!(plain.rows_to_load(0..50, 10), None);
    }

    #[test]
    fn test_render_window_and_scroll_to_bottom() {
        let mut table = DataTable::new("items", columns()).with_infinite_scroll(500);
        table.auto_scroll_to_bottom = true;
        let records: Vec<Item> = (0..30).map(|i| item(&format!("i{}", i), i)).collect();
        let TableView::Grid(grid) = table.render_window(&records, false, 900.0, 10..60) else {
            panic!("expected grid");
        };
        assert_eq!(grid.rows.len(), 20);
        assert_eq!(grid.rows[0].index, 10);
        assert_eq!(grid.rows[0].id, "i10");
        assert_eq!(grid.row_count, 500);
        assert_eq!(grid.scroll_to, Some(29));
    }
}
