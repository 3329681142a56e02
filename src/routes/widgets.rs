//! HTML rendering of a [`TableView`] into the `partials/table.html` fragment
//! that page templates embed.

use askama::Template;
use std::ops::Range;

use crate::components::table::{
    visible_rows, ColumnChoice, GridView, SelectionMode, SortDirection, TableView, ROW_HEIGHT,
};

/// Page path plus the query string that reproduces the table's state.
#[derive(Debug, Clone, Default)]
pub struct TableLinks {
    pub path: String,
    pub state: String,
}

impl TableLinks {
    pub fn new(path: &str, state: String) -> Self {
        Self {
            path: path.to_string(),
            state,
        }
    }

    pub fn href(&self, extra: &str) -> String {
        match (self.state.is_empty(), extra.is_empty()) {
            (true, true) => self.path.clone(),
            (true, false) => format!("{}?{}", self.path, extra),
            (false, true) => format!("{}?{}", self.path, self.state),
            (false, false) => format!("{}?{}&{}", self.path, self.state, extra),
        }
    }

    /// Key/value pairs of the state, for hidden inputs in GET forms.
    fn hidden_state(&self) -> Vec<(String, String)> {
        self.state
            .split('&')
            .filter_map(|kv| kv.split_once('='))
            .filter(|(k, _)| *k != "cols")
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Previous/next links over the rendered row window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pager {
    pub prev_href: String,
    pub next_href: String,
    pub label: String,
}

/// Window of rows to render for a scroll offset of `top` pixels, and
/// the links that move it by one viewport.
/// Offsets past the end are pulled back to the last full viewport.
pub fn window(links: &TableLinks, top: u32, viewport_height: u32, total: usize) -> (Range<usize>, Pager) {
    let rows_height = u32::try_from(total)
        .unwrap_or(u32::MAX)
        .saturating_mul(ROW_HEIGHT);
    let top = top.min(rows_height.saturating_sub(viewport_height));
    let range = visible_rows(top, viewport_height, total);
    let mut pager = Pager::default();
    if range.is_empty() {
        return (range, pager);
    }
    pager.label = format!("Rows {} to {} of {}", range.start + 1, range.end, total);
    if top > 0 {
        pager.prev_href = links.href(&format!("top={}", top.saturating_sub(viewport_height)));
    }
    let next_top = top.saturating_add(viewport_height);
    if ((next_top / ROW_HEIGHT) as usize) < total {
        pager.next_href = links.href(&format!("top={}", next_top));
    }
    (range, pager)
}

struct HeaderCell {
    label: String,
    width: String,
    class: &'static str,
    href: String,
    indicator: &'static str,
}

struct CellView {
    text: String,
    class: &'static str,
    badge: String,
}

struct ActionView {
    label: String,
    kind: &'static str,
    url: String,
    submit: bool,
    disabled: bool,
    loading: bool,
}

struct RowCells {
    index: usize,
    id: String,
    class: String,
    selected: bool,
    click_href: String,
    cells: Vec<CellView>,
    actions: Vec<ActionView>,
}

#[derive(Template)]
#[template(path = "partials/table.html")]
struct TableTemplate {
    state: &'static str,
    message: String,
    total_width: String,
    select_width: String,
    radio: bool,
    select_all: bool,
    all_selected: bool,
    headers: Vec<HeaderCell>,
    actions_width: String,
    rows: Vec<RowCells>,
    column_choices: Vec<ColumnChoice>,
    columns_action: String,
    hidden_state: Vec<(String, String)>,
    scroll_to: String,
    pager: Pager,
}

fn px(width: f64) -> String {
    format!("{:.2}px", width)
}

fn grid_template(grid: &GridView, links: &TableLinks, mode: SelectionMode, select_all: bool, pager: Pager) -> TableTemplate {
    let layout = &grid.layout;
    let headers = layout
        .columns
        .iter()
        .map(|c| HeaderCell {
            label: c.label.clone(),
            width: px(c.width),
            class: c.header_class,
            href: if c.sortable {
                links.href(&format!("click={}", c.key))
            } else {
                String::new()
            },
            indicator: match c.sorted {
                Some(SortDirection::Asc) => "▲",
                Some(SortDirection::Desc) => "▼",
                None => "",
            },
        })
        .collect();

    let rows = grid
        .rows
        .iter()
        .map(|r| RowCells {
            index: r.index,
            id: r.id.clone(),
            class: r.class.clone(),
            selected: r.selected,
            click_href: r
                .click
                .as_ref()
                .filter(|c| !c.is_submit())
                .map(|c| c.url().to_string())
                .unwrap_or_default(),
            cells: r
                .cells
                .iter()
                .zip(&layout.columns)
                .zip(&r.badges)
                .map(|((text, slot), badge)| CellView {
                    text: text.clone(),
                    class: slot.content_class,
                    badge: badge.clone(),
                })
                .collect(),
            actions: r
                .actions
                .iter()
                .map(|a| ActionView {
                    label: a.label.clone(),
                    kind: a.kind.as_str(),
                    url: a.target.url().to_string(),
                    submit: a.target.is_submit(),
                    disabled: a.disabled,
                    loading: a.loading,
                })
                .collect(),
        })
        .collect();

    TableTemplate {
        state: "grid",
        message: String::new(),
        total_width: px(layout.total_width()),
        select_width: layout.select_width.map(px).unwrap_or_default(),
        radio: mode == SelectionMode::Radio,
        select_all,
        all_selected: grid.all_selected,
        headers,
        actions_width: layout.actions_width.map(px).unwrap_or_default(),
        rows,
        column_choices: grid.column_choices.clone(),
        columns_action: links.path.clone(),
        hidden_state: links.hidden_state(),
        scroll_to: grid
            .scroll_to
            .map(|i| format!("row-{}", i))
            .unwrap_or_default(),
        pager,
    }
}

/// Renders a table view to an HTML fragment.
pub fn render_table(
    view: &TableView,
    links: &TableLinks,
    selection: Option<(SelectionMode, bool)>,
    pager: Option<Pager>,
) -> String {
    let (state, message) = match view {
        TableView::Loading { message } => ("loading", message.clone()),
        TableView::Empty { message } => ("empty", message.clone()),
        TableView::Grid(_) => ("grid", String::new()),
    };
    let tmpl = match view {
        TableView::Grid(grid) => {
            let (mode, select_all) = selection.unwrap_or_default();
            grid_template(grid, links, mode, select_all, pager.unwrap_or_default())
        }
        _ => TableTemplate {
            state,
            message,
            total_width: String::new(),
            select_width: String::new(),
            radio: false,
            select_all: false,
            all_selected: false,
            headers: Vec::new(),
            actions_width: String::new(),
            rows: Vec::new(),
            column_choices: Vec::new(),
            columns_action: String::new(),
            hidden_state: Vec::new(),
            scroll_to: String::new(),
            pager: Pager::default(),
        },
    };
    match tmpl.render() {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("table template error: {}", e);
            "<div class=\"alert alert-error\">Table could not be rendered.</div>".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::table::{Column, DataTable, ItemAction, TableRecord};

    struct Row(&'static str);

    impl TableRecord for Row {
        fn record_id(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_links() {
        let links = TableLinks::new("/ui/tenants", "sort=name&dir=ASC&cols=name".to_string());
        assert_eq!(links.href("top=40"), "/ui/tenants?sort=name&dir=ASC&cols=name&top=40");
        assert_eq!(
            links.hidden_state(),
            vec![
                ("sort".to_string(), "name".to_string()),
                ("dir".to_string(), "ASC".to_string())
            ]
        );
        assert_eq!(TableLinks::new("/ui/pvcs", String::new()).href(""), "/ui/pvcs");
    }

    #[test]
    fn test_window_links() {
        let links = TableLinks::new("/ui/tenants", String::new());
        let (range, pager) = window(&links, 0, 400, 100);
        assert_eq!(range, 0..20);
        assert!(pager.prev_href.is_empty());
        assert_eq!(pager.next_href, "/ui/tenants?top=400");
        assert_eq!(pager.label, "Rows 1 to 20 of 100");

        let (range, pager) = window(&links, 3600, 400, 100);
        assert_eq!(range, 80..100);
        assert_eq!(pager.prev_href, "/ui/tenants?top=3200");
        assert!(pager.next_href.is_empty());

        let (range, pager) = window(&links, 0, 400, 0);
        assert!(range.is_empty());
        assert!(pager.label.is_empty());
    }

    #[test]
    fn test_window_offset_past_the_end() {
        let links = TableLinks::new("/ui/tenants", String::new());
        let (range, pager) = window(&links, 100_000, 400, 10);
        assert_eq!(range, 0..10);
        assert_eq!(pager.label, "Rows 1 to 10 of 10");
        assert!(pager.prev_href.is_empty());
        assert!(pager.next_href.is_empty());

        let (range, pager) = window(&links, 100_000, 400, 100);
        assert_eq!(range, 80..100);
        assert_eq!(pager.label, "Rows 81 to 100 of 100");
        assert_eq!(pager.prev_href, "/ui/tenants?top=3200");
    }

    #[test]
    fn test_render_empty_and_grid() {
        let table = DataTable::new("rows", vec![Column::new("Id", "id", |r: &Row| r.0.to_string())])
            .with_actions(vec![ItemAction::view("/ui/rows")]);
        let links = TableLinks::new("/ui/rows", String::new());

        let html = render_table(&table.render(&[], false, 600.0), &links, None, None);
        assert!(html.contains("There are no rows yet."));

        let html = render_table(&table.render(&[Row("alpha")], false, 600.0), &links, None, None);
        assert!(html.contains("alpha"));
        assert!(html.contains("canClick"));
        assert!(!html.contains("There are no rows yet."));
    }

    #[test]
    fn test_render_badge_cells() {
        let table = DataTable::new(
            "rows",
            vec![Column::new("Id", "id", |r: &Row| r.0.to_string()).badge(|_| "badge-success".to_string())],
        );
        let links = TableLinks::new("/ui/rows", String::new());
        let html = render_table(&table.render(&[Row("green")], false, 600.0), &links, None, None);
        assert!(html.contains("badge badge-success"));
    }
}
