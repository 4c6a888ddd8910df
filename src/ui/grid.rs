use dioxus::prelude::{Key, Modifiers, *};

use crate::state::columns::Column;
use crate::state::data_model::{self, Record};
use crate::state::surface::{GridSurface, SortDirection};

#[derive(Clone, PartialEq)]
struct EditingCell {
    row: usize,
    col: usize,
    draft: String,
}

#[component]
pub fn Grid(
    surface: Signal<GridSurface>,
    show_filters: Signal<bool>,
    selected_row: Signal<Option<usize>>,
    selected_column: Signal<Option<String>>,
) -> Element {
    let editing = use_signal::<Option<EditingCell>>(|| None);
    let snapshot = surface.read().clone();
    let columns = snapshot.columns();
    let visible_rows = snapshot.visible_row_indices();
    let row_count = snapshot.row_count();
    let search_query = snapshot.search_query().to_string();
    let match_count = snapshot.search_results().len();
    let sort_spec = snapshot.sort_spec().cloned();
    let filters_visible = *show_filters.read();

    rsx! {
        if snapshot.search_open() {
            div { class: "search-bar", id: "search-bar",
                input {
                    class: "search-input",
                    id: "input-search",
                    placeholder: "Search all cells...",
                    value: "{search_query}",
                    autofocus: true,
                    oninput: move |evt| {
                        let query = evt.value();
                        surface.with_mut(|s| s.set_search_query(&query));
                    },
                    onkeydown: move |evt| {
                        if evt.key() == Key::Escape {
                            surface.with_mut(|s| s.close_search());
                        }
                    }
                }
                span { class: "search-count", "{match_count} matches" }
                button {
                    class: "search-close",
                    id: "btn-close-search",
                    onclick: move |_| {
                        surface.with_mut(|s| s.close_search());
                    },
                    "\u{2715}"
                }
            }
        }
        div {
            class: "grid-container",
            id: "grid-container",
            tabindex: "0",
            onkeydown: move |evt| {
                let ctrl_f = evt.modifiers().contains(Modifiers::CONTROL)
                    && matches!(evt.key(), Key::Character(ref c) if c.eq_ignore_ascii_case("f"));
                if ctrl_f {
                    evt.prevent_default();
                    surface.with_mut(|s| s.open_search());
                }
            },
            table {
                thead {
                    tr {
                        th { class: "row-number", "#" }
                        for (col_idx, col) in columns.iter().cloned().enumerate() {
                            GridHeader {
                                col_idx,
                                column: col,
                                sorted: sort_class(&sort_spec, &columns[col_idx]),
                                surface,
                                selected_column,
                            }
                        }
                    }
                    if filters_visible {
                        tr { class: "filter-row",
                            th { class: "row-number" }
                            for col in columns.iter().cloned() {
                                FilterCell { column: col, surface }
                            }
                        }
                    }
                }
                tbody {
                    for view_row in 0..row_count {
                        GridRow {
                            view_row,
                            data_index: visible_rows.get(view_row).copied(),
                            record: visible_rows
                                .get(view_row)
                                .and_then(|&idx| snapshot.data().get(idx))
                                .cloned(),
                            columns: columns.clone(),
                            search_query: search_query.clone(),
                            surface,
                            selected_row,
                            selected_column,
                            editing,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn GridHeader(
    col_idx: usize,
    column: Column,
    sorted: &'static str,
    surface: Signal<GridSurface>,
    selected_column: Signal<Option<String>>,
) -> Element {
    let is_selected = selected_column
        .read()
        .as_ref()
        .map(|id| *id == column.id)
        .unwrap_or(false);
    let mut class = String::from("col-header");
    if column.is_virtual() {
        class.push_str(" virtual-col");
    }
    if is_selected {
        class.push_str(" selected-col");
    }
    if !sorted.is_empty() {
        class.push(' ');
        class.push_str(sorted);
    }

    let column_id = column.id.clone();
    rsx! {
        th {
            class: "{class}",
            id: format!("col-{}", sanitize_id(&column.id)),
            style: "width: {column.width}px; min-width: {column.width}px;",
            onclick: move |_| {
                surface.with_mut(|s| {
                    s.sort_by(&column_id);
                });
                selected_column.set(Some(column_id.clone()));
            },
            "{column.title}"
        }
    }
}

#[component]
fn FilterCell(column: Column, surface: Signal<GridSurface>) -> Element {
    let query = surface
        .read()
        .filter_query(&column.id)
        .unwrap_or("")
        .to_string();
    let column_id = column.id.clone();
    rsx! {
        th { class: "filter-cell",
            input {
                class: "filter-input",
                id: format!("filter-{}", sanitize_id(&column.id)),
                placeholder: "Filter...",
                value: "{query}",
                oninput: move |evt| {
                    let value = evt.value();
                    surface.with_mut(|s| s.set_filter(&column_id, &value));
                }
            }
        }
    }
}

#[component]
fn GridRow(
    view_row: usize,
    data_index: Option<usize>,
    record: Option<Record>,
    columns: Vec<Column>,
    search_query: String,
    surface: Signal<GridSurface>,
    selected_row: Signal<Option<usize>>,
    selected_column: Signal<Option<String>>,
    editing: Signal<Option<EditingCell>>,
) -> Element {
    let is_selected = selected_row
        .read()
        .as_ref()
        .map(|&idx| Some(idx) == data_index)
        .unwrap_or(false);
    let mut row_class = if view_row % 2 == 0 { "even" } else { "odd" }.to_string();
    if data_index.is_none() {
        row_class.push_str(" virtual-row");
    }
    if is_selected {
        row_class.push_str(" selected-row");
    }

    rsx! {
        tr { class: "{row_class}", id: format!("row-{view_row}"),
            td {
                class: "row-number",
                onclick: move |_| {
                    let mut selected_row = selected_row;
                    selected_row.set(data_index);
                },
                "{view_row + 1}"
            }
            for (col_idx, col) in columns.iter().cloned().enumerate() {
                GridCell {
                    view_row,
                    col_idx,
                    display: record
                        .as_ref()
                        .and_then(|r| r.get(&col.id))
                        .map(data_model::display_value)
                        .unwrap_or_default(),
                    column: col,
                    search_query: search_query.clone(),
                    surface,
                    selected_column,
                    editing,
                }
            }
        }
    }
}

#[component]
fn GridCell(
    view_row: usize,
    col_idx: usize,
    display: String,
    column: Column,
    search_query: String,
    surface: Signal<GridSurface>,
    selected_column: Signal<Option<String>>,
    editing: Signal<Option<EditingCell>>,
) -> Element {
    let is_editing = editing
        .read()
        .as_ref()
        .map(|cell| cell.row == view_row && cell.col == col_idx)
        .unwrap_or(false);

    if is_editing {
        return rsx! {
            td { class: "editing-cell",
                input {
                    class: "cell-input",
                    id: format!("cell-input-{view_row}-{col_idx}"),
                    value: "{editing.read().as_ref().map(|cell| cell.draft.clone()).unwrap_or_default()}",
                    autofocus: true,
                    oninput: move |evt| {
                        let value = evt.value();
                        let mut editing = editing;
                        editing.with_mut(|cell| {
                            if let Some(cell) = cell {
                                cell.draft = value;
                            }
                        });
                    },
                    onblur: move |_| {
                        commit_edit(surface, editing);
                    },
                    onkeydown: move |evt| {
                        match evt.key() {
                            Key::Enter => commit_edit(surface, editing),
                            Key::Escape => cancel_edit(surface, editing),
                            _ => {}
                        }
                    }
                }
            }
        };
    }

    let mut class = String::from("cell");
    if cell_matches_query(&display, &search_query) {
        class.push_str(" search-match");
    }
    let column_id = column.id.clone();
    let display_for_edit = display.clone();

    rsx! {
        td {
            class: "{class}",
            id: format!("cell-{view_row}-{col_idx}"),
            onclick: move |_| {
                let mut selected_column = selected_column;
                selected_column.set(Some(column_id.clone()));
                surface.with_mut(|s| s.begin_edit(view_row, col_idx));
                let mut editing = editing;
                editing.set(Some(EditingCell {
                    row: view_row,
                    col: col_idx,
                    draft: display_for_edit.clone(),
                }));
            },
            "{display}"
        }
    }
}

fn commit_edit(mut surface: Signal<GridSurface>, mut editing: Signal<Option<EditingCell>>) {
    let edit = editing.read().as_ref().cloned();
    if let Some(edit) = edit {
        surface.with_mut(|s| {
            s.commit_edit(&edit.draft);
        });
    }
    editing.set(None);
}

fn cancel_edit(mut surface: Signal<GridSurface>, mut editing: Signal<Option<EditingCell>>) {
    surface.with_mut(|s| s.cancel_edit());
    editing.set(None);
}

fn sort_class(
    sort_spec: &Option<crate::state::surface::SortSpec>,
    column: &Column,
) -> &'static str {
    match sort_spec.as_ref() {
        Some(spec) if spec.column == column.id => match spec.direction {
            SortDirection::Asc => "sorted-asc",
            SortDirection::Desc => "sorted-desc",
        },
        _ => "",
    }
}

fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn cell_matches_query(display: &str, query: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    display
        .to_ascii_lowercase()
        .contains(&query.trim().to_ascii_lowercase())
}
