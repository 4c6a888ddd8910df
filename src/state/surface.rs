use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::state::columns::{self, Column};
use crate::state::data_model::{self, Dataset};
use crate::state::history::History;

/// Floors that keep the grid looking like a full spreadsheet even when the
/// dataset is small.
pub const MIN_VISIBLE_ROWS: usize = 50;
pub const MIN_VISIBLE_COLS: usize = 10;
/// Hard limits bounding render cost, Excel-style.
pub const MAX_ROWS: usize = 100_000;
pub const MAX_COLS: usize = 1_000;

const MIN_COLUMN_WIDTH: u32 = 50;
const MAX_COLUMN_WIDTH: u32 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Cell activation state: the grid is either idle or editing exactly one
/// cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        row: usize,
        col: usize,
    },
}

/// What the grid widget needs to paint one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellContent {
    pub value: Value,
    pub display: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvisoryKind {
    EmptyValue,
    NumericString,
    DateString,
}

impl fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue => write!(f, "Empty value"),
            Self::NumericString => {
                write!(f, "Numeric string (consider converting to number)")
            }
            Self::DateString => write!(f, "Date string (consider converting to date)"),
        }
    }
}

/// Advisory finding from the on-demand validation pass. Never blocks edits.
#[derive(Clone, Debug, PartialEq)]
pub struct CellAdvisory {
    pub row: usize,
    pub column: String,
    pub kind: AdvisoryKind,
}

/// Presents a dataset as a two-dimensional editable surface: synthesizes
/// virtual rows/columns, translates widget events into dataset operations,
/// and keeps per-key widths, filters, sort, search and history state.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSurface {
    data: Dataset,
    read_only: bool,
    widths: BTreeMap<String, u32>,
    filters: BTreeMap<String, String>,
    sort: Option<SortSpec>,
    search_open: bool,
    search_query: String,
    search_results: Vec<(usize, usize)>,
    edit: EditState,
    history: History,
    // Column-major mirror of the render dataset, backing fill events.
    fill_buffer: Vec<Vec<Value>>,
}

impl Default for GridSurface {
    fn default() -> Self {
        Self::new(Dataset::new())
    }
}

impl GridSurface {
    pub fn new(data: Dataset) -> Self {
        let history = History::new(data.clone());
        let mut surface = Self {
            data,
            read_only: false,
            widths: BTreeMap::new(),
            filters: BTreeMap::new(),
            sort: None,
            search_open: false,
            search_query: String::new(),
            search_results: Vec::new(),
            edit: EditState::Idle,
            history,
            fill_buffer: Vec::new(),
        };
        surface.sync_fill_buffer();
        surface
    }

    pub fn read_only(data: Dataset) -> Self {
        let mut surface = Self::new(data);
        surface.read_only = true;
        surface
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The render dataset, including rows padded in by virtual-row writes.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// The dataset callers persist: entirely-empty rows dropped.
    pub fn persisted(&self) -> Dataset {
        data_model::drop_empty_records(&self.data)
    }

    /// Swaps in a new dataset, resetting history and all view state.
    pub fn replace_data(&mut self, data: Dataset) {
        self.history = History::new(data.clone());
        self.data = data;
        self.filters.clear();
        self.sort = None;
        self.search_open = false;
        self.search_query.clear();
        self.search_results.clear();
        self.edit = EditState::Idle;
        self.sync_fill_buffer();
    }

    // ---- columns and rows ----

    /// Real columns from the key union plus virtual columns padding the grid
    /// to its minimum visible width, capped at `MAX_COLS`.
    pub fn columns(&self) -> Vec<Column> {
        let mut cols = columns::build_columns(&self.data);
        cols.truncate(MAX_COLS);
        let total = (cols.len() + MIN_VISIBLE_COLS).min(MAX_COLS);
        for index in cols.len()..total {
            cols.push(Column::virtual_at(index));
        }
        for col in &mut cols {
            if let Some(width) = self.widths.get(&col.id) {
                col.width = *width;
            }
        }
        cols
    }

    /// Apparent row count: the filtered view plus the virtual-row floor,
    /// capped at `MAX_ROWS`.
    pub fn row_count(&self) -> usize {
        (self.visible_row_indices().len() + MIN_VISIBLE_ROWS)
            .max(MIN_VISIBLE_ROWS)
            .min(MAX_ROWS)
    }

    /// Resolves cell content lazily; virtual and out-of-range positions
    /// render empty.
    pub fn cell_content(&self, row: usize, col: usize) -> CellContent {
        if row >= MAX_ROWS {
            return CellContent {
                value: Value::Null,
                display: String::new(),
            };
        }

        let cols = self.columns();
        let Some(column) = cols.get(col) else {
            return CellContent {
                value: Value::Null,
                display: String::new(),
            };
        };

        let value = self
            .visible_row_indices()
            .get(row)
            .map(|&idx| data_model::value_at(&self.data, idx, &column.id))
            .unwrap_or(Value::Null);
        let display = data_model::display_value(&value);
        CellContent { value, display }
    }

    // ---- editing ----

    /// Commits a typed value at a view coordinate. No-op (returning `None`)
    /// in read-only mode or when the column index is out of range. On
    /// success the filtered dataset is snapshotted into history and returned
    /// for persistence.
    pub fn apply_edit(&mut self, row: usize, col: usize, value: Value) -> Option<Dataset> {
        if self.read_only || row >= MAX_ROWS {
            return None;
        }
        let cols = self.columns();
        let column = cols.get(col)?;
        let target_row = self.resolve_row(row);

        let write = data_model::set_cell(&self.data, target_row, &column.id, value);
        self.data = write.render;
        self.history.push(write.persisted.clone());
        self.sync_fill_buffer();
        Some(write.persisted)
    }

    /// Fill-pattern events share the edit contract but route through the
    /// column-major buffer, one target cell at a time.
    pub fn apply_fill(&mut self, col: usize, row: usize, value: Value) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        if let Some(column) = self.fill_buffer.get_mut(col) {
            while column.len() <= row {
                column.push(Value::Null);
            }
            column[row] = value.clone();
        }
        self.apply_edit(row, col, value)
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Cell activation: Idle -> Editing. Ignored while read-only.
    pub fn begin_edit(&mut self, row: usize, col: usize) {
        if self.read_only {
            return;
        }
        self.edit = EditState::Editing { row, col };
    }

    /// Commit: parses the draft into a typed value, applies it, and returns
    /// to Idle.
    pub fn commit_edit(&mut self, draft: &str) -> Option<Dataset> {
        let EditState::Editing { row, col } = self.edit else {
            return None;
        };
        self.edit = EditState::Idle;
        let value = data_model::parse_cell_input(draft);
        self.apply_edit(row, col, value)
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    // ---- structural operations ----

    /// Appends an empty row. The row only survives persistence once a cell
    /// in it is filled.
    pub fn add_row(&mut self) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        self.data = data_model::add_row(&self.data);
        self.after_structural_change()
    }

    pub fn remove_row(&mut self, index: usize) -> Option<Dataset> {
        if self.read_only || index >= self.data.len() {
            return None;
        }
        self.data = data_model::remove_row(&self.data, index);
        self.after_structural_change()
    }

    /// Adds a column, auto-named `Column N` when no name is given.
    pub fn add_column(&mut self, name: Option<&str>) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        let name = match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => format!("Column {}", self.columns().len() + 1),
        };
        self.data = data_model::add_column(&self.data, &name, Value::String(String::new()));
        self.after_structural_change()
    }

    pub fn remove_column(&mut self, key: &str) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        self.data = data_model::remove_column(&self.data, key);
        self.filters.remove(key);
        self.widths.remove(key);
        self.after_structural_change()
    }

    pub fn clear(&mut self) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        self.data = Dataset::new();
        self.after_structural_change()
    }

    /// Dataset-wide coercion of numeric and boolean strings to typed values.
    pub fn auto_format(&mut self) -> Option<Dataset> {
        if self.read_only {
            return None;
        }
        self.data = self
            .data
            .iter()
            .map(|record| {
                record
                    .iter()
                    .map(|(key, value)| (key.clone(), coerce_string_value(value)))
                    .collect()
            })
            .collect();
        self.after_structural_change()
    }

    // ---- history ----

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Option<Dataset> {
        let data = self.history.undo()?.clone();
        self.data = data.clone();
        self.edit = EditState::Idle;
        self.sync_fill_buffer();
        Some(data)
    }

    pub fn redo(&mut self) -> Option<Dataset> {
        let data = self.history.redo()?.clone();
        self.data = data.clone();
        self.edit = EditState::Idle;
        self.sync_fill_buffer();
        Some(data)
    }

    // ---- widths ----

    /// Remembers a per-key width so it survives dataset changes.
    pub fn resize_column(&mut self, column_id: &str, width: u32) {
        if self.read_only {
            return;
        }
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.widths.insert(column_id.to_string(), width);
    }

    pub fn column_width(&self, column_id: &str) -> u32 {
        self.widths
            .get(column_id)
            .copied()
            .unwrap_or(columns::DEFAULT_COLUMN_WIDTH)
    }

    // ---- filter ----

    /// Per-column substring predicate; predicates combine with AND. An empty
    /// query clears the column's predicate. Never mutates the dataset.
    pub fn set_filter(&mut self, column_id: &str, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.filters.remove(column_id);
        } else {
            self.filters
                .insert(column_id.to_string(), query.to_string());
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filter_query(&self, column_id: &str) -> Option<&str> {
        self.filters.get(column_id).map(String::as_str)
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Dataset indices passing every column filter, in dataset order.
    pub fn visible_row_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                let visible = self.filters.iter().all(|(column, needle)| {
                    let cell = record
                        .get(column)
                        .map(data_model::display_value)
                        .unwrap_or_default();
                    cell.to_lowercase().contains(&needle.to_lowercase())
                });
                visible.then_some(idx)
            })
            .collect()
    }

    // ---- sort ----

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Stable sort by column key; nulls and missing values sort last in both
    /// directions; repeated sorts of the same column toggle direction.
    pub fn sort_by(&mut self, column_id: &str) -> Option<Dataset> {
        if self.read_only {
            return None;
        }

        let direction = match &self.sort {
            Some(spec) if spec.column == column_id => spec.direction.toggled(),
            _ => SortDirection::Asc,
        };

        self.data.sort_by(|a, b| {
            let left = a.get(column_id).filter(|v| !v.is_null());
            let right = b.get(column_id).filter(|v| !v.is_null());
            match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ord = compare_values(l, r);
                    match direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                }
            }
        });

        self.sort = Some(SortSpec {
            column: column_id.to_string(),
            direction,
        });
        self.after_structural_change()
    }

    // ---- search ----

    pub fn search_open(&self) -> bool {
        self.search_open
    }

    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn toggle_search(&mut self) {
        if self.search_open {
            self.close_search();
        } else {
            self.open_search();
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Recomputes match coordinates on every keystroke; a plain substring
    /// scan, no incremental indexing.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.search_results = self.search_matches(query);
    }

    pub fn search_results(&self) -> &[(usize, usize)] {
        &self.search_results
    }

    /// Case-insensitive substring scan across all cells of the filtered
    /// view, yielding `(col, row)` view coordinates.
    pub fn search_matches(&self, query: &str) -> Vec<(usize, usize)> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let cols = self.columns();
        let mut matches = Vec::new();
        for (view_row, &data_row) in self.visible_row_indices().iter().enumerate() {
            for (col_idx, column) in cols.iter().enumerate() {
                let cell = data_model::value_at(&self.data, data_row, &column.id);
                if data_model::display_value(&cell)
                    .to_lowercase()
                    .contains(&needle)
                {
                    matches.push((col_idx, view_row));
                }
            }
        }
        matches
    }

    // ---- validation ----

    /// On-demand advisory scan: empty cells, numeric-looking strings,
    /// date-looking strings. Purely informational.
    pub fn validate(&self) -> Vec<CellAdvisory> {
        let mut findings = Vec::new();
        for (row, record) in self.data.iter().enumerate() {
            for (key, value) in record {
                if data_model::is_empty_value(value) {
                    findings.push(CellAdvisory {
                        row,
                        column: key.clone(),
                        kind: AdvisoryKind::EmptyValue,
                    });
                }
                if let Value::String(s) = value {
                    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                        findings.push(CellAdvisory {
                            row,
                            column: key.clone(),
                            kind: AdvisoryKind::NumericString,
                        });
                    }
                    if columns::looks_like_iso_date(s) {
                        findings.push(CellAdvisory {
                            row,
                            column: key.clone(),
                            kind: AdvisoryKind::DateString,
                        });
                    }
                }
            }
        }
        findings
    }

    // ---- internals ----

    /// Maps a view row to a dataset index; view rows past the filtered
    /// extent pad onto the end of the real dataset.
    fn resolve_row(&self, view_row: usize) -> usize {
        let visible = self.visible_row_indices();
        match visible.get(view_row) {
            Some(&idx) => idx,
            None => self.data.len() + (view_row - visible.len()),
        }
    }

    fn after_structural_change(&mut self) -> Option<Dataset> {
        self.edit = EditState::Idle;
        self.history.push(self.data.clone());
        self.sync_fill_buffer();
        Some(self.data.clone())
    }

    fn sync_fill_buffer(&mut self) {
        let cols = self.columns();
        self.fill_buffer = cols
            .iter()
            .map(|col| {
                self.data
                    .iter()
                    .map(|record| record.get(&col.id).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => data_model::display_value(left).cmp(&data_model::display_value(right)),
    }
}

fn coerce_string_value(value: &Value) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Number(i.into());
        }
    }
    if is_decimal_literal(s) {
        if let Some(n) = s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    value.clone()
}

/// `\d+.\d+` shape, mirroring the coarse auto-format heuristic.
fn is_decimal_literal(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let (Some(whole), Some(frac)) = (parts.next(), parts.next()) else {
        return false;
    };
    !whole.is_empty()
        && !frac.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}
