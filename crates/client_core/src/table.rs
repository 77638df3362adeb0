//! Character table model: filtering, sorting and pagination that produce the
//! page-of-rows the height aggregate is computed over.

use std::cmp::Ordering;

use shared::{
    domain::Character,
    stats::{aggregate_heights, HeightAggregate},
};

pub const PAGE_SIZE_OPTIONS: [usize; 8] = [5, 10, 15, 20, 25, 30, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Gender,
    Height,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [SortColumn::Name, SortColumn::Gender, SortColumn::Height];

    pub fn header(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Gender => "Gender",
            SortColumn::Height => "Height (CM)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sort: Option<(SortColumn, SortDirection)>,
    global_filter: String,
    gender_filter: String,
    page_index: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One rendered page plus the numbers the pager and footer need.
#[derive(Debug, Clone)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Character>,
    pub page_index: usize,
    pub page_count: usize,
    pub matching_rows: usize,
}

impl TablePage<'_> {
    pub fn aggregate(&self) -> HeightAggregate {
        aggregate_heights(self.rows.iter().copied())
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

impl TableState {
    /// Page sizes outside [`PAGE_SIZE_OPTIONS`] fall back to the default.
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            global_filter: String::new(),
            gender_filter: String::new(),
            page_index: 0,
            page_size: normalize_page_size(page_size),
        }
    }

    pub fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn gender_filter(&self) -> &str {
        &self.gender_filter
    }

    /// Cycles a column through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn set_sort(&mut self, sort: Option<(SortColumn, SortDirection)>) {
        self.sort = sort;
    }

    pub fn set_global_filter(&mut self, filter: impl Into<String>) {
        self.global_filter = filter.into();
        self.page_index = 0;
    }

    pub fn set_gender_filter(&mut self, filter: impl Into<String>) {
        self.gender_filter = filter.into();
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = normalize_page_size(page_size);
        self.page_index = 0;
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    pub fn next_page(&mut self) {
        self.page_index += 1;
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Back to the first page with no filters or sort; used when a new film's
    /// characters replace the old ones.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    fn matches(&self, row: &Character) -> bool {
        let gender = self.gender_filter.trim().to_lowercase();
        if !gender.is_empty() && !row.gender.to_lowercase().contains(&gender) {
            return false;
        }
        let needle = self.global_filter.trim().to_lowercase();
        needle.is_empty()
            || [&row.name, &row.gender, &row.height]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// All rows passing the filters, in display order.
    pub fn filtered_sorted<'a>(&self, rows: &'a [Character]) -> Vec<&'a Character> {
        let mut visible: Vec<&Character> = rows.iter().filter(|row| self.matches(row)).collect();
        if let Some((column, direction)) = self.sort {
            visible.sort_by(|a, b| {
                let ordering = compare(column, a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        visible
    }

    /// The current page. A page index past the end is clamped to the last page.
    pub fn page<'a>(&self, rows: &'a [Character]) -> TablePage<'a> {
        let visible = self.filtered_sorted(rows);
        let matching_rows = visible.len();
        let page_count = matching_rows.div_ceil(self.page_size).max(1);
        let page_index = self.page_index.min(page_count - 1);
        let rows = visible
            .into_iter()
            .skip(page_index * self.page_size)
            .take(self.page_size)
            .collect();
        TablePage {
            rows,
            page_index,
            page_count,
            matching_rows,
        }
    }
}

fn normalize_page_size(page_size: usize) -> usize {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        page_size
    } else {
        DEFAULT_PAGE_SIZE
    }
}

fn compare(column: SortColumn, a: &Character, b: &Character) -> Ordering {
    match column {
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Gender => a.gender.to_lowercase().cmp(&b.gender.to_lowercase()),
        // Numeric heights first, unknown and unparseable ones after them.
        SortColumn::Height => match (a.height_cm(), b.height_cm()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.height.cmp(&b.height),
        },
    }
}
