// Page-number pagination over counted result sets

/// Splits `count` rows into pages of `per_page`.
///
/// There is always at least one page, even for an empty result, and
/// `get_page` never fails: anything unparseable maps to the first page,
/// anything below one or past the end maps to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn num_pages(&self) -> i64 {
        ((self.count + self.per_page - 1) / self.per_page).max(1)
    }

    /// Resolve a raw `?page=` value to a valid page number.
    pub fn get_page(&self, raw: Option<&str>) -> i64 {
        let last = self.num_pages();
        match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
            None => 1,
            Some(requested) if requested < 1 => last,
            Some(requested) => requested.min(last),
        }
    }

    /// Zero-based row offset of a page number returned by `get_page`.
    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }
}

/// One page of results plus the navigation numbers templates need.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: i64, paginator: &Paginator) -> Self {
        Self {
            items,
            number,
            num_pages: paginator.num_pages(),
            count: paginator.count(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    pub fn previous_page_number(&self) -> i64 {
        (self.number - 1).max(1)
    }

    pub fn next_page_number(&self) -> i64 {
        (self.number + 1).min(self.num_pages)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

}
