use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u64 = 6;
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageArgs {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageArgs {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u64,
    pub limit: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(args: PageArgs, count: u64, results: Vec<T>) -> Self {
        Self {
            count,
            page: args.page(),
            limit: args.limit(),
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            limit: self.limit,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let args = PageArgs::default();
        assert_eq!(args.page(), 1);
        assert_eq!(args.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(args.offset(), 0);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let args = PageArgs::new(0, 1000);
        assert_eq!(args.page(), 1);
        assert_eq!(args.limit(), MAX_PAGE_LIMIT);

        let args = PageArgs::new(3, 0);
        assert_eq!(args.limit(), 1);
        assert_eq!(args.offset(), 2);
    }
}
