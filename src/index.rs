//! Category index: the latest strip plus one paginated list per category.
//!
//! [`CategoryIndex::build`] is the only way to produce pagination state, and it
//! always starts every category on page 1. After that, the owner moves pages
//! with [`CategoryIndex::change_page`]; moves that would leave
//! `[1, total_pages]` are ignored.
//!
//! Ordering is newest first by [`DateNormalizer::parse`]. Articles with
//! unparseable dates go last, in feed order.

use crate::dates::DateNormalizer;
use crate::models::{Article, CategoryKey};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Limits applied while building the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    /// Articles per page.
    pub page_size: usize,
    /// Most articles kept per category.
    pub category_limit: usize,
    /// Length of the recent window used when nothing is dated today.
    pub recent_days: i64,
    /// Most articles taken from the recent window.
    pub recent_limit: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            category_limit: 100,
            recent_days: 7,
            recent_limit: 20,
        }
    }
}

/// Page navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// `-1` or `+1`; anything else is not a direction.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            -1 => Some(Direction::Previous),
            1 => Some(Direction::Next),
            _ => None,
        }
    }
}

/// Paging position within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    total_pages: usize,
    page_size: usize,
    articles: Vec<Article>,
}

impl PaginationState {
    /// Start on page 1 of `articles`, which must already be sorted and capped.
    pub fn new(articles: Vec<Article>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = articles.len().div_ceil(page_size).max(1);
        Self {
            current_page: 1,
            total_pages,
            page_size,
            articles,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Every article in the category, newest first.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Articles on the current page.
    pub fn page_articles(&self) -> &[Article] {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.articles.len());
        self.articles.get(start..end).unwrap_or(&[])
    }

    /// Move one page in `direction`. Returns `false` (and does nothing) at the edges.
    pub fn step(&mut self, direction: Direction) -> bool {
        let target = match direction {
            Direction::Previous => self.current_page.checked_sub(1),
            Direction::Next => self.current_page.checked_add(1),
        };
        match target {
            Some(page) if (1..=self.total_pages).contains(&page) => {
                self.current_page = page;
                true
            }
            _ => false,
        }
    }
}

/// One category's current page, as handed to the presentation side.
#[derive(Debug, Clone, Copy)]
pub struct CategoryPage<'a> {
    pub articles: &'a [Article],
    pub current_page: usize,
    pub total_pages: usize,
}

/// The latest strip and per-category pagination for one article set.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    latest: Vec<Article>,
    categories: BTreeMap<CategoryKey, PaginationState>,
}

impl CategoryIndex {
    /// Build the index as of `now`. All categories start on page 1.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub fn build(
        articles: &[Article],
        normalizer: &DateNormalizer,
        settings: &IndexSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let latest = latest_view(articles, normalizer, settings, now);

        let categories: BTreeMap<CategoryKey, PaginationState> = CategoryKey::ALL
            .iter()
            .map(|&key| {
                let members: Vec<Article> = newest_first(
                    articles.iter().filter(|a| a.is_in(key)),
                    normalizer,
                )
                .take(settings.category_limit)
                .collect();
                let state = PaginationState::new(members, settings.page_size);
                debug!(
                    category = %key,
                    count = state.articles().len(),
                    total_pages = state.total_pages(),
                    "Built category"
                );
                (key, state)
            })
            .collect();

        info!(latest = latest.len(), "Built category index");
        Self { latest, categories }
    }

    /// Articles for the latest strip.
    pub fn latest_articles(&self) -> &[Article] {
        &self.latest
    }

    /// The current page of `key`.
    pub fn category_page(&self, key: CategoryKey) -> CategoryPage<'_> {
        let state = self.state(key);
        CategoryPage {
            articles: state.page_articles(),
            current_page: state.current_page(),
            total_pages: state.total_pages(),
        }
    }

    /// Full pagination state of `key`.
    pub fn state(&self, key: CategoryKey) -> &PaginationState {
        // `build` inserts every key.
        &self.categories[&key]
    }

    /// Move `key` one page in `direction`; out-of-range moves are ignored.
    pub fn change_page(&mut self, key: CategoryKey, direction: Direction) -> bool {
        let moved = self
            .categories
            .get_mut(&key)
            .is_some_and(|state| state.step(direction));
        debug!(category = %key, ?direction, moved, "change_page");
        moved
    }
}

/// Today's articles, or failing that the most recent ones within the window.
fn latest_view(
    articles: &[Article],
    normalizer: &DateNormalizer,
    settings: &IndexSettings,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let today = normalizer.today_key(now);
    let todays: Vec<Article> = newest_first(
        articles
            .iter()
            .filter(|a| normalizer.normalize(&a.date).as_deref() == Some(today.as_str())),
        normalizer,
    )
    .collect();

    if !todays.is_empty() {
        debug!(%today, count = todays.len(), "Latest strip from today's articles");
        return todays;
    }

    let recent: Vec<Article> = newest_first(
        articles
            .iter()
            .filter(|a| normalizer.is_within(&a.date, now, settings.recent_days)),
        normalizer,
    )
    .take(settings.recent_limit)
    .collect();
    debug!(%today, count = recent.len(), "Nothing dated today; latest strip from recent window");
    recent
}

/// Sort newest first; unparseable dates last; ties keep input order.
fn newest_first<'a>(
    articles: impl Iterator<Item = &'a Article>,
    normalizer: &DateNormalizer,
) -> impl Iterator<Item = Article> {
    articles
        .map(|a| (normalizer.parse(&a.date), a))
        .sorted_by_key(|(instant, _)| Reverse(*instant))
        .map(|(_, a)| a.clone())
}
