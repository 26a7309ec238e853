use std::fmt::Display;

use clap::ValueEnum;

use crate::products::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    #[default]
    Title,
    Category,
}

impl SearchMode {
    pub fn placeholder(self) -> &'static str {
        match self {
            SearchMode::Title => "Search by title",
            SearchMode::Category => "Search by category",
        }
    }

    fn attribute(self, product: &Product) -> &str {
        match self {
            SearchMode::Title => &product.title,
            SearchMode::Category => &product.category,
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Title => write!(f, "Title"),
            SearchMode::Category => write!(f, "Category"),
        }
    }
}

/// Case-insensitive substring match on one attribute, paired with store positions.
pub fn filter_positions<'a>(
    records: &'a [Product],
    mode: SearchMode,
    query: &str,
) -> Vec<(usize, &'a Product)> {
    let query = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, product)| mode.attribute(product).to_lowercase().contains(&query))
        .collect()
}

pub fn filter(records: &[Product], mode: SearchMode, query: &str) -> Vec<Product> {
    filter_positions(records, mode, query)
        .into_iter()
        .map(|(_, product)| product.clone())
        .collect()
}

/// Search box state: switching the mode starts a fresh query.
#[derive(Debug, Default)]
pub struct Search {
    mode: SearchMode,
    query: String,
}

impl Search {
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn select_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn apply<'a>(&self, records: &'a [Product]) -> Vec<(usize, &'a Product)> {
        filter_positions(records, self.mode, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(title: &str, category: &str) -> Product {
        Product {
            title: title.to_string(),
            price: Decimal::ONE,
            taxes: Decimal::ZERO,
            ads: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ONE,
            category: category.to_string(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Blue Pen", "Stationery"),
            product("Laptop", "Electronics"),
            product("pencil case", "stationery"),
        ]
    }

    #[test]
    fn empty_query_keeps_everything() {
        let records = catalog();
        assert_eq!(filter(&records, SearchMode::Title, ""), records);
    }

    #[test]
    fn matching_ignores_case() {
        let records = catalog();
        let titles: Vec<_> = filter(&records, SearchMode::Title, "PEN")
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Blue Pen", "pencil case"]);
    }

    #[test]
    fn category_mode_matches_category_only() {
        let records = catalog();
        assert!(filter(&records, SearchMode::Category, "pen").is_empty());
        let hits = filter_positions(&records, SearchMode::Category, "STATION");
        let positions: Vec<_> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn filtering_leaves_input_alone() {
        let records = catalog();
        let before = records.clone();
        let _ = filter(&records, SearchMode::Title, "laptop");
        assert_eq!(records, before);
    }

    #[test]
    fn switching_mode_clears_query() {
        let mut search = Search::default();
        search.set_query("pen");
        assert_eq!(search.apply(&catalog()).len(), 2);

        search.select_mode(SearchMode::Category);
        assert_eq!(search.query(), "");
        assert_eq!(search.mode().placeholder(), "Search by category");
        assert_eq!(search.apply(&catalog()).len(), 3);
    }
}
