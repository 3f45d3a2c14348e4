//! Category ordering policy
//!
//! An explicit ordered list of category names. A name's rank is its position
//! in the list; names that are not listed share [`UNLISTED_RANK`] and sort
//! after every listed one.

use crate::models::Category;

/// Rank given to every category name missing from the list
pub const UNLISTED_RANK: usize = 999;

/// Ordered list of category names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOrder {
    names: Vec<String>,
}

impl CategoryOrder {
    /// Build from names in priority order. Later duplicates are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// Sort key for a category name; lower sorts first
    pub fn rank(&self, name: &str) -> usize {
        self.names
            .iter()
            .position(|n| n == name)
            .unwrap_or(UNLISTED_RANK)
    }

    pub fn is_listed(&self, name: &str) -> bool {
        self.rank(name) != UNLISTED_RANK
    }

    /// Names in priority order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sort categories by rank, then name, then id
    pub fn sort(&self, categories: &mut [Category]) {
        categories.sort_by(|a, b| {
            self.rank(&a.name)
                .cmp(&self.rank(&b.name))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn directory_order() -> CategoryOrder {
        CategoryOrder::new([
            "Maktab direktori",
            "Rahbariyat",
            "Fan o'qituvchisi",
            "Boshlang'ich sinf o'qituvchisi",
        ])
    }

    #[test]
    fn test_rank_listed_and_unlisted() {
        let order = directory_order();
        assert_eq!(order.rank("Maktab direktori"), 0);
        assert_eq!(order.rank("Fan o'qituvchisi"), 2);
        assert_eq!(order.rank("Texnik xodimlar"), UNLISTED_RANK);
        assert!(!order.is_listed("rahbariyat"));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let order = CategoryOrder::new(["A", "B", "A"]);
        assert_eq!(order.names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(order.rank("A"), 0);
    }

    #[test]
    fn test_sort_unlisted_by_name_then_id() {
        let order = CategoryOrder::new(["C", "B"]);
        let mut categories = vec![
            Category { id: 1, name: "Z".into() },
            Category { id: 2, name: "B".into() },
            Category { id: 3, name: "A".into() },
            Category { id: 4, name: "C".into() },
            Category { id: 5, name: "A".into() },
        ];
        order.sort(&mut categories);

        let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 5, 1]);
    }

    proptest! {
        #[test]
        fn prop_listed_sorts_before_unlisted(
            names in proptest::collection::vec("[a-e]{1,2}", 0..12),
            listed in proptest::collection::vec("[a-e]{1,2}", 0..4),
        ) {
            let order = CategoryOrder::new(listed);
            let mut categories: Vec<Category> = names
                .into_iter()
                .enumerate()
                .map(|(i, name)| Category { id: i as i64, name })
                .collect();
            order.sort(&mut categories);

            let ranks: Vec<usize> = categories.iter().map(|c| order.rank(&c.name)).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
