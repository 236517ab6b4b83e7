use std::cmp::Ordering;

use crate::db::models::RawProduct;
use crate::db::repository::{ProductStore, StoreError};
use crate::models::{SortField, SortOrder};
use crate::query::{Predicate, QuerySpec};

/// `ProductStore` over a fixed set of records held in memory.
///
/// Filtering and ordering follow `PgProductStore`: a missing field never
/// satisfies a predicate, missing values sort lowest, ties are broken by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    products: Vec<RawProduct>,
}

impl InMemoryProductStore {
    pub fn new(products: Vec<RawProduct>) -> Self {
        InMemoryProductStore { products }
    }
}

fn matches(predicate: &Predicate, product: &RawProduct) -> bool {
    match predicate {
        Predicate::LabelMatches(pattern) => {
            product.label.as_deref().map_or(false, |l| pattern.is_match(l))
        }
        Predicate::PriceAtLeast(min) => product.true_price.map_or(false, |p| p >= *min),
        Predicate::PriceAtMost(max) => product.true_price.map_or(false, |p| p <= *max),
        Predicate::CreatedSince(since) => product.created_at.map_or(false, |c| c >= *since),
    }
}

fn compare(field: SortField, a: &RawProduct, b: &RawProduct) -> Ordering {
    let by_field = match field {
        SortField::TruePrice => match (a.true_price, b.true_price) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (x, y) => x.is_some().cmp(&y.is_some()),
        },
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Label => a.label.cmp(&b.label),
    };
    by_field.then(a.id.cmp(&b.id))
}

impl ProductStore for InMemoryProductStore {
    fn find(&self, spec: &QuerySpec) -> Result<Vec<RawProduct>, StoreError> {
        let mut selected: Vec<&RawProduct> = self
            .products
            .iter()
            .filter(|p| spec.filter.predicates.iter().all(|pred| matches(pred, p)))
            .collect();

        selected.sort_by(|a, b| {
            let ordering = compare(spec.sort.field, a, b);
            match spec.sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        // PageWindow guarantees both values are positive.
        let offset = spec.window.offset() as usize;
        let limit = spec.window.limit() as usize;
        Ok(selected.into_iter().skip(offset).take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductQuery;
    use chrono::{Duration, Utc};

    fn product(id: i32, label: &str, price: Option<f64>, age_days: i64) -> RawProduct {
        RawProduct {
            id,
            label: Some(label.to_string()),
            unit: Some("each".into()),
            true_price: price,
            description: Some(String::new()),
            base64_image: Some(String::new()),
            location: Some("main".into()),
            created_at: Some(Utc::now() - Duration::days(age_days)),
            ..RawProduct::default()
        }
    }

    fn store() -> InMemoryProductStore {
        InMemoryProductStore::new(vec![
            product(1, "Milk 1L", Some(1.5), 1),
            product(2, "Oat Milk", Some(2.5), 10),
            product(3, "Bread", None, 2),
            product(4, "Cheese", Some(2.5), 30),
        ])
    }

    fn run(query: ProductQuery) -> Vec<i32> {
        let spec = QuerySpec::from_request(&query, Utc::now()).unwrap();
        store().find(&spec).unwrap().into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn missing_price_sorts_first_ascending_and_last_descending() {
        assert_eq!(run(ProductQuery::default()), vec![3, 1, 2, 4]);
        assert_eq!(
            run(ProductQuery {
                order: "desc".into(),
                ..ProductQuery::default()
            }),
            vec![4, 2, 1, 3]
        );
    }

    #[test]
    fn missing_price_never_matches_a_bound() {
        let ids = run(ProductQuery {
            price_max: Some(100.0),
            ..ProductQuery::default()
        });
        assert!(!ids.contains(&3));
    }

    #[test]
    fn label_match_ignores_case() {
        let ids = run(ProductQuery {
            query: Some("MILK".into()),
            ..ProductQuery::default()
        });
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn label_match_honours_anchors_and_wildcards() {
        let search = |term: &str| {
            run(ProductQuery {
                query: Some(term.into()),
                ..ProductQuery::default()
            })
        };
        assert_eq!(search("^milk"), vec![1]);
        assert_eq!(search("milk$"), vec![2]);
        assert_eq!(search("o.t"), vec![2]);
        assert_eq!(search("bread|cheese"), vec![3, 4]);
    }

    #[test]
    fn recency_window() {
        let ids = run(ProductQuery {
            days_ago: Some(7),
            sort_by: "created_at".into(),
            ..ProductQuery::default()
        });
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let ids = run(ProductQuery {
            page: 3,
            limit: 2,
            ..ProductQuery::default()
        });
        assert!(ids.is_empty());
    }
}
