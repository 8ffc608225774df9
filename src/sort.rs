// Display ordering for the deal grid
use crate::model::Deal;
use crate::utils::parse_datetime;
use std::cmp::{Ordering, Reverse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Highest % off first.
    #[default]
    Percent,
    /// Highest $ off first.
    Amount,
    /// Brand A to Z.
    Brand,
    /// Most recently dropped first.
    Recent,
}

impl SortKey {
    /// Unknown values fall back to `Percent`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "amount" => SortKey::Amount,
            "brand" => SortKey::Brand,
            "recent" => SortKey::Recent,
            _ => SortKey::Percent,
        }
    }
}

/// Stable sort, so ties keep their provider order.
pub fn sort_deals(deals: &mut [Deal], key: SortKey) {
    match key {
        SortKey::Percent => deals.sort_by_key(|d| Reverse(d.percent_off)),
        SortKey::Amount => deals.sort_by(|a, b| b.amount_off.total_cmp(&a.amount_off)),
        SortKey::Brand => deals.sort_by_cached_key(|d| d.brand.to_lowercase()),
        SortKey::Recent => deals.sort_by(|a, b| {
            match (parse_datetime(&a.dropped_at), parse_datetime(&b.dropped_at)) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}
