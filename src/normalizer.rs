use crate::config::AffiliateConfig;
use crate::model::{Deal, RawDeal};

pub fn normalize_all(deals: &[RawDeal], affiliate: &AffiliateConfig) -> Vec<Deal> {
    deals
        .iter()
        .map(|deal| normalize_deal(deal, affiliate))
        .collect()
}

pub fn normalize_deal(deal: &RawDeal, affiliate: &AffiliateConfig) -> Deal {
    let amount_off = (deal.original_price - deal.current_price).max(0.0);

    Deal {
        asin: deal.asin.clone(),
        title: deal.title.clone(),
        brand: deal.brand.clone(),
        image: deal.image_url.clone(),
        current_price: deal.current_price,
        original_price: deal.original_price,
        amount_off,
        percent_off: percent_off(amount_off, deal.original_price),
        dropped_at: deal.last_updated.clone(),
        link: affiliate_link(&deal.asin, affiliate),
        alerts: Vec::new(),
    }
}

/// Rounded half-up; 0 when there is no positive original price.
pub fn percent_off(amount_off: f64, original_price: f64) -> u32 {
    if original_price <= 0.0 || !original_price.is_finite() {
        return 0;
    }
    (amount_off / original_price * 100.0 + 0.5).floor() as u32
}

pub fn affiliate_link(asin: &str, affiliate: &AffiliateConfig) -> String {
    format!("{}{}?tag={}", affiliate.base_url, asin, affiliate.tag)
}
