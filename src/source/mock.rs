// Static fixture deals used when the live source is off
use crate::model::RawDeal;

fn fixture(
    asin: &str,
    title: &str,
    brand: &str,
    image_url: &str,
    current_price: f64,
    original_price: f64,
    last_updated: &str,
) -> RawDeal {
    RawDeal {
        asin: asin.to_string(),
        title: title.to_string(),
        brand: brand.to_string(),
        image_url: image_url.to_string(),
        current_price,
        original_price,
        last_updated: last_updated.to_string(),
    }
}

/// The fixed five-item fixture set. These are trusted and bypass validation.
pub fn mock_deals() -> Vec<RawDeal> {
    vec![
        fixture(
            "B07P1",
            "18V Brushless Drill Driver Kit",
            "Makita",
            "https://images-na.ssl-images-amazon.com/images/I/71W0zW2qytL._AC_SL1500_.jpg",
            149.99,
            219.99,
            "2024-05-30T10:15:00Z",
        ),
        fixture(
            "B08Z2",
            "20V Max Cordless Impact Wrench",
            "DeWalt",
            "https://images-na.ssl-images-amazon.com/images/I/61Qh4b3XeYL._AC_SL1500_.jpg",
            179.0,
            249.0,
            "2024-06-02T08:45:00Z",
        ),
        fixture(
            "B0A22",
            "Heavy Duty 52-Inch Garage Storage Cabinet",
            "Gladiator",
            "https://images-na.ssl-images-amazon.com/images/I/71Q3hD6i9GL._AC_SL1500_.jpg",
            429.0,
            599.0,
            "2024-05-28T18:05:00Z",
        ),
        fixture(
            "B0B12",
            "Smart Laser Distance Measure",
            "Bosch",
            "https://images-na.ssl-images-amazon.com/images/I/61X4pW5X6EL._AC_SL1500_.jpg",
            79.99,
            119.99,
            "2024-06-01T14:20:00Z",
        ),
        fixture(
            "B09C9",
            "Rolling Tool Chest with Soft-Close Drawers",
            "Husky",
            "https://images-na.ssl-images-amazon.com/images/I/71hZ7P1EKQL._AC_SL1500_.jpg",
            548.0,
            699.0,
            "2024-05-25T09:30:00Z",
        ),
    ]
}
