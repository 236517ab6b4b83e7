use chrono::{DateTime, Duration, Utc};

use crate::db::models::RawProduct;

// 1x1 transparent PNG.
const PLACEHOLDER_IMAGE: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

struct Sample {
    label: &'static str,
    unit: &'static str,
    normal: f64,
    discounted: Option<f64>,
    location: &'static str,
    age_days: i64,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        label: "Milk 1L",
        unit: "each",
        normal: 1.89,
        discounted: Some(1.29),
        location: "store-north",
        age_days: 1,
    },
    Sample {
        label: "Oat Milk",
        unit: "each",
        normal: 2.79,
        discounted: None,
        location: "store-north",
        age_days: 3,
    },
    Sample {
        label: "Bananas",
        unit: "kg",
        normal: 1.99,
        discounted: Some(1.49),
        location: "store-south",
        age_days: 2,
    },
    Sample {
        label: "Cheddar Cheese",
        unit: "kg",
        normal: 12.50,
        discounted: Some(9.99),
        location: "store-south",
        age_days: 6,
    },
    Sample {
        label: "Sourdough Bread",
        unit: "each",
        normal: 4.20,
        discounted: None,
        location: "store-north",
        age_days: 9,
    },
    Sample {
        label: "Coffee Beans",
        unit: "kg",
        normal: 24.00,
        discounted: Some(18.00),
        location: "store-east",
        age_days: 14,
    },
];

fn to_raw(id: i32, sample: &Sample, now: DateTime<Utc>) -> RawProduct {
    RawProduct {
        id,
        label: Some(sample.label.to_string()),
        unit: Some(sample.unit.to_string()),
        normal_price: Some(sample.normal),
        discounted_price: sample.discounted,
        true_price: Some(sample.discounted.unwrap_or(sample.normal)),
        description: Some(format!("{} ({})", sample.label, sample.unit)),
        base64_image: Some(PLACEHOLDER_IMAGE.to_string()),
        location: Some(sample.location.to_string()),
        created_at: Some(now - Duration::days(sample.age_days)),
    }
}

/// Sample catalogue served by the `memory` backend.
pub fn sample_products() -> Vec<RawProduct> {
    let now = Utc::now();
    SAMPLES
        .iter()
        .zip(1..)
        .map(|(sample, id)| to_raw(id, sample, now))
        .collect()
}
