use crate::domain::model::{AssetSummary, Record};
use std::collections::BTreeMap;

#[derive(Default)]
struct Accumulator {
    total_quantity: u64,
    total_invested: f64,
    price_sum: f64,
    record_count: usize,
    priced_count: usize,
}

/// Groups records by asset (exact match) and folds quantities and prices.
///
/// Records without a unit value still count towards `total_quantity`, but not
/// towards `total_invested` or `average_price`. Quantities saturate at
/// `u64::MAX`. Output is sorted by asset.
pub fn aggregate(records: &[Record]) -> Vec<AssetSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for record in records {
        let acc = groups.entry(record.asset.as_str()).or_default();
        acc.total_quantity = acc.total_quantity.saturating_add(record.quantity);
        acc.record_count += 1;
        if let Some(price) = record.unit_value {
            acc.total_invested += record.quantity as f64 * price;
            acc.price_sum += price;
            acc.priced_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(asset, acc)| AssetSummary {
            asset: asset.to_string(),
            total_quantity: acc.total_quantity,
            total_invested: acc.total_invested,
            average_price: (acc.priced_count > 0).then(|| acc.price_sum / acc.priced_count as f64),
            record_count: acc.record_count,
            priced_count: acc.priced_count,
        })
        .collect()
}
