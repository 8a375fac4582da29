use crate::domain::model::{AssetSummary, DividendEstimate, RateScaling, YieldTable};
use std::collections::BTreeMap;

/// Why an asset is left out of the dividend section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotInYieldTable,
    ZeroQuantity,
}

pub struct DividendEstimator<'a> {
    yields: &'a YieldTable,
    scaling: RateScaling,
    monthly_goal: f64,
}

impl<'a> DividendEstimator<'a> {
    pub fn new(yields: &'a YieldTable, scaling: RateScaling, monthly_goal: f64) -> Self {
        Self {
            yields,
            scaling,
            monthly_goal,
        }
    }

    /// 每月費率：年化殖利率 / 12 (Percent 模式再除以 100)
    pub fn monthly_rate(&self, annual_yield_pct: f64) -> f64 {
        let monthly = annual_yield_pct / 12.0;
        match self.scaling {
            RateScaling::AsRecorded => monthly,
            RateScaling::Percent => monthly / 100.0,
        }
    }

    pub fn estimate(&self, asset: &str, total_quantity: u64) -> Result<DividendEstimate, SkipReason> {
        let annual_yield_pct = self
            .yields
            .annual_yield(asset)
            .ok_or(SkipReason::NotInYieldTable)?;
        if total_quantity == 0 {
            return Err(SkipReason::ZeroQuantity);
        }

        let monthly_rate = self.monthly_rate(annual_yield_pct);
        let monthly_dividend = total_quantity as f64 * monthly_rate;

        Ok(DividendEstimate {
            asset: asset.trim().to_uppercase(),
            total_quantity,
            annual_yield_pct,
            monthly_rate,
            monthly_dividend,
            goal_progress_pct: monthly_dividend / self.monthly_goal * 100.0,
        })
    }

    /// Merges summaries by ticker (uppercased) and estimates each one.
    /// Skipped assets are logged and left out.
    pub fn estimate_all<'s, I>(&self, summaries: I) -> Vec<DividendEstimate>
    where
        I: IntoIterator<Item = &'s AssetSummary>,
    {
        let mut quantities: BTreeMap<String, u64> = BTreeMap::new();
        for summary in summaries {
            let total = quantities
                .entry(summary.asset.trim().to_uppercase())
                .or_default();
            *total = total.saturating_add(summary.total_quantity);
        }

        quantities
            .into_iter()
            .filter_map(|(asset, quantity)| match self.estimate(&asset, quantity) {
                Ok(estimate) => Some(estimate),
                Err(reason) => {
                    tracing::debug!("Skipping {} in dividend section: {:?}", asset, reason);
                    None
                }
            })
            .collect()
    }
}
