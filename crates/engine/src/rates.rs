//! Top-level funnel rates: read, click and conversion rate over everything
//! that was sent, plus the total order count shown on the summary cards.

use insights_core::{Counter, Counters};
use serde::{Deserialize, Serialize};

use crate::format::{format_rate, format_whole};
use crate::normalize::NormalizedTable;

/// Column totals and the rates derived from them.
///
/// Rates are not clamped: a table where `read > sent` yields a read rate
/// above 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelSummary {
    pub totals: Counters<f64>,
    pub read_rate: f64,
    pub click_rate: f64,
    pub conversion_rate: f64,
}

/// Display strings for the four summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCards {
    pub read_rate: String,
    pub click_rate: String,
    pub conversion_rate: String,
    pub total_orders: String,
}

impl FunnelSummary {
    pub fn compute(table: &NormalizedTable) -> Self {
        let mut totals = Counters::<f64>::default();
        for record in table {
            for counter in Counter::ALL {
                *totals.get_mut(counter) += record.counters.get(counter);
            }
        }

        Self {
            read_rate: ratio(totals.read, totals.sent),
            click_rate: ratio(totals.clicked, totals.sent),
            conversion_rate: ratio(totals.converted, totals.sent),
            totals,
        }
    }

    pub fn total_orders(&self) -> f64 {
        self.totals.orders
    }

    pub fn cards(&self) -> SummaryCards {
        SummaryCards {
            read_rate: format_rate(self.read_rate),
            click_rate: format_rate(self.click_rate),
            conversion_rate: format_rate(self.conversion_rate),
            total_orders: format_whole(self.totals.orders),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
