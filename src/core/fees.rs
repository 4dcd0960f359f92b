//! Exchange tax and service fee calculation on top of a resolved rate.
use serde::{Deserialize, Serialize};

/// Percentages and fee bounds applied to a converted amount.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FeeSchedule {
    /// Percent of the gross amount withheld as tax, e.g. 2.5 for 2.5%.
    pub exchange_tax_rate: f64,
    /// Percent of the gross amount charged as service fee.
    pub service_fee_rate: f64,
    /// Minimum fee in the target currency.
    pub minimum_fee: f64,
    pub maximum_fee: Option<f64>,
}

/// Used when no schedule matches the requested currency.
pub const DEFAULT_FEE_SCHEDULE: FeeSchedule = FeeSchedule {
    exchange_tax_rate: 0.0,
    service_fee_rate: 2.0,
    minimum_fee: 3.0,
    maximum_fee: Some(50.0),
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CountryFeeSchedule {
    pub country_code: String,
    pub country_name: String,
    pub currency_code: String,
    #[serde(flatten)]
    pub schedule: FeeSchedule,
}

/// Where the applied schedule came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleMatch<'a> {
    Country(&'a CountryFeeSchedule),
    Currency(&'a CountryFeeSchedule),
    Default,
}

impl ScheduleMatch<'_> {
    pub fn schedule(&self) -> &FeeSchedule {
        match self {
            ScheduleMatch::Country(s) | ScheduleMatch::Currency(s) => &s.schedule,
            ScheduleMatch::Default => &DEFAULT_FEE_SCHEDULE,
        }
    }
}

/// Picks the schedule for `(country, currency)`, then any schedule for the currency,
/// then the default.
pub fn find_schedule<'a>(
    schedules: &'a [CountryFeeSchedule],
    country_code: &str,
    currency_code: &str,
) -> ScheduleMatch<'a> {
    if let Some(s) = schedules
        .iter()
        .find(|s| s.country_code == country_code && s.currency_code == currency_code)
    {
        return ScheduleMatch::Country(s);
    }
    schedules
        .iter()
        .find(|s| s.currency_code == currency_code)
        .map_or(ScheduleMatch::Default, ScheduleMatch::Currency)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeBreakdown {
    pub gross_amount: f64,
    pub exchange_tax: f64,
    pub service_fee: f64,
    pub total_tax_fee: f64,
    pub net_amount: f64,
}

impl FeeSchedule {
    pub fn apply(&self, amount: f64, rate: f64) -> FeeBreakdown {
        let gross_amount = amount * rate;
        let exchange_tax = gross_amount * (self.exchange_tax_rate / 100.0);
        let mut service_fee = gross_amount * (self.service_fee_rate / 100.0);

        if service_fee < self.minimum_fee {
            service_fee = self.minimum_fee;
        } else if let Some(max) = self.maximum_fee {
            if service_fee > max {
                service_fee = max;
            }
        }

        let total_tax_fee = exchange_tax + service_fee;
        FeeBreakdown {
            gross_amount,
            exchange_tax,
            service_fee,
            total_tax_fee,
            net_amount: gross_amount - total_tax_fee,
        }
    }
}
