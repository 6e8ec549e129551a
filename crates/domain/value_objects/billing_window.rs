//! Windowed cost aggregation.
//!
//! A subscription is billed for every calendar month in the inclusive
//! intersection of its active range and the query window. Open-ended
//! subscriptions are clipped to the window's last month.

use crate::domain::{
    entities::subscriptions::SubscriptionEntity, errors::ValidationError,
    value_objects::calendar_month::CalendarMonth,
};

/// Inclusive `[start, end]` query window, `start <= end` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingWindow {
    start: CalendarMonth,
    end: CalendarMonth,
}

/// The billing-relevant slice of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BilledRange {
    pub price: i64,
    pub start_date: CalendarMonth,
    pub end_date: Option<CalendarMonth>,
}

impl From<&SubscriptionEntity> for BilledRange {
    fn from(entity: &SubscriptionEntity) -> Self {
        Self {
            price: entity.price,
            start_date: CalendarMonth::from(entity.start_date),
            end_date: entity.end_date.map(CalendarMonth::from),
        }
    }
}

impl BillingWindow {
    pub fn new(start: CalendarMonth, end: CalendarMonth) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedWindow);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> CalendarMonth {
        self.start
    }

    pub fn end(&self) -> CalendarMonth {
        self.end
    }

    /// Months of `range` that fall inside the window, 0 when they don't overlap.
    pub fn billable_months(&self, range: &BilledRange) -> i64 {
        let effective_end = range.end_date.unwrap_or(self.end);
        let overlap_start = range.start_date.max(self.start);
        let overlap_end = effective_end.min(self.end);

        if overlap_start > overlap_end {
            return 0;
        }
        CalendarMonth::months_between(overlap_start, overlap_end) + 1
    }

    pub fn cost(&self, range: &BilledRange) -> i64 {
        range.price * self.billable_months(range)
    }

    pub fn prorated_total<I>(&self, ranges: I) -> i64
    where
        I: IntoIterator<Item = BilledRange>,
    {
        ranges.into_iter().map(|range| self.cost(&range)).sum()
    }
}
