use crate::aggregate::{by_date, scope_total, Tier};
use crate::parse::LineItemRecord;
use time::Date;

/// The sales of one business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DailyTotal {
    #[serde(with = "crate::slash_date")]
    pub date: Date,
    pub amount: i64,
    pub quantity: u64,
    pub tier: Tier,
}

/// One point of the daily sales trend.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrendPoint {
    #[serde(with = "crate::slash_date")]
    pub date: Date,
    pub amount: i64,
    /// The mean of this and the two previous days, or `None` for the first two days.
    pub moving_avg3: Option<f64>,
}

/// The average sales of one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WeekdayAverage {
    /// `0` is Sunday, `6` is Saturday.
    pub weekday: u8,
    /// The amount of business days that fell on this weekday.
    pub days: usize,
    pub avg_amount: f64,
}

/// Key figures over all business days of a record set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesSummary {
    pub total: i64,
    pub days: usize,
    pub average: f64,
    pub highest: Option<DailyTotal>,
    pub lowest: Option<DailyTotal>,
}

/// Compute the total of each business day in `records`, in ascending order of days.
pub fn daily_totals(records: &[LineItemRecord]) -> Vec<DailyTotal> {
    by_date(records)
        .into_iter()
        .map(|(date, records)| {
            let total = scope_total(records);
            DailyTotal {
                date,
                amount: total.amount,
                quantity: total.quantity,
                tier: total.tier,
            }
        })
        .collect()
}

pub fn daily_trend(records: &[LineItemRecord]) -> Vec<TrendPoint> {
    let totals = daily_totals(records);
    totals
        .iter()
        .enumerate()
        .map(|(idx, day)| TrendPoint {
            date: day.date,
            amount: day.amount,
            moving_avg3: idx.checked_sub(2).map(|first| {
                totals[first..=idx].iter().map(|day| day.amount as f64).sum::<f64>() / 3.0
            }),
        })
        .collect()
}

/// Average the daily totals per day of the week, always returning all seven weekdays starting with Sunday.
pub fn weekday_averages(records: &[LineItemRecord]) -> Vec<WeekdayAverage> {
    let mut sums = [(0_i64, 0_usize); 7];
    for day in daily_totals(records) {
        let (total, count) = &mut sums[usize::from(day.date.weekday().number_days_from_sunday())];
        *total = total.saturating_add(day.amount);
        *count += 1;
    }
    sums.iter()
        .zip(0..)
        .map(|(&(total, days), weekday)| WeekdayAverage {
            weekday,
            days,
            avg_amount: if days == 0 {
                0.0
            } else {
                total as f64 / days as f64
            },
        })
        .collect()
}

pub fn sales_summary(records: &[LineItemRecord]) -> SalesSummary {
    let totals = daily_totals(records);
    if totals.is_empty() {
        return SalesSummary::default();
    }
    let total = totals
        .iter()
        .fold(0_i64, |total, day| total.saturating_add(day.amount));
    SalesSummary {
        total,
        days: totals.len(),
        average: total as f64 / totals.len() as f64,
        highest: totals
            .iter()
            .copied()
            .reduce(|best, day| if day.amount > best.amount { day } else { best }),
        lowest: totals
            .iter()
            .copied()
            .reduce(|best, day| if day.amount < best.amount { day } else { best }),
    }
}
