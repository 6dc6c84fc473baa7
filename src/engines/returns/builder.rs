// src/engines/returns/builder.rs
use crate::{
    error::{PortfolioLabError, Result},
    types::{month_end, PriceSeries, ReturnPoint, ReturnSeries},
};
use chrono::NaiveDate;

pub struct ReturnSeriesBuilder;

impl ReturnSeriesBuilder {
    /// Monthly returns from the last close of each calendar month.
    ///
    /// A calendar month without prices repeats the previous close and so gets
    /// a zero return. The first month has no predecessor and is dropped, so
    /// the result covers every month after the first one observed.
    pub fn build(prices: &PriceSeries) -> Result<ReturnSeries> {
        let monthly = Self::month_end_closes(prices);

        if monthly.len() < 2 {
            return Err(PortfolioLabError::InsufficientData(format!(
                "{}: {} monthly observation(s), at least 2 required",
                prices.instrument(),
                monthly.len()
            )));
        }

        let points: Vec<ReturnPoint> = monthly
            .windows(2)
            .map(|w| ReturnPoint {
                period_end: w[1].0,
                value: w[1].1 / w[0].1 - 1.0,
            })
            .collect();

        log::debug!(
            "{}: {} daily closes -> {} monthly returns",
            prices.instrument(),
            prices.len(),
            points.len()
        );

        Ok(ReturnSeries::from_sorted(points))
    }

    /// Last observed close on or before each month end, keyed by month-end
    /// date, for every calendar month from the first observation to the last.
    pub fn month_end_closes(prices: &PriceSeries) -> Vec<(NaiveDate, f64)> {
        let mut monthly: Vec<(NaiveDate, f64)> = Vec::new();

        for point in prices.points() {
            let period_end = month_end(point.date);
            if let Some(&(last_end, last_close)) = monthly.last() {
                if last_end == period_end {
                    if let Some(last) = monthly.last_mut() {
                        last.1 = point.close;
                    }
                    continue;
                }
                Self::carry_forward(&mut monthly, last_end, last_close, period_end);
            }
            monthly.push((period_end, point.close));
        }

        monthly
    }

    /// Repeats `close` for every month end strictly between `from` and `until`.
    fn carry_forward(
        monthly: &mut Vec<(NaiveDate, f64)>,
        from: NaiveDate,
        close: f64,
        until: NaiveDate,
    ) {
        let mut period_end = from;
        while let Some(next) = period_end.succ_opt().map(month_end) {
            if next >= until {
                break;
            }
            monthly.push((next, close));
            period_end = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_uses_last_close_of_each_month() {
        let prices = PriceSeries::from_pairs(
            "AAA",
            &[
                (date(2021, 1, 4), 90.0),
                (date(2021, 1, 29), 100.0),
                (date(2021, 2, 1), 300.0),
                (date(2021, 2, 26), 110.0),
                (date(2021, 3, 31), 99.0),
            ],
        )
        .unwrap();

        let returns = ReturnSeriesBuilder::build(&prices).unwrap();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates(), vec![date(2021, 2, 28), date(2021, 3, 31)]);
        assert!((returns.values()[0] - 0.10).abs() < 1e-12);
        assert!((returns.values()[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn test_month_without_prices_carries_close_forward() {
        // Irregular calendar with no prices in April
        let prices = PriceSeries::from_pairs(
            "AAA",
            &[
                (date(2021, 1, 15), 10.0),
                (date(2021, 2, 15), 11.0),
                (date(2021, 3, 15), 12.0),
                (date(2021, 5, 14), 13.0),
                (date(2021, 5, 28), 14.0),
            ],
        )
        .unwrap();

        let returns = ReturnSeriesBuilder::build(&prices).unwrap();
        assert_eq!(
            returns.dates(),
            vec![date(2021, 2, 28), date(2021, 3, 31), date(2021, 4, 30), date(2021, 5, 31)]
        );
        assert_eq!(returns.values()[2], 0.0);
        assert!((returns.values()[3] - (14.0 / 12.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_gap_across_year_end() {
        let prices = PriceSeries::from_pairs(
            "AAA",
            &[(date(2020, 11, 30), 50.0), (date(2021, 2, 1), 55.0)],
        )
        .unwrap();

        let closes = ReturnSeriesBuilder::month_end_closes(&prices);
        assert_eq!(
            closes,
            vec![
                (date(2020, 11, 30), 50.0),
                (date(2020, 12, 31), 50.0),
                (date(2021, 1, 31), 50.0),
                (date(2021, 2, 28), 55.0),
            ]
        );
    }

    #[test]
    fn test_single_month_is_insufficient() {
        let prices = PriceSeries::from_pairs(
            "AAA",
            &[(date(2021, 1, 4), 10.0), (date(2021, 1, 29), 11.0)],
        )
        .unwrap();

        let result = ReturnSeriesBuilder::build(&prices);
        assert!(matches!(result, Err(PortfolioLabError::InsufficientData(_))));
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let prices = PriceSeries::new("AAA", Vec::new()).unwrap();
        assert!(ReturnSeriesBuilder::build(&prices).is_err());
    }
}
