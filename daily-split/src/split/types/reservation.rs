//! Reservations and the nightly rows they expand into

use chrono::NaiveDate;

use super::CellValue;

/// One booking whose dates, nights and amounts have been validated
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Line of the reservation in the source sheet
    pub line: usize,
    pub reservation_number: CellValue,
    pub apartment: CellValue,
    pub guest_name: CellValue,
    pub channel: CellValue,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    pub booking_date: Option<NaiveDate>,
    /// Nights as booked, always > 0
    pub nights: u32,
    pub base_revenue: f64,
    pub total_revenue: f64,
}

/// One stay night of a reservation
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStayEntry {
    pub reservation_number: CellValue,
    pub apartment: CellValue,
    pub guest_name: CellValue,
    pub channel: CellValue,
    pub booking_date: Option<NaiveDate>,
    pub stay_date: NaiveDate,
    pub nightly_base_revenue: f64,
    pub nightly_total_revenue: f64,
}

/// Dates from `arrival` (inclusive) to `departure` (exclusive)
///
/// Empty when `departure <= arrival`.
pub fn stay_dates(arrival: NaiveDate, departure: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    arrival.iter_days().take_while(move |d| *d < departure)
}

/// Number of stay nights between two dates, 0 for degenerate ranges
pub fn span_nights(arrival: NaiveDate, departure: NaiveDate) -> i64 {
    (departure - arrival).num_days().max(0)
}

impl Reservation {
    /// Nights implied by the arrival and departure dates
    pub fn span_nights(&self) -> i64 {
        span_nights(self.arrival, self.departure)
    }

    /// Expand into one entry per stay night, in date order
    ///
    /// Amounts are divided by the number of rows produced, so they always
    /// sum back to the booked amount even when `nights` disagrees with the
    /// dates.
    pub fn daily_entries(&self) -> Vec<DailyStayEntry> {
        let span = self.span_nights();
        if span == 0 {
            return Vec::new();
        }
        let divisor = span as f64;
        let nightly_base = self.base_revenue / divisor;
        let nightly_total = self.total_revenue / divisor;

        stay_dates(self.arrival, self.departure)
            .map(|stay_date| DailyStayEntry {
                reservation_number: self.reservation_number.clone(),
                apartment: self.apartment.clone(),
                guest_name: self.guest_name.clone(),
                channel: self.channel.clone(),
                booking_date: self.booking_date,
                stay_date,
                nightly_base_revenue: nightly_base,
                nightly_total_revenue: nightly_total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reservation(arrival: NaiveDate, departure: NaiveDate, nights: u32) -> Reservation {
        Reservation {
            line: 2,
            reservation_number: CellValue::from("R1"),
            apartment: CellValue::from("Apt 4"),
            guest_name: CellValue::from("Jane Doe"),
            channel: CellValue::from("Airbnb"),
            arrival,
            departure,
            booking_date: Some(date(2023, 12, 1)),
            nights,
            base_revenue: 300.0,
            total_revenue: 450.0,
        }
    }

    #[test]
    fn test_stay_dates_exclude_departure() {
        let dates: Vec<_> = stay_dates(date(2024, 1, 10), date(2024, 1, 13)).collect();
        assert_eq!(dates, vec![date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 12)]);
    }

    #[test]
    fn test_stay_dates_degenerate_ranges() {
        assert_eq!(stay_dates(date(2024, 1, 10), date(2024, 1, 10)).count(), 0);
        assert_eq!(stay_dates(date(2024, 1, 10), date(2024, 1, 5)).count(), 0);
        assert_eq!(span_nights(date(2024, 1, 10), date(2024, 1, 5)), 0);
    }

    #[test]
    fn test_stay_dates_cross_month_and_leap_day() {
        let dates: Vec<_> = stay_dates(date(2024, 2, 28), date(2024, 3, 2)).collect();
        assert_eq!(dates, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn test_daily_entries_divide_revenue() {
        let entries = reservation(date(2024, 1, 10), date(2024, 1, 13), 3).daily_entries();
        assert_eq!(entries.len(), 3);
        for entry in &entries {
            assert_eq!(entry.nightly_base_revenue, 100.0);
            assert_eq!(entry.nightly_total_revenue, 150.0);
            assert_eq!(entry.reservation_number, CellValue::from("R1"));
            assert_eq!(entry.booking_date, Some(date(2023, 12, 1)));
        }
        assert_eq!(entries[0].stay_date, date(2024, 1, 10));
        assert_eq!(entries[2].stay_date, date(2024, 1, 12));
    }

    #[test]
    fn test_daily_entries_divide_by_date_span_when_nights_disagree() {
        let r = reservation(date(2024, 1, 10), date(2024, 1, 13), 2);
        let entries = r.daily_entries();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.nightly_base_revenue == 100.0));
        let total: f64 = entries.iter().map(|e| e.nightly_total_revenue).sum();
        assert!((total - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_entries_conserve_revenue_for_uneven_split() {
        let mut r = reservation(date(2024, 5, 1), date(2024, 5, 8), 7);
        r.base_revenue = 1000.0;
        r.total_revenue = 1234.56;
        let entries = r.daily_entries();

        let base: f64 = entries.iter().map(|e| e.nightly_base_revenue).sum();
        let total: f64 = entries.iter().map(|e| e.nightly_total_revenue).sum();
        assert!((base - 1000.0).abs() < 1e-9);
        assert!((total - 1234.56).abs() < 1e-9);
    }
}
