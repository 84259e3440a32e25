use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::{
    add_on::{AddOn, AddOnCatalog, Surcharge},
    booking::{BookingDraft, StayDates},
};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    pub id: String,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub nights: u32,
    pub nightly_rate: f64,
    pub room_subtotal: f64,
    pub surcharges: Vec<PriceLine>,
    pub total: f64,
    pub currency: String,
}

impl PriceQuote {
    /// A stay without a positive night count has no computable total.
    pub fn is_computable(&self) -> bool {
        self.nights > 0
    }
}

pub struct PricingService;

impl PricingService {
    /// Whole nights between two instants, partial days rounded up, never negative
    pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> u32 {
        let seconds = (check_out - check_in).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        ((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY) as u32
    }

    /// Nights for a calendar date pair; 0 when either date is missing or out of order
    pub fn nights(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
        match (check_in, check_out) {
            (Some(check_in), Some(check_out)) => Self::nights_between(
                check_in.and_time(NaiveTime::MIN).and_utc(),
                check_out.and_time(NaiveTime::MIN).and_utc(),
            ),
            _ => 0,
        }
    }

    /// Amount a single add-on contributes on top of the room subtotal
    pub fn surcharge_amount(add_on: &AddOn, room_subtotal: f64) -> f64 {
        match add_on.surcharge {
            Surcharge::Flat(amount) => amount,
            Surcharge::Percent(rate) => room_subtotal * rate / 100.0,
        }
    }

    /// Price a stay. Selected add-ons are applied in catalog order, unknown ids are ignored.
    pub fn quote(
        dates: &StayDates,
        nightly_rate: f64,
        selected_add_ons: &[String],
        catalog: &AddOnCatalog,
        currency: &str,
    ) -> PriceQuote {
        let nights = Self::nights(dates.check_in, dates.check_out);
        if nights == 0 {
            return PriceQuote {
                nights: 0,
                nightly_rate,
                room_subtotal: 0.0,
                surcharges: Vec::new(),
                total: 0.0,
                currency: currency.to_string(),
            };
        }

        let room_subtotal = round_cents(nights as f64 * nightly_rate);
        let surcharges: Vec<PriceLine> = catalog
            .iter()
            .filter(|add_on| selected_add_ons.iter().any(|id| id == &add_on.id))
            .map(|add_on| PriceLine {
                id: add_on.id.clone(),
                label: add_on.label.clone(),
                amount: round_cents(Self::surcharge_amount(add_on, room_subtotal)),
            })
            .collect();

        let total = surcharges
            .iter()
            .fold(room_subtotal, |total, line| total + line.amount);

        PriceQuote {
            nights,
            nightly_rate,
            room_subtotal,
            surcharges,
            total: round_cents(total),
            currency: currency.to_string(),
        }
    }

    /// Price the current state of a draft; no room selected prices at a zero rate
    pub fn quote_draft(draft: &BookingDraft, catalog: &AddOnCatalog, currency: &str) -> PriceQuote {
        let rate = draft
            .selected_room
            .as_ref()
            .map(|room| room.nightly_rate)
            .unwrap_or(0.0);
        Self::quote(&draft.dates, rate, &draft.add_ons, catalog, currency)
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn selected(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_nights_for_date_pairs() {
        assert_eq!(PricingService::nights(Some(date(2026, 3, 1)), Some(date(2026, 3, 4))), 3);
        assert_eq!(PricingService::nights(Some(date(2026, 2, 27)), Some(date(2026, 3, 2))), 3);
        assert_eq!(PricingService::nights(Some(date(2026, 3, 4)), Some(date(2026, 3, 4))), 0);
        assert_eq!(PricingService::nights(Some(date(2026, 3, 4)), Some(date(2026, 3, 1))), 0);
        assert_eq!(PricingService::nights(None, Some(date(2026, 3, 1))), 0);
        assert_eq!(PricingService::nights(None, None), 0);
    }

    #[test]
    fn test_partial_days_round_up() {
        let check_in = Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2026, 3, 3, 11, 0, 0).unwrap();
        assert_eq!(PricingService::nights_between(check_in, check_out), 2);

        let check_out = Utc.with_ymd_and_hms(2026, 3, 3, 15, 0, 0).unwrap();
        assert_eq!(PricingService::nights_between(check_in, check_out), 3);
    }

    #[test]
    fn test_rate_times_nights_without_add_ons() {
        let dates = StayDates::new(date(2026, 3, 1), date(2026, 3, 6));
        let quote = PricingService::quote(&dates, 120.5, &[], &AddOnCatalog::default(), "USD");
        assert_eq!(quote.nights, 5);
        assert_eq!(quote.total, 602.5);
        assert!(quote.surcharges.is_empty());
    }

    #[test]
    fn test_late_checkout_scenario() {
        let dates = StayDates::new(date(2026, 3, 1), date(2026, 3, 4));
        let quote = PricingService::quote(
            &dates,
            300.0,
            &selected(&["late_checkout"]),
            &AddOnCatalog::default(),
            "USD",
        );
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.room_subtotal, 900.0);
        assert_eq!(quote.total, 1050.0);
    }

    #[test]
    fn test_flat_fee_independent_of_nights() {
        let catalog = AddOnCatalog::default();
        for nights in [1, 2, 7, 30] {
            let dates = StayDates::new(
                date(2026, 1, 1),
                date(2026, 1, 1) + chrono::Duration::days(nights),
            );
            let without = PricingService::quote(&dates, 99.0, &[], &catalog, "USD");
            let with = PricingService::quote(
                &dates,
                99.0,
                &selected(&["airport_pickup"]),
                &catalog,
                "USD",
            );
            assert_eq!(with.total - without.total, 75.0);
        }
    }

    #[test]
    fn test_percent_surcharge_uses_room_subtotal() {
        let dates = StayDates::new(date(2026, 3, 1), date(2026, 3, 3));
        let quote = PricingService::quote(
            &dates,
            200.0,
            &selected(&["breakfast", "late_checkout"]),
            &AddOnCatalog::default(),
            "USD",
        );
        let ids: Vec<&str> = quote.surcharges.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["late_checkout", "breakfast"]);
        assert_eq!(quote.surcharges[1].amount, 40.0);
        assert_eq!(quote.total, 400.0 + 150.0 + 40.0);
    }

    #[test]
    fn test_zero_nights_is_not_an_error() {
        let quote = PricingService::quote(
            &StayDates::default(),
            300.0,
            &selected(&["late_checkout"]),
            &AddOnCatalog::default(),
            "USD",
        );
        assert_eq!(quote.nights, 0);
        assert_eq!(quote.total, 0.0);
        assert!(!quote.is_computable());

        let same_day = StayDates::new(date(2026, 3, 4), date(2026, 3, 4));
        let quote = PricingService::quote(&same_day, 300.0, &[], &AddOnCatalog::default(), "USD");
        assert_eq!(quote.total, 0.0);
    }
}
