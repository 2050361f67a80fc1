//! Built-in travel policies.
//!
//! Each policy reads the field paths and thresholds it needs from
//! [`PolicyConfig`] when it is constructed.

use serde_json::Value;

use super::{Policy, PolicyConfig, PolicyContext, PolicyOutcome};
use crate::OUT_OF_POLICY_FLAG;
use crate::types::payload::get_path;
use crate::types::value::{as_number, display};

pub const NOT_CHEAPEST_DIRECT: &str = "not_cheapest_direct";
pub const NO_LUXURY_HOTEL_FOR_JUNIORS: &str = "no_luxury_hotel_for_juniors";
pub const BUSINESS_CLASS_REQUIRES_LONG_HAUL: &str = "business_class_requires_long_haul";
pub const MAX_DISCOUNT_CAP: &str = "max_discount_cap";
pub const RULE_MARKED_OUT_OF_POLICY: &str = "rule_marked_out_of_policy";

fn number_at(payload: &Value, path: &str) -> Option<f64> {
    get_path(payload, path).and_then(as_number)
}

fn num(n: f64) -> String {
    display(&Value::from(n))
}

/// The selected flight must cost the same as the cheapest direct option,
/// within the configured tolerance.
///
/// A candidate is direct when `is_direct` is `true` or `stops` is `0`. With no
/// priced direct candidate the booking is in policy; with no selected price it
/// is not.
#[derive(Debug, Clone)]
pub struct NotCheapestDirect {
    selected_price_field: String,
    candidates_field: String,
    candidate_price_field: String,
    tolerance: f64,
}

impl NotCheapestDirect {
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            selected_price_field: config.selected_price_field.clone(),
            candidates_field: config.candidates_field.clone(),
            candidate_price_field: config.candidate_price_field.clone(),
            tolerance: config.price_tolerance,
        }
    }

    fn cheapest_direct(&self, payload: &Value) -> Option<f64> {
        get_path(payload, &self.candidates_field)?
            .as_array()?
            .iter()
            .filter(|option| is_direct(option))
            .filter_map(|option| number_at(option, &self.candidate_price_field))
            .min_by(f64::total_cmp)
    }
}

fn is_direct(option: &Value) -> bool {
    option.get("is_direct") == Some(&Value::Bool(true))
        || option.get("stops").and_then(as_number) == Some(0.0)
}

impl Policy for NotCheapestDirect {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        let payload = ctx.payload();
        let Some(selected) = number_at(payload, &self.selected_price_field) else {
            return PolicyOutcome::OutOfPolicy(format!(
                "selected price '{}' is missing",
                self.selected_price_field
            ));
        };
        let Some(cheapest) = self.cheapest_direct(payload) else {
            return PolicyOutcome::InPolicy("no direct flight options to compare".to_owned());
        };
        if (selected - cheapest).abs() <= self.tolerance {
            PolicyOutcome::InPolicy(format!(
                "selected price {} is the cheapest direct fare ({})",
                num(selected),
                num(cheapest)
            ))
        } else if selected > cheapest {
            PolicyOutcome::OutOfPolicy(format!(
                "selected price {} exceeds cheapest direct fare {}",
                num(selected),
                num(cheapest)
            ))
        } else {
            PolicyOutcome::OutOfPolicy(format!(
                "selected price {} is below every direct fare (cheapest {}); selection is not a direct option",
                num(selected),
                num(cheapest)
            ))
        }
    }
}

/// Junior travelers may not book hotels at or above the luxury tier.
#[derive(Debug, Clone)]
pub struct NoLuxuryHotelForJuniors {
    traveler_class_field: String,
    junior_class: String,
    hotel_tier_field: String,
    luxury_tier: f64,
}

impl NoLuxuryHotelForJuniors {
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            traveler_class_field: config.traveler_class_field.clone(),
            junior_class: config.junior_class.clone(),
            hotel_tier_field: config.hotel_tier_field.clone(),
            luxury_tier: config.luxury_hotel_tier,
        }
    }
}

impl Policy for NoLuxuryHotelForJuniors {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        let payload = ctx.payload();
        let is_junior = get_path(payload, &self.traveler_class_field)
            .and_then(Value::as_str)
            .is_some_and(|class| class.eq_ignore_ascii_case(&self.junior_class));
        if !is_junior {
            return PolicyOutcome::InPolicy("traveler is not junior".to_owned());
        }
        match number_at(payload, &self.hotel_tier_field) {
            Some(tier) if tier >= self.luxury_tier => PolicyOutcome::OutOfPolicy(format!(
                "junior traveler booked a tier {} hotel (luxury from tier {})",
                num(tier),
                num(self.luxury_tier)
            )),
            Some(tier) => PolicyOutcome::InPolicy(format!(
                "hotel tier {} is below luxury tier {}",
                num(tier),
                num(self.luxury_tier)
            )),
            None => PolicyOutcome::InPolicy("no hotel tier in booking".to_owned()),
        }
    }
}

/// Premium cabins need a long flight or manager approval.
#[derive(Debug, Clone)]
pub struct BusinessClassRequiresLongHaul {
    cabin_class_field: String,
    premium_cabins: Vec<String>,
    duration_field: String,
    min_hours: f64,
    approval_field: String,
}

impl BusinessClassRequiresLongHaul {
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            cabin_class_field: config.cabin_class_field.clone(),
            premium_cabins: config.premium_cabins.clone(),
            duration_field: config.flight_duration_field.clone(),
            min_hours: config.min_business_class_hours,
            approval_field: config.manager_approval_field.clone(),
        }
    }
}

impl Policy for BusinessClassRequiresLongHaul {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        let payload = ctx.payload();
        let Some(cabin) = get_path(payload, &self.cabin_class_field)
            .and_then(Value::as_str)
            .filter(|cabin| {
                self.premium_cabins
                    .iter()
                    .any(|premium| premium.eq_ignore_ascii_case(cabin))
            })
        else {
            return PolicyOutcome::InPolicy("cabin is not premium".to_owned());
        };
        if get_path(payload, &self.approval_field) == Some(&Value::Bool(true)) {
            return PolicyOutcome::InPolicy(format!("{cabin} cabin approved by manager"));
        }
        match number_at(payload, &self.duration_field) {
            Some(hours) if hours < self.min_hours => PolicyOutcome::OutOfPolicy(format!(
                "{cabin} cabin on a {}h flight needs at least {}h or manager approval",
                num(hours),
                num(self.min_hours)
            )),
            Some(hours) => PolicyOutcome::InPolicy(format!(
                "{cabin} cabin allowed on a {}h flight",
                num(hours)
            )),
            None => PolicyOutcome::InPolicy("no flight duration in booking".to_owned()),
        }
    }
}

/// A rule may not cut the selected price by more than the configured share.
///
/// Only meaningful after an execution; without a result the booking is in
/// policy.
#[derive(Debug, Clone)]
pub struct MaxDiscountCap {
    price_field: String,
    max_percent: f64,
}

impl MaxDiscountCap {
    #[must_use]
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            price_field: config.selected_price_field.clone(),
            max_percent: config.max_discount_percent,
        }
    }
}

impl Policy for MaxDiscountCap {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        let Some(result) = ctx.result else {
            return PolicyOutcome::InPolicy("no rule was executed".to_owned());
        };
        let before = number_at(ctx.original, &self.price_field);
        let after = number_at(result.updated_payload(), &self.price_field);
        let (Some(before), Some(after)) = (before, after) else {
            return PolicyOutcome::InPolicy(format!("'{}' is not a comparable price", self.price_field));
        };
        if before <= 0.0 || after >= before {
            return PolicyOutcome::InPolicy("price was not reduced".to_owned());
        }
        let percent = (before - after) / before * 100.0;
        let rounded = (percent * 100.0).round() / 100.0;
        if percent > self.max_percent {
            PolicyOutcome::OutOfPolicy(format!(
                "discount of {}% exceeds the {}% cap",
                num(rounded),
                num(self.max_percent)
            ))
        } else {
            PolicyOutcome::InPolicy(format!(
                "discount of {}% is within the {}% cap",
                num(rounded),
                num(self.max_percent)
            ))
        }
    }
}

/// Out of policy when a `mark_out_of_policy` action flagged the booking.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleMarkedOutOfPolicy;

impl Policy for RuleMarkedOutOfPolicy {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        if get_path(ctx.payload(), OUT_OF_POLICY_FLAG) == Some(&Value::Bool(true)) {
            PolicyOutcome::OutOfPolicy("a rule marked the booking out of policy".to_owned())
        } else {
            PolicyOutcome::InPolicy("no rule marked the booking".to_owned())
        }
    }
}
