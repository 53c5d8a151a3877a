//! Field checks and derived totals used by the record forms

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9\s\-().]{5,18}[0-9]$").expect("Invalid regex"));
static PLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9]{1,4}[\s\-]?[A-Z0-9]{1,5}$").expect("Invalid regex"));
// VINs never use I, O or Q
static VIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-HJ-NPR-Z0-9]{17}$").expect("Invalid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

pub fn is_valid_license_plate(plate: &str) -> bool {
    PLATE_RE.is_match(plate.trim())
}

pub fn is_valid_vin(vin: &str) -> bool {
    VIN_RE.is_match(vin.trim())
}

/// Names of `fields` that are absent, null or blank in `record`
pub fn validate_required(fields: &[&str], record: &Value) -> Vec<String> {
    fields
        .iter()
        .filter(|field| match record.get(**field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .map(|field| field.to_string())
        .collect()
}

/// Cost of a fill-up, rounded to cents
pub fn fuel_total_cost(liters: f64, price_per_liter: f64) -> f64 {
    (liters * price_per_liter * 100.0).round() / 100.0
}

/// Distance per liter, or `None` when no fuel was used
pub fn fuel_efficiency(distance: f64, liters: f64) -> Option<f64> {
    if liters <= 0.0 {
        None
    } else {
        Some(distance / liters)
    }
}
