//! Field validation and display formatting for service records.
//!
//! All functions are pure; callers collect the messages from
//! [`validate_entry`] and show every problem at once instead of failing on
//! the first.

/// Fixed catalog of service categories.
pub fn service_types() -> &'static [&'static str] {
    &[
        "Full Detail",
        "Interior Detail",
        "Exterior Detail",
        "Polish & Wax",
        "Basic Wash",
        "Engine Bay",
        "Headlight Restoration",
        "Paint Correction",
        "Ceramic Coating",
        "Quick Detail",
    ]
}

/// Fixed catalog of work bays/areas.
pub fn locations() -> &'static [&'static str] {
    &[
        "Bay 1",
        "Bay 2",
        "Bay 3",
        "Bay 4",
        "Outside Area",
        "Prep Area",
        "Detail Shop",
    ]
}

/// Plate: non-empty after trim, 2-10 chars, letters/digits/hyphen/space.
pub fn is_valid_plate(plate: &str) -> bool {
    let plate = plate.trim();
    let len = plate.chars().count();
    if !(2..=10).contains(&len) {
        return false;
    }
    plate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ')
}

/// Hours worked on a single job: more than zero, at most a full day.
pub fn is_valid_hours(hours: f64) -> bool {
    hours > 0.0 && hours <= 24.0
}

/// Technician name: trimmed length 2-50, letters/spaces/apostrophe/hyphen.
pub fn is_valid_technician_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    if !(2..=50).contains(&len) {
        return false;
    }
    name.chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
}

/// Canonical stored form of a plate.
pub fn format_license_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Display form of an hours value: "2h" for whole hours, "2.5h" otherwise.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}h", hours as i64)
    } else {
        format!("{:.1}h", hours)
    }
}

/// Run every field check and collect all failures.
pub fn validate_entry(
    license_plate: &str,
    service_type: &str,
    technician: &str,
    location: Option<&str>,
    hours: f64,
) -> Vec<String> {
    let mut errors = Vec::new();

    if !is_valid_plate(license_plate) {
        errors.push(
            "License plate must be 2-10 characters long and contain only letters, numbers, spaces, and hyphens.".to_string(),
        );
    }

    if !service_types().contains(&service_type) {
        errors.push("Service type must be one of the catalog entries.".to_string());
    }

    if !is_valid_technician_name(technician) {
        errors.push(
            "Technician name must be 2-50 characters long and contain only letters, spaces, apostrophes, and hyphens.".to_string(),
        );
    }

    if let Some(loc) = location {
        if loc.trim().is_empty() {
            errors.push("Location must not be blank when provided.".to_string());
        }
    }

    if !is_valid_hours(hours) {
        errors.push("Hours must be greater than 0 and at most 24.".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_accepts_common_formats() {
        assert!(is_valid_plate("ABC-123"));
        assert!(is_valid_plate(" abc 123 "));
        assert!(is_valid_plate("AB"));
    }

    #[test]
    fn plate_rejects_bad_input() {
        assert!(!is_valid_plate(""));
        assert!(!is_valid_plate("   "));
        assert!(!is_valid_plate("A"));
        assert!(!is_valid_plate("ABCDEFGHIJK"));
        assert!(!is_valid_plate("AB#12"));
    }

    #[test]
    fn hours_bounds_are_exclusive_zero_inclusive_24() {
        assert!(!is_valid_hours(0.0));
        assert!(is_valid_hours(0.25));
        assert!(is_valid_hours(24.0));
        assert!(!is_valid_hours(24.01));
        assert!(!is_valid_hours(-1.0));
    }

    #[test]
    fn technician_names() {
        assert!(is_valid_technician_name("Jane Doe"));
        assert!(is_valid_technician_name("O'Neil-Smith"));
        assert!(!is_valid_technician_name("J"));
        assert!(!is_valid_technician_name("Jane2"));
        assert!(!is_valid_technician_name(&"x".repeat(51)));
    }

    #[test]
    fn catalogs_are_stable() {
        assert!(service_types().contains(&"Full Detail"));
        assert!(locations().contains(&"Bay 1"));
        assert_eq!(service_types().len(), 10);
        assert_eq!(locations().len(), 7);
    }

    #[test]
    fn plate_formatting() {
        assert_eq!(format_license_plate(" abc-123 "), "ABC-123");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(2.0), "2h");
        assert_eq!(format_hours(2.5), "2.5h");
    }

    #[test]
    fn validate_entry_collects_every_failure() {
        let errors = validate_entry("!", "Nope", "X", Some("  "), 25.0);
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn validate_entry_passes_clean_input() {
        let errors = validate_entry(" abc-123 ", "Full Detail", "Jane Doe", Some("Bay 1"), 2.5);
        assert!(errors.is_empty());

        // location is optional in the canonical schema
        let errors = validate_entry("ABC-123", "Quick Detail", "Bob", None, 1.0);
        assert!(errors.is_empty());
    }
}
