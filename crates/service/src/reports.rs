//! Pure reductions over record sequences, consumed by report views.
//! Plain floating-point summation; data volumes here never need more.

use std::collections::{HashMap, HashSet};

use models::entry;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DurationStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub total: f64,
}

/// Min/max/avg/total over `hours`. All zeros on empty input.
pub fn duration_stats(rows: &[entry::Model]) -> DurationStats {
    if rows.is_empty() {
        return DurationStats::default();
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut total = 0.0;
    for row in rows {
        min = min.min(row.hours);
        max = max.max(row.hours);
        total += row.hours;
    }
    DurationStats { min, max, avg: total / rows.len() as f64, total }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TechnicianStats {
    pub entry_count: u64,
    pub total_hours: f64,
    pub unique_service_types: usize,
}

/// Per-technician entry count, hour total and distinct service types.
pub fn stats_by_technician(rows: &[entry::Model]) -> HashMap<String, TechnicianStats> {
    let mut types: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut stats: HashMap<String, TechnicianStats> = HashMap::new();
    for row in rows {
        let s = stats.entry(row.technician.clone()).or_default();
        s.entry_count += 1;
        s.total_hours += row.hours;
        types
            .entry(row.technician.as_str())
            .or_default()
            .insert(row.service_type.as_str());
    }
    for (tech, set) in types {
        if let Some(s) = stats.get_mut(tech) {
            s.unique_service_types = set.len();
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(technician: &str, service_type: &str, hours: f64) -> entry::Model {
        entry::Model {
            id: 0,
            license_plate: "ABC-123".into(),
            service_type: service_type.into(),
            technician: technician.into(),
            location: None,
            hours,
            entry_date: "2024-06-01".parse().unwrap(),
            notes: None,
            photos: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duration_stats_over_mixed_hours() {
        let rows = vec![
            row("Jane", "Full Detail", 2.0),
            row("Jane", "Basic Wash", 0.5),
            row("Bob", "Full Detail", 3.5),
        ];
        let stats = duration_stats(&rows);
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 3.5);
        assert_eq!(stats.total, 6.0);
        assert_eq!(stats.avg, 2.0);
    }

    #[test]
    fn duration_stats_empty_is_zeroed() {
        assert_eq!(duration_stats(&[]), DurationStats::default());
    }

    #[test]
    fn technician_grouping() {
        let rows = vec![
            row("Jane", "Full Detail", 2.0),
            row("Jane", "Basic Wash", 1.0),
            row("Jane", "Full Detail", 1.5),
            row("Bob", "Quick Detail", 0.5),
        ];
        let stats = stats_by_technician(&rows);
        assert_eq!(stats.len(), 2);

        let jane = &stats["Jane"];
        assert_eq!(jane.entry_count, 3);
        assert_eq!(jane.total_hours, 4.5);
        assert_eq!(jane.unique_service_types, 2);

        let bob = &stats["Bob"];
        assert_eq!(bob.entry_count, 1);
        assert_eq!(bob.unique_service_types, 1);
    }
}
