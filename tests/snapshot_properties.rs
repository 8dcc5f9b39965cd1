//! End-to-end properties of the aggregation pass

use pretty_assertions::assert_eq;
use stress_flux::config::{BubbleScale, ReasonScope};
use stress_flux::types::{HslColor, Position};
use stress_flux::{logs_to_snapshot, Aggregator, AggregatorConfig, MetricsSnapshot, Record};

fn mixed_records() -> Vec<Record> {
    let reasons = ["workload", "exams", "family", "workload", "sleep", "", "exams", "workload"];
    let categories = [Some("Low"), Some("High"), None, Some("Medium"), Some("Unknown")];

    let mut records = Vec::new();
    for i in 0..40 {
        if i % 3 == 0 {
            records.push(Record::not_stressed().with_id(format!("n{i}")));
        } else {
            let reason = reasons[i % reasons.len()];
            let reason = if i % 7 == 0 { None } else { Some(reason) };
            let category = categories[i % categories.len()];
            records.push(Record::stressed(category, reason).with_id(format!("s{i}")));
        }
    }
    records
}

fn assert_invariants(snapshot: &MetricsSnapshot, scale: &BubbleScale) {
    assert_eq!(
        snapshot.stressed_count + snapshot.not_stressed_count,
        snapshot.total_count
    );
    assert!(snapshot.severity_counts.total() <= snapshot.stressed_count);
    assert!(snapshot.reason_frequency.total() <= snapshot.stressed_count);
    assert!(snapshot.reason_frequency.iter().all(|e| e.count >= 1));
    assert_eq!(snapshot.bubbles.len(), snapshot.reason_frequency.len());

    for a in &snapshot.bubbles {
        assert!(a.radius >= scale.min_radius && a.radius <= scale.max_radius);
        for b in &snapshot.bubbles {
            if a.count > b.count {
                assert!(a.radius >= b.radius);
            }
        }
    }
}

#[test]
fn aggregation_is_idempotent() {
    let records = mixed_records();
    let aggregator = Aggregator::default();

    let first = aggregator.aggregate(&records);
    let second = aggregator.aggregate(&records);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn invariants_hold_for_mixed_input() {
    let snapshot = Aggregator::default().aggregate(&mixed_records());
    assert_invariants(&snapshot, &BubbleScale::default());
    assert!(snapshot.total_count > 0);
    assert!(!snapshot.bubbles.is_empty());
}

#[test]
fn invariants_hold_with_heavy_reason() {
    let records: Vec<Record> = (0..30)
        .map(|i| Record::stressed(Some("High"), Some(if i < 25 { "workload" } else { "exams" })))
        .collect();

    let snapshot = Aggregator::default().aggregate(&records);
    assert_invariants(&snapshot, &BubbleScale::default());
    assert_eq!(snapshot.bubbles[0].radius, 180.0);
    assert_eq!(snapshot.bubbles[1].radius, 125.0);
}

#[test]
fn empty_input_yields_empty_snapshot() {
    let snapshot = Aggregator::default().aggregate(&[]);

    assert_eq!(snapshot.total_count, 0);
    assert_eq!(snapshot.stressed_count, 0);
    assert_eq!(snapshot.not_stressed_count, 0);
    assert_eq!(snapshot.severity_counts.as_array(), [0, 0, 0]);
    assert!(snapshot.reason_frequency.is_empty());
    assert!(snapshot.bubbles.is_empty());
}

#[test]
fn scenario_a_workload() {
    let records = vec![
        Record::stressed(Some("Low"), Some("workload")),
        Record::stressed(Some("High"), Some("workload")),
        Record::not_stressed(),
    ];

    let snapshot = Aggregator::default().aggregate(&records);

    assert_eq!(snapshot.total_count, 3);
    assert_eq!(snapshot.stressed_count, 2);
    assert_eq!(snapshot.not_stressed_count, 1);
    assert_eq!(snapshot.severity_counts.as_array(), [1, 0, 1]);
    assert_eq!(snapshot.reason_frequency.len(), 1);
    assert_eq!(snapshot.reason_frequency.get("workload"), Some(2));

    assert_eq!(snapshot.bubbles.len(), 1);
    let bubble = &snapshot.bubbles[0];
    assert_eq!(bubble.label, "workload");
    assert_eq!(bubble.count, 2);
    assert_eq!(bubble.radius, 80.0);
    assert_eq!(bubble.position, Position { x: 1, y: 2 });
    assert_eq!(
        bubble.color,
        HslColor { hue: 0, saturation: 70, lightness: 50 }
    );
}

#[test]
fn scenario_b_unknown_category() {
    let records = vec![
        Record::stressed(Some("Unknown"), Some("workload")),
        Record::stressed(Some("Medium"), None),
    ];

    let snapshot = Aggregator::default().aggregate(&records);

    assert_eq!(snapshot.stressed_count, 2);
    assert_eq!(snapshot.severity_counts.as_array(), [0, 1, 0]);
    assert_eq!(snapshot.reason_frequency.get("workload"), Some(1));
}

#[test]
fn scenario_c_ten_distinct_reasons() {
    let records: Vec<Record> = (0..10)
        .map(|i| Record::stressed(Some("Low"), Some(format!("reason-{i}").as_str())))
        .collect();

    let snapshot = Aggregator::default().aggregate(&records);

    assert_eq!(snapshot.bubbles.len(), 10);
    assert!(snapshot.bubbles.iter().all(|b| b.radius == 65.0));

    let hues: Vec<u16> = snapshot.bubbles.iter().map(|b| b.color.hue).collect();
    let expected: Vec<u16> = (0..10).map(|i| ((i * 60) % 360) as u16).collect();
    assert_eq!(hues, expected);

    let labels: Vec<&str> = snapshot.bubbles.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels[0], "reason-0");
    assert_eq!(labels[9], "reason-9");
}

#[test]
fn not_stressed_reasons_are_ignored_by_default() {
    let records = vec![
        Record {
            stress_category: Some("High".to_string()),
            stress_reason: Some("workload".to_string()),
            ..Record::not_stressed()
        },
        Record::stressed(Some("Low"), Some("exams")),
    ];

    let stressed_only = Aggregator::default().aggregate(&records);
    assert_eq!(stressed_only.severity_counts.as_array(), [1, 0, 0]);
    assert_eq!(stressed_only.reason_frequency.get("workload"), None);

    let config = AggregatorConfig::default().with_scope(ReasonScope::AllRecords);
    let all_records = Aggregator::new(config).unwrap().aggregate(&records);
    assert_eq!(all_records.severity_counts.as_array(), [1, 0, 1]);
    assert_eq!(all_records.reason_frequency.get("workload"), Some(1));
    assert_eq!(all_records.bubbles[0].label, "workload");
}

#[test]
fn snapshot_json_preserves_orders() {
    let snapshot = logs_to_snapshot(
        r#"[
            {"Stress_label": "Stressed", "Stress_category": "High", "Stress_Reason": "zeta"},
            {"Stress_label": "Stressed", "Stress_category": "Low", "Stress_Reason": "alpha"},
            {"Stress_label": "Stressed", "Stress_category": "High", "Stress_Reason": "zeta"}
        ]"#,
    )
    .unwrap();

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains(r#""severity_counts":[1,0,2]"#));
    assert!(json.contains(r#""reason_frequency":{"zeta":2,"alpha":1}"#));

    let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn mistyped_fields_are_dropped_not_fatal() {
    let snapshot = logs_to_snapshot(
        r#"[
            {"_id": "1", "Stress_label": "Stressed", "Stress_category": "Low", "Stress_Reason": "workload"},
            {"_id": "2", "Stress_label": 5},
            {"_id": "3", "Stress_label": "Stressed", "Stress_category": 7, "Stress_Reason": 9},
            {"_id": "4", "Stress_label": null, "Stress_Reason": "workload"}
        ]"#,
    )
    .unwrap();

    assert_eq!(snapshot.total_count, 2);
    assert_eq!(snapshot.stressed_count, 2);
    assert_eq!(snapshot.severity_counts.as_array(), [1, 0, 0]);
    assert_eq!(snapshot.reason_frequency.get("workload"), Some(1));
    assert_eq!(snapshot.reason_frequency.len(), 1);
}

#[test]
fn many_distinct_reasons() {
    let records: Vec<Record> = (0..50_000)
        .map(|i| Record::stressed(Some("Low"), Some(format!("reason-{i}").as_str())))
        .collect();

    let snapshot = Aggregator::default().aggregate(&records);

    assert_eq!(snapshot.reason_frequency.len(), 50_000);
    assert_eq!(snapshot.reason_frequency.get("reason-49999"), Some(1));
    assert_eq!(snapshot.bubbles.len(), 50_000);
    assert_eq!(snapshot.bubbles[49_999].label, "reason-49999");
}
