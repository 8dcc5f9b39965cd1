//! Generate a dashboard payload for renderer testing

fn main() {
    let json = r#"[
        { "_id": "m1", "Stress_label": "Stressed", "Stress_category": "High", "Stress_Reason": "workload" },
        { "_id": "m2", "Stress_label": "Stressed", "Stress_category": "Medium", "Stress_Reason": "exams" },
        { "_id": "m3", "Stress_label": "Not Stressed" },
        { "_id": "m4", "Stress_label": "Stressed", "Stress_category": "Low", "Stress_Reason": "workload" },
        { "_id": "m5", "Stress_label": "Stressed", "Stress_Reason": "family" }
    ]"#;

    match stress_flux::logs_to_dashboard_json(json, stress_flux::AggregatorConfig::default()) {
        Ok(payload) => print!("{payload}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
