use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use withings_client::parse;

fn meas_body(groups: usize) -> Value {
    let zones = ["Europe/London", "America/Los_Angeles"];
    let grps: Vec<Value> = (0..groups)
        .map(|i| {
            json!({
                "attrib": 0, "category": 1, "created": 1546300800 + i as i64,
                "date": 1546300800 + i as i64, "deviceid": "dev1", "grpid": i,
                "measures": [
                    {"type": 1, "unit": -3, "value": 72345},
                    {"type": 6, "unit": -2, "value": 2150},
                    {"type": 88, "unit": -2, "value": 310}
                ]
            })
        })
        .collect();
    json!({
        "more": false, "offset": 0, "updatetime": 1546300800,
        "timezone": zones[groups % 2], "measuregrps": grps
    })
}

fn activity_body(days: usize) -> Value {
    let activities: Vec<Value> = (0..days)
        .map(|i| {
            json!({
                "date": format!("2019-01-{:02}", i % 28 + 1),
                "timezone": if i % 2 == 0 { "Europe/London" } else { "America/Los_Angeles" },
                "is_tracker": true, "deviceid": "dev1", "brand": 18, "steps": 9000 + i,
                "distance": 6500.5, "elevation": 12, "soft": 3000, "moderate": 1200,
                "intense": 300, "active": 1500, "calories": 350.2, "totalcalories": 2300.8,
                "hr_average": 72, "hr_min": 50, "hr_max": 150
            })
        })
        .collect();
    json!({"more": false, "offset": 0, "activities": activities})
}

fn sleep_body(series: usize) -> Value {
    let series: Vec<Value> = (0..series)
        .map(|i| {
            let start = 1546300800 + (i as i64) * 600;
            let hr: serde_json::Map<String, Value> = (0..10)
                .map(|s| ((start + s * 60).to_string(), json!(55 + s)))
                .collect();
            json!({"startdate": start, "enddate": start + 600, "state": i % 4, "hr": hr})
        })
        .collect();
    json!({"model": 32, "series": series})
}

fn bench_parse(c: &mut Criterion) {
    let meas = meas_body(500);
    let activity = activity_body(365);
    let sleep = sleep_body(200);

    c.bench_function("parse_get_meas_500_groups", |b| {
        b.iter(|| parse::parse_get_meas(black_box(&meas)).expect("meas"))
    });
    c.bench_function("parse_get_activity_365_days", |b| {
        b.iter(|| parse::parse_get_activity(black_box(&activity)).expect("activity"))
    });
    c.bench_function("parse_get_sleep_200_series", |b| {
        b.iter(|| parse::parse_get_sleep(black_box(&sleep)).expect("sleep"))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
