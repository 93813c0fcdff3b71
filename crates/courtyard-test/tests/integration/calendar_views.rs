//! Calendar views over the seeded community.

use salvo::http::StatusCode;
use serde_json::Value;

use super::helpers::*;

fn busy_days(grid: &Value) -> Vec<(String, Vec<String>)> {
    grid["cells"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|cell| cell["entries"].as_array().is_some_and(|e| !e.is_empty()))
        .map(|cell| {
            (
                cell["date"].as_str().unwrap_or_default().to_string(),
                titles(&cell["entries"]),
            )
        })
        .collect()
}

#[test_log::test(tokio::test)]
async fn week_agenda_orders_by_local_time() {
    let app = TestApp::new().await;

    let agenda = app
        .send(TestRequest::get("/calendar/agenda?days=7"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(titles(&agenda), ["Saturday market", "Courtyard clean-up"]);
    assert_eq!(agenda[0]["date"], "2024-06-15");
    assert_eq!(agenda[0]["starts_at"], "2024-06-15T06:00:00Z");
    assert_eq!(agenda[0]["ends_at"], "2024-06-15T10:00:00Z");
    assert_eq!(agenda[1]["date"], "2024-06-15");
}

#[test_log::test(tokio::test)]
async fn fortnight_agenda_shows_first_occurrence_only() {
    let app = TestApp::new().await;

    let agenda = app
        .send(TestRequest::get("/calendar/agenda?days=14"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    let market: Vec<&Value> = agenda
        .as_array()
        .into_iter()
        .flatten()
        .filter(|entry| entry["event_id"] == MARKET.to_string())
        .collect();
    assert_eq!(market.len(), 1);
    assert_eq!(market[0]["date"], "2024-06-15");
}

#[test_log::test(tokio::test)]
async fn june_grid_honours_series_until() {
    let app = TestApp::new().await;

    let grid = app
        .send(TestRequest::get("/calendar/month?year=2024&month=6"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(grid["cells"].as_array().map(Vec::len), Some(30));
    let expected: Vec<(String, Vec<String>)> = [
        ("2024-06-01", vec!["Saturday market"]),
        ("2024-06-08", vec!["Saturday market"]),
        ("2024-06-15", vec!["Saturday market", "Courtyard clean-up"]),
        ("2024-06-22", vec!["Saturday market"]),
        ("2024-06-30", vec!["Summer festival"]),
    ]
    .into_iter()
    .map(|(day, titles)| {
        (
            day.to_string(),
            titles.into_iter().map(str::to_string).collect(),
        )
    })
    .collect();
    assert_eq!(busy_days(&grid), expected);
}

#[tokio::test]
async fn july_grid_continues_all_day_range() {
    let app = TestApp::new().await;

    let grid = app
        .send(TestRequest::get("/calendar/month?year=2024&month=7"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    let days: Vec<String> = busy_days(&grid).into_iter().map(|(day, _)| day).collect();
    assert_eq!(days, ["2024-07-01", "2024-07-02", "2024-07-15"]);
}

#[tokio::test]
async fn upcoming_lists_soonest_first() {
    let app = TestApp::new().await;

    let upcoming = app
        .send(TestRequest::get("/calendar/upcoming"))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(
        titles(&upcoming),
        [
            "Saturday market",
            "Courtyard clean-up",
            "Summer festival"
        ]
    );

    let limited = app
        .send(TestRequest::get("/calendar/upcoming?limit=1"))
        .await
        .json();
    assert_eq!(titles(&limited), ["Saturday market"]);
}

#[tokio::test]
async fn clock_drives_the_current_month() {
    let app = TestApp::at("2024-06-30T21:30:00Z").await;

    let grid = app
        .send(TestRequest::get("/calendar/month"))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(grid["month"], 7);
}

#[tokio::test]
async fn malformed_rule_is_reported_for_its_event_only() {
    let app = TestApp::new().await;

    app.send(TestRequest::get(&format!(
        "/events/{BROKEN}/occurrences?from=2024-06-01&to=2024-06-30"
    )))
    .await
    .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let occurrences = app
        .send(TestRequest::get(&format!(
            "/events/{CLEAN_UP}/occurrences?from=2024-01-01&to=2024-04-15"
        )))
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(occurrences["rule"], "FREQ=MONTHLY");
    assert_eq!(
        occurrences["dates"],
        serde_json::json!(["2024-01-15", "2024-02-15", "2024-03-15", "2024-04-15"])
    );
}

#[tokio::test]
async fn festival_occurrences_span_month_boundary() {
    let app = TestApp::new().await;

    let occurrences = app
        .send(TestRequest::get(&format!(
            "/events/{FESTIVAL}/occurrences?from=2024-06-01&to=2024-07-31"
        )))
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(
        occurrences["dates"],
        serde_json::json!(["2024-06-30", "2024-07-01", "2024-07-02"])
    );
}
