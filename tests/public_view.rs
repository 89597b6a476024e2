mod common;

use common::{Lottery, date, result_by_number};
use lottery_results::ErrorKind;

#[tokio::test]
async fn test_unregistered_prizes_have_placeholders() {
    let lottery = Lottery::new();
    let plan = lottery.clasica().await;
    lottery.draw(plan.id, "100").await;
    let mayor = lottery
        .results
        .create_result(result_by_number("100", "MAYOR", "1234"))
        .await
        .unwrap();

    let view = lottery.public.public_view("100").await.unwrap();
    assert_eq!(view.draw_number, "100");
    assert_eq!(view.date, date(2025, 3, 14));
    assert_eq!(view.results.len(), 2);

    let first = &view.results[0];
    assert_eq!(first.prize_title, "MAYOR");
    assert_eq!(first.display_value, "$2.000 millones");
    assert_eq!(first.winning_numbers.as_deref(), Some("1234"));
    assert_eq!(first.result_id, Some(mayor.id));

    let second = &view.results[1];
    assert_eq!(second.prize_title, "SECO 36");
    assert_eq!(second.prize_id, plan.prizes[1].id);
    assert_eq!(second.winning_numbers, None);
    assert_eq!(second.result_id, None);
}

#[tokio::test]
async fn test_rows_follow_prize_order_not_registration_order() {
    let lottery = Lottery::new();
    let plan = lottery.clasica().await;
    lottery.draw(plan.id, "100").await;
    lottery
        .results
        .create_result(result_by_number("100", "SECO 36", "5678"))
        .await
        .unwrap();
    lottery
        .results
        .create_result(result_by_number("100", "MAYOR", "1234"))
        .await
        .unwrap();

    let view = lottery.public.public_view("100").await.unwrap();
    let rows: Vec<(&str, Option<&str>)> = view
        .results
        .iter()
        .map(|r| (r.prize_title.as_str(), r.winning_numbers.as_deref()))
        .collect();
    assert_eq!(rows, [("MAYOR", Some("1234")), ("SECO 36", Some("5678"))]);
}

#[tokio::test]
async fn test_repeated_views_are_identical() {
    let lottery = Lottery::new();
    let plan = lottery.clasica().await;
    lottery.draw(plan.id, "Extra").await;
    lottery
        .results
        .create_result(result_by_number("Extra", "MAYOR", "0042"))
        .await
        .unwrap();

    let first = serde_json::to_string(&lottery.public.public_view("Extra").await.unwrap()).unwrap();
    let second =
        serde_json::to_string(&lottery.public.public_view("Extra").await.unwrap()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\"winning_numbers\":null"));
    assert!(first.contains("\"date\":\"2025-03-14\""));
}

#[tokio::test]
async fn test_view_of_draw_without_results() {
    let lottery = Lottery::new();
    let plan = lottery.clasica().await;
    lottery.draw(plan.id, "100").await;

    let view = lottery.public.public_view("100").await.unwrap();
    assert!(view.results.iter().all(|r| r.winning_numbers.is_none()));
}

#[tokio::test]
async fn test_unknown_draw_number() {
    let lottery = Lottery::new();
    let plan = lottery.clasica().await;
    lottery.draw(plan.id, "100").await;

    for number in ["101", "0100", ""] {
        let err = lottery.public.public_view(number).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
