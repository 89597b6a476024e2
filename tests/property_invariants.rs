mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;

use common::{Lottery, date, prize, result_by_number};
use lottery_results::ErrorKind;
use lottery_results::models::{CreateDrawRequest, CreatePlanRequest};
use lottery_results::services::WinningNumbersPolicy;

#[derive(Debug, Clone)]
enum Action {
    CreatePlan { prizes: u8, ball_count: i32 },
    CreateDraw { plan: u8 },
    Register { draw: u8, prize: u8, len: u8 },
    DeletePlan { target: u8 },
    DeletePrize { target: u8 },
    DeleteDraw { target: u8 },
    DeleteResult { draw: u8, prize: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..4, 1i32..6).prop_map(|(prizes, ball_count)| Action::CreatePlan { prizes, ball_count }),
        (0u8..16).prop_map(|plan| Action::CreateDraw { plan }),
        (0u8..16, 0u8..16, 0u8..8).prop_map(|(draw, prize, len)| Action::Register { draw, prize, len }),
        (0u8..16).prop_map(|target| Action::DeletePlan { target }),
        (0u8..16).prop_map(|target| Action::DeletePrize { target }),
        (0u8..16).prop_map(|target| Action::DeleteDraw { target }),
        (0u8..16, 0u8..16).prop_map(|(draw, prize)| Action::DeleteResult { draw, prize }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn pick<T: Copy>(items: &[T], index: u8) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[usize::from(index) % items.len()])
    }
}

fn digits(len: u8) -> String {
    (0..len).map(|i| char::from(b'0' + i % 10)).collect()
}

/// 全部结果都引用存在的开奖与同计划的奖项，且长度满足 ball_count
async fn check_references(lottery: &Lottery) -> Result<(), TestCaseError> {
    let plans = lottery.plans.list_plans().await.unwrap();
    let prizes: BTreeMap<i64, _> = plans
        .iter()
        .flat_map(|p| p.prizes.iter().map(|z| (z.id, z.clone())))
        .collect();

    for draw in lottery.draws.list_draws().await.unwrap() {
        prop_assert!(plans.iter().any(|p| p.id == draw.plan_id));
        for result in lottery.results.list_results(draw.id).await.unwrap() {
            let prize = prizes.get(&result.prize_id);
            prop_assert!(prize.is_some(), "result {} references a missing prize", result.id);
            let prize = prize.unwrap();
            prop_assert_eq!(prize.plan_id, draw.plan_id);
            prop_assert!(result.winning_numbers.chars().count() >= prize.ball_count as usize);
        }
    }
    Ok(())
}

async fn run(actions: Vec<Action>) -> Result<(), TestCaseError> {
    let lottery = Lottery::new();
    let mut next_draw = 0u32;

    for action in actions {
        let plans = lottery.plans.list_plans().await.unwrap();
        let plan_ids: Vec<i64> = plans.iter().map(|p| p.id).collect();
        let prize_ids: Vec<i64> = plans.iter().flat_map(|p| p.prizes.iter().map(|z| z.id)).collect();
        let draws = lottery.draws.list_draws().await.unwrap();
        let draw_ids: Vec<i64> = draws.iter().map(|d| d.id).collect();

        match action {
            Action::CreatePlan { prizes, ball_count } => {
                let request = CreatePlanRequest {
                    name: format!("Plan {}", plans.len()),
                    description: None,
                    prizes: (0..prizes)
                        .map(|i| prize(&format!("P{i}"), "$1", ball_count))
                        .collect(),
                };
                lottery.plans.create_plan(request).await.unwrap();
            }
            Action::CreateDraw { plan } => {
                let Some(plan_id) = pick(&plan_ids, plan) else { continue };
                next_draw += 1;
                lottery
                    .draws
                    .create_draw(CreateDrawRequest {
                        draw_number: format!("{next_draw:03}"),
                        date: date(2025, 1, 1),
                        plan_id,
                    })
                    .await
                    .unwrap();
            }
            Action::Register { draw, prize, len } => {
                let Some(draw) = pick(&draw_ids, draw).and_then(|id| draws.iter().find(|d| d.id == id)) else {
                    continue;
                };
                let plan = plans.iter().find(|p| p.id == draw.plan_id).unwrap();
                let Some(target) = pick(&plan.prizes.iter().map(|z| z.id).collect::<Vec<_>>(), prize) else {
                    continue;
                };
                let target = plan.prizes.iter().find(|z| z.id == target).unwrap();
                let outcome = lottery
                    .results
                    .create_result(result_by_number(&draw.draw_number, &target.title, &digits(len)))
                    .await;
                match outcome {
                    Ok(_) => prop_assert!(i32::from(len) >= target.ball_count),
                    Err(err) if err.kind() == ErrorKind::InvalidInput => {
                        prop_assert!(i32::from(len) < target.ball_count)
                    }
                    Err(err) => prop_assert_eq!(err.kind(), ErrorKind::Conflict),
                }
            }
            Action::DeletePlan { target } => {
                let Some(plan_id) = pick(&plan_ids, target) else { continue };
                let had_draws = draws.iter().any(|d| d.plan_id == plan_id);
                match lottery.plans.delete_plan(plan_id).await {
                    Ok(_) => prop_assert!(!had_draws),
                    Err(err) => {
                        prop_assert!(had_draws);
                        prop_assert_eq!(err.kind(), ErrorKind::Conflict);
                        // 被拒绝的删除不改变任何数据
                        let after = lottery.plans.get_plan(plan_id).await.unwrap();
                        let before = plans.iter().find(|p| p.id == plan_id).unwrap();
                        prop_assert_eq!(&after, before);
                    }
                }
            }
            Action::DeletePrize { target } => {
                let Some(prize_id) = pick(&prize_ids, target) else { continue };
                let mut referenced = false;
                for draw_id in &draw_ids {
                    let results = lottery.results.list_results(*draw_id).await.unwrap();
                    referenced |= results.iter().any(|r| r.prize_id == prize_id);
                }
                match lottery.prizes.delete_prize(prize_id).await {
                    Ok(_) => prop_assert!(!referenced),
                    Err(err) => {
                        prop_assert!(referenced);
                        prop_assert_eq!(err.kind(), ErrorKind::Conflict);
                    }
                }
            }
            Action::DeleteDraw { target } => {
                let Some(draw_id) = pick(&draw_ids, target) else { continue };
                lottery.draws.delete_draw(draw_id).await.unwrap();
                let err = lottery.results.list_results(draw_id).await.unwrap_err();
                prop_assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            Action::DeleteResult { draw, prize } => {
                let Some(draw_id) = pick(&draw_ids, draw) else { continue };
                let Some(prize_id) = pick(&prize_ids, prize) else { continue };
                let existed = lottery
                    .results
                    .list_results(draw_id)
                    .await
                    .unwrap()
                    .iter()
                    .any(|r| r.prize_id == prize_id);
                let outcome = lottery.results.delete_result(draw_id, prize_id).await;
                prop_assert_eq!(outcome.is_ok(), existed);
            }
        }

        check_references(&lottery).await?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_operations_preserve_referential_integrity(actions in prop::collection::vec(action_strategy(), 1..60)) {
        runtime().block_on(run(actions))?;
    }

    #[test]
    fn payload_length_policy_matches_ball_count(ball_count in 1i32..8, len in 0u8..12) {
        for policy in [
            WinningNumbersPolicy::AtLeast,
            WinningNumbersPolicy::Exact,
            WinningNumbersPolicy::ExactPlusOne,
        ] {
            let accepted = runtime().block_on(async {
                let lottery = Lottery::with_policy(policy);
                let plan = lottery
                    .plans
                    .create_plan(CreatePlanRequest {
                        name: "Clásica".into(),
                        description: None,
                        prizes: vec![prize("MAYOR", "$1", ball_count)],
                    })
                    .await
                    .unwrap();
                lottery.draw(plan.id, "100").await;
                lottery
                    .results
                    .create_result(result_by_number("100", "MAYOR", &digits(len)))
                    .await
            });

            let len = usize::from(len);
            let ball_count = ball_count as usize;
            let expected = match policy {
                WinningNumbersPolicy::AtLeast => len >= ball_count,
                WinningNumbersPolicy::Exact => len == ball_count,
                WinningNumbersPolicy::ExactPlusOne => len == ball_count + 1,
            };
            prop_assert_eq!(accepted.is_ok(), expected);
            if let Err(err) = accepted {
                prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
            }
        }
    }
}
