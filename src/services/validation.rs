//! 写入前校验
//!
//! 结构校验为纯函数；跨实体校验在调用方的事务内读取存储，
//! 与随后的写入处于同一事务。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::prize_entity;
use crate::error::{AppError, AppResult};
use crate::store::StoreTx;

/// 中奖号码长度策略
///
/// - `AtLeast`: 长度 >= ball_count (默认；允许附带系列号等后缀)
/// - `Exact`: 长度 == ball_count
/// - `ExactPlusOne`: 长度 == ball_count + 1 (号码 + 一位系列号)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinningNumbersPolicy {
    #[default]
    AtLeast,
    Exact,
    ExactPlusOne,
}

impl WinningNumbersPolicy {
    pub fn accepts(self, length: usize, ball_count: usize) -> bool {
        match self {
            WinningNumbersPolicy::AtLeast => length >= ball_count,
            WinningNumbersPolicy::Exact => length == ball_count,
            WinningNumbersPolicy::ExactPlusOne => length == ball_count + 1,
        }
    }
}

impl fmt::Display for WinningNumbersPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinningNumbersPolicy::AtLeast => write!(f, "at_least"),
            WinningNumbersPolicy::Exact => write!(f, "exact"),
            WinningNumbersPolicy::ExactPlusOne => write!(f, "exact_plus_one"),
        }
    }
}

impl FromStr for WinningNumbersPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "at_least" => Ok(WinningNumbersPolicy::AtLeast),
            "exact" => Ok(WinningNumbersPolicy::Exact),
            "exact_plus_one" => Ok(WinningNumbersPolicy::ExactPlusOne),
            other => Err(AppError::ConfigError(format!(
                "Unknown winning numbers policy: {other}"
            ))),
        }
    }
}

/// 计划名称去除首尾空白后不能为空
pub fn validate_plan_mutation(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("Plan name must not be empty".into()));
    }
    Ok(())
}

/// 校验奖项写入
///
/// `current` 为被更新奖项自身的 id，标题唯一性检查时排除自身。
pub async fn validate_prize_mutation<T: StoreTx>(
    tx: &mut T,
    plan_id: i64,
    title: &str,
    ball_count: i32,
    current: Option<i64>,
) -> AppResult<()> {
    if tx.get_plan(plan_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Plan {plan_id} not found")));
    }
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("Prize title must not be empty".into()));
    }
    if ball_count < 1 {
        return Err(AppError::InvalidInput(format!(
            "ball_count must be at least 1, got {ball_count}"
        )));
    }
    // 与结果录入使用相同的精确匹配 (区分大小写)
    if let Some(existing) = tx.find_prize_by_title(plan_id, title).await?
        && Some(existing.id) != current
    {
        return Err(AppError::Conflict(format!(
            "Prize '{title}' already exists in plan {plan_id}"
        )));
    }
    Ok(())
}

/// 校验开奖写入；期号全局唯一 (不限于同一计划)
pub async fn validate_draw_mutation<T: StoreTx>(
    tx: &mut T,
    plan_id: i64,
    draw_number: &str,
    current: Option<i64>,
) -> AppResult<()> {
    if tx.get_plan(plan_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Plan {plan_id} not found")));
    }
    if draw_number.trim().is_empty() {
        return Err(AppError::InvalidInput("Draw number must not be empty".into()));
    }
    if let Some(existing) = tx.find_draw_by_number(draw_number).await?
        && Some(existing.id) != current
    {
        return Err(AppError::Conflict(format!(
            "Draw number '{draw_number}' is already used by draw {}",
            existing.id
        )));
    }
    Ok(())
}

/// 按奖项的 ball_count 校验中奖号码长度 (按字符计)
pub fn validate_result_payload(
    prize: &prize_entity::Model,
    winning_numbers: &str,
    policy: WinningNumbersPolicy,
) -> AppResult<()> {
    let length = winning_numbers.chars().count();
    let ball_count = usize::try_from(prize.ball_count).unwrap_or(0);
    if policy.accepts(length, ball_count) {
        return Ok(());
    }
    let message = match policy {
        WinningNumbersPolicy::AtLeast => format!(
            "insufficient digits: prize '{}' expects at least {ball_count}, got {length}",
            prize.title
        ),
        WinningNumbersPolicy::Exact => format!(
            "wrong number of digits: prize '{}' expects exactly {ball_count}, got {length}",
            prize.title
        ),
        WinningNumbersPolicy::ExactPlusOne => format!(
            "wrong number of digits: prize '{}' expects exactly {} (number + series), got {length}",
            prize.title,
            ball_count + 1
        ),
    };
    Err(AppError::InvalidInput(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{MemoryStore, NewPlan, NewPrize, Store};

    fn prize(ball_count: i32) -> prize_entity::Model {
        prize_entity::Model {
            id: 1,
            plan_id: 1,
            title: "MAYOR".into(),
            display_value: "$2.000 millones".into(),
            ball_count,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_plan_name_must_not_be_blank() {
        assert!(validate_plan_mutation("Clásica").is_ok());
        let err = validate_plan_mutation("   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_payload_minimum_length() {
        let p = prize(4);
        let policy = WinningNumbersPolicy::AtLeast;
        assert!(validate_result_payload(&p, "1234", policy).is_ok());
        assert!(validate_result_payload(&p, "123456", policy).is_ok());
        assert!(validate_result_payload(&p, "1234567", policy).is_ok());

        let err = validate_result_payload(&p, "12", policy).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("insufficient digits"));
    }

    #[test]
    fn test_payload_exact_policies() {
        let p = prize(4);
        assert!(validate_result_payload(&p, "1234", WinningNumbersPolicy::Exact).is_ok());
        assert!(validate_result_payload(&p, "12345", WinningNumbersPolicy::Exact).is_err());
        assert!(validate_result_payload(&p, "12345", WinningNumbersPolicy::ExactPlusOne).is_ok());
        assert!(validate_result_payload(&p, "1234", WinningNumbersPolicy::ExactPlusOne).is_err());
    }

    #[test]
    fn test_payload_length_counts_characters() {
        // "ñ" 占两个字节，但只算一位
        let p = prize(3);
        assert!(validate_result_payload(&p, "12ñ", WinningNumbersPolicy::Exact).is_ok());
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in [
            WinningNumbersPolicy::AtLeast,
            WinningNumbersPolicy::Exact,
            WinningNumbersPolicy::ExactPlusOne,
        ] {
            assert_eq!(policy.to_string().parse::<WinningNumbersPolicy>().unwrap(), policy);
        }
        assert!("loose".parse::<WinningNumbersPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_prize_mutation_checks() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let plan = tx
            .insert_plan(NewPlan {
                name: "Clásica".into(),
                description: None,
            })
            .await
            .unwrap();
        let mayor = tx
            .insert_prize(NewPrize {
                plan_id: plan.id,
                title: "MAYOR".into(),
                display_value: "$1".into(),
                ball_count: 4,
            })
            .await
            .unwrap();

        let err = validate_prize_mutation(&mut tx, plan.id + 100, "SECO", 4, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = validate_prize_mutation(&mut tx, plan.id, "MAYOR", 4, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // 更新自身时不与自己冲突
        assert!(
            validate_prize_mutation(&mut tx, plan.id, "MAYOR", 4, Some(mayor.id))
                .await
                .is_ok()
        );
        // 标题区分大小写
        assert!(
            validate_prize_mutation(&mut tx, plan.id, "Mayor", 4, None)
                .await
                .is_ok()
        );

        let err = validate_prize_mutation(&mut tx, plan.id, "SECO", 0, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
