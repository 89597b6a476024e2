//! 删除保护
//!
//! 每类实体的删除规则以静态规则表声明：
//! - `Block`: 存在依赖记录时拒绝删除 (计划 -> 开奖, 奖项 -> 结果)
//! - `Cascade`: 先删除依赖记录再删除本体 (计划 -> 奖项, 开奖 -> 结果)
//!
//! 开奖是历史记录，任何删除都不会级联到开奖；开奖自身的结果则随开奖一起删除。
//! 规则的检查与级联都在调用方传入的同一事务内执行，部分级联对外不可见。

use crate::entities::result_entity;
use crate::error::{AppError, AppResult};
use crate::store::StoreTx;

/// 存在即阻止删除的依赖 (历史记录)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarded {
    PlanDraws,
    PrizeResults,
}

/// 随本体一起删除的依赖
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owned {
    PlanPrizes,
    DrawResults,
}

/// 删除规则：策略与依赖类型绑定，历史记录在类型上无法被级联
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionRule {
    Block(Guarded),
    Cascade(Owned),
}

pub const PLAN_RULES: &[DeletionRule] = &[
    DeletionRule::Block(Guarded::PlanDraws),
    DeletionRule::Cascade(Owned::PlanPrizes),
];

pub const PRIZE_RULES: &[DeletionRule] = &[DeletionRule::Block(Guarded::PrizeResults)];

pub const DRAW_RULES: &[DeletionRule] = &[DeletionRule::Cascade(Owned::DrawResults)];

/// 删除结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// 被级联删除的依赖记录数
    pub cascaded: usize,
}

impl Guarded {
    fn blocked_message(self, owner_id: i64) -> String {
        match self {
            Guarded::PlanDraws => format!(
                "Plan {owner_id} cannot be deleted: historical draws are associated with it"
            ),
            Guarded::PrizeResults => format!(
                "Prize {owner_id} cannot be deleted: results are already registered for it"
            ),
        }
    }

    async fn exist<T: StoreTx>(self, tx: &mut T, owner_id: i64) -> AppResult<bool> {
        match self {
            Guarded::PlanDraws => tx.plan_has_draws(owner_id).await,
            Guarded::PrizeResults => tx.prize_has_results(owner_id).await,
        }
    }
}

impl Owned {
    async fn purge<T: StoreTx>(self, tx: &mut T, owner_id: i64) -> AppResult<usize> {
        match self {
            Owned::PlanPrizes => {
                let prizes = tx.prizes_by_plan(owner_id).await?;
                for prize in &prizes {
                    tx.delete_prize(prize.id).await?;
                }
                Ok(prizes.len())
            }
            Owned::DrawResults => {
                let results = tx.results_by_draw(owner_id).await?;
                for result in &results {
                    tx.delete_result(result.id).await?;
                }
                Ok(results.len())
            }
        }
    }
}

/// 先检查全部 Block 规则，再执行 Cascade 规则
async fn enforce<T: StoreTx>(
    tx: &mut T,
    owner_id: i64,
    rules: &[DeletionRule],
) -> AppResult<DeletionReport> {
    for rule in rules {
        if let DeletionRule::Block(guarded) = *rule
            && guarded.exist(tx, owner_id).await?
        {
            let message = guarded.blocked_message(owner_id);
            log::warn!("Deletion blocked: {message}");
            return Err(AppError::Conflict(message));
        }
    }

    let mut report = DeletionReport::default();
    for rule in rules {
        if let DeletionRule::Cascade(owned) = *rule {
            report.cascaded += owned.purge(tx, owner_id).await?;
        }
    }
    Ok(report)
}

/// 删除计划：存在开奖则拒绝，否则级联删除其全部奖项
pub async fn delete_plan<T: StoreTx>(tx: &mut T, plan_id: i64) -> AppResult<DeletionReport> {
    if tx.get_plan(plan_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Plan {plan_id} not found")));
    }
    let report = enforce(tx, plan_id, PLAN_RULES).await?;
    tx.delete_plan(plan_id).await?;
    Ok(report)
}

/// 删除奖项：已有结果引用则拒绝
pub async fn delete_prize<T: StoreTx>(tx: &mut T, prize_id: i64) -> AppResult<DeletionReport> {
    if tx.get_prize(prize_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Prize {prize_id} not found")));
    }
    let report = enforce(tx, prize_id, PRIZE_RULES).await?;
    tx.delete_prize(prize_id).await?;
    Ok(report)
}

/// 删除开奖：级联删除其全部结果
pub async fn delete_draw<T: StoreTx>(tx: &mut T, draw_id: i64) -> AppResult<DeletionReport> {
    if tx.get_draw(draw_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Draw {draw_id} not found")));
    }
    let report = enforce(tx, draw_id, DRAW_RULES).await?;
    tx.delete_draw(draw_id).await?;
    Ok(report)
}

/// 删除结果：无下游依赖，无条件删除
pub async fn delete_result<T: StoreTx>(
    tx: &mut T,
    draw_id: i64,
    prize_id: i64,
) -> AppResult<result_entity::Model> {
    let result = tx.find_result(draw_id, prize_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Result for draw {draw_id} and prize {prize_id} not found"
        ))
    })?;
    tx.delete_result(result.id).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_rules_run_before_cascades() {
        // 计划：先确认没有开奖，再级联奖项
        assert_eq!(
            PLAN_RULES,
            &[
                DeletionRule::Block(Guarded::PlanDraws),
                DeletionRule::Cascade(Owned::PlanPrizes),
            ]
        );
        assert_eq!(PRIZE_RULES, &[DeletionRule::Block(Guarded::PrizeResults)]);
    }

    #[test]
    fn test_draw_results_cascade() {
        assert_eq!(DRAW_RULES, &[DeletionRule::Cascade(Owned::DrawResults)]);
    }

    #[test]
    fn test_blocked_messages_name_the_dependents() {
        assert!(Guarded::PlanDraws.blocked_message(3).contains("historical draws"));
        assert!(
            Guarded::PrizeResults
                .blocked_message(3)
                .contains("results are already registered")
        );
    }
}
