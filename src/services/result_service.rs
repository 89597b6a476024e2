use crate::entities::{draw_entity, prize_entity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateResultRequest, DeleteConfirmation, DrawRef, ResultResponse};
use crate::services::integrity;
use crate::services::validation::{self, WinningNumbersPolicy};
use crate::store::{NewResult, Store, StoreTx};

#[derive(Clone)]
pub struct ResultService<S> {
    store: S,
    policy: WinningNumbersPolicy,
}

/// 按 id 或期号解析开奖
pub async fn resolve_draw<T: StoreTx>(tx: &mut T, draw: &DrawRef) -> AppResult<draw_entity::Model> {
    let found = match draw {
        DrawRef::Id(id) => tx.get_draw(*id).await?,
        DrawRef::Number(number) => tx.find_draw_by_number(number).await?,
    };
    found.ok_or_else(|| AppError::NotFound(format!("Draw {draw} not found")))
}

/// 在开奖所属计划内按标题精确解析奖项 (不做模糊匹配或大小写折叠)
pub async fn resolve_prize<T: StoreTx>(
    tx: &mut T,
    draw: &draw_entity::Model,
    title: &str,
) -> AppResult<prize_entity::Model> {
    tx.find_prize_by_title(draw.plan_id, title)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prize '{title}' does not exist")))
}

impl<S: Store> ResultService<S> {
    pub fn new(store: S, policy: WinningNumbersPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> WinningNumbersPolicy {
        self.policy
    }

    /// 录入开奖结果
    ///
    /// 逻辑:
    /// 1. 解析开奖 (id 或期号)
    /// 2. 在开奖所属计划内按标题解析奖项
    /// 3. 校验号码长度
    /// 4. 同一 (开奖, 奖项) 已有结果则冲突，修改须走 update_result
    /// 5. 写入；并发重复写入由唯一索引兜底
    pub async fn create_result(&self, request: CreateResultRequest) -> AppResult<ResultResponse> {
        let mut tx = self.store.begin().await?;
        let draw = resolve_draw(&mut tx, &request.draw).await?;
        let prize = resolve_prize(&mut tx, &draw, &request.prize_title).await?;
        validation::validate_result_payload(&prize, &request.winning_numbers, self.policy)?;

        if tx.find_result(draw.id, prize.id).await?.is_some() {
            log::warn!(
                "Duplicate result for draw '{}' prize '{}'",
                draw.draw_number,
                prize.title
            );
            return Err(AppError::Conflict(format!(
                "A result for prize '{}' is already registered in draw '{}'",
                prize.title, draw.draw_number
            )));
        }

        let result = tx
            .insert_result(NewResult {
                draw_id: draw.id,
                prize_id: prize.id,
                winning_numbers: request.winning_numbers,
            })
            .await?;
        tx.commit().await?;

        log::info!(
            "Registered result {} for draw '{}' prize '{}'",
            result.id,
            draw.draw_number,
            prize.title
        );
        Ok(result.into())
    }

    /// 修正已有结果的中奖号码
    pub async fn update_result(
        &self,
        draw_id: i64,
        prize_id: i64,
        winning_numbers: String,
    ) -> AppResult<ResultResponse> {
        let mut tx = self.store.begin().await?;
        let mut result = tx.find_result(draw_id, prize_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Result for draw {draw_id} and prize {prize_id} not found"
            ))
        })?;
        let prize = tx
            .get_prize(prize_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;
        validation::validate_result_payload(&prize, &winning_numbers, self.policy)?;

        result.winning_numbers = winning_numbers;
        let result = tx.update_result(result).await?;
        tx.commit().await?;

        log::info!("Updated result {} (draw {draw_id}, prize {prize_id})", result.id);
        Ok(result.into())
    }

    pub async fn delete_result(&self, draw_id: i64, prize_id: i64) -> AppResult<DeleteConfirmation> {
        let mut tx = self.store.begin().await?;
        let result = integrity::delete_result(&mut tx, draw_id, prize_id).await?;
        tx.commit().await?;

        log::info!("Deleted result {} (draw {draw_id}, prize {prize_id})", result.id);
        Ok(DeleteConfirmation::new("Result deleted"))
    }

    /// 某期开奖的全部结果
    pub async fn list_results(&self, draw_id: i64) -> AppResult<Vec<ResultResponse>> {
        let mut tx = self.store.begin().await?;
        if tx.get_draw(draw_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Draw {draw_id} not found")));
        }
        let results = tx.results_by_draw(draw_id).await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}
