use crate::error::{AppError, AppResult};
use crate::models::{CreatePrizeRequest, DeleteConfirmation, PrizeResponse, UpdatePrizeRequest};
use crate::services::{integrity, validation};
use crate::store::{NewPrize, Store, StoreTx};

#[derive(Clone)]
pub struct PrizeService<S> {
    store: S,
}

impl<S: Store> PrizeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 向已有计划新增奖项
    pub async fn add_prize(
        &self,
        plan_id: i64,
        request: CreatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let mut tx = self.store.begin().await?;
        validation::validate_prize_mutation(
            &mut tx,
            plan_id,
            &request.title,
            request.ball_count,
            None,
        )
        .await?;
        let prize = tx
            .insert_prize(NewPrize {
                plan_id,
                title: request.title,
                display_value: request.display_value,
                ball_count: request.ball_count,
            })
            .await?;
        tx.commit().await?;

        log::info!(
            "Added prize {} ('{}') to plan {plan_id}",
            prize.id,
            prize.title
        );
        Ok(prize.into())
    }

    pub async fn get_prize(&self, prize_id: i64) -> AppResult<PrizeResponse> {
        let mut tx = self.store.begin().await?;
        let prize = tx
            .get_prize(prize_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;
        Ok(prize.into())
    }

    /// 部分更新奖项；奖项所属计划不可变更
    ///
    /// 已登记结果不会按新的 ball_count 重新校验。
    pub async fn update_prize(
        &self,
        prize_id: i64,
        request: UpdatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let mut tx = self.store.begin().await?;
        let mut prize = tx
            .get_prize(prize_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;

        if let Some(title) = request.title {
            prize.title = title;
        }
        if let Some(display_value) = request.display_value {
            prize.display_value = display_value;
        }
        if let Some(ball_count) = request.ball_count {
            prize.ball_count = ball_count;
        }
        validation::validate_prize_mutation(
            &mut tx,
            prize.plan_id,
            &prize.title,
            prize.ball_count,
            Some(prize.id),
        )
        .await?;

        let prize = tx.update_prize(prize).await?;
        tx.commit().await?;

        log::info!("Updated prize {prize_id}");
        Ok(prize.into())
    }

    /// 删除奖项；已有结果时拒绝
    pub async fn delete_prize(&self, prize_id: i64) -> AppResult<DeleteConfirmation> {
        let mut tx = self.store.begin().await?;
        integrity::delete_prize(&mut tx, prize_id).await?;
        tx.commit().await?;

        log::info!("Deleted prize {prize_id}");
        Ok(DeleteConfirmation::new(format!("Prize {prize_id} deleted")))
    }
}
