use crate::error::{AppError, AppResult};
use crate::models::{CreateDrawRequest, DeleteConfirmation, DrawResponse, UpdateDrawRequest};
use crate::services::{integrity, validation};
use crate::store::{NewDraw, Store, StoreTx};

#[derive(Clone)]
pub struct DrawService<S> {
    store: S,
}

impl<S: Store> DrawService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 基于已有计划创建开奖
    pub async fn create_draw(&self, request: CreateDrawRequest) -> AppResult<DrawResponse> {
        let mut tx = self.store.begin().await?;
        validation::validate_draw_mutation(&mut tx, request.plan_id, &request.draw_number, None)
            .await?;
        let draw = tx
            .insert_draw(NewDraw {
                draw_number: request.draw_number,
                draw_date: request.date,
                plan_id: request.plan_id,
            })
            .await?;
        tx.commit().await?;

        log::info!(
            "Created draw {} ('{}') for plan {}",
            draw.id,
            draw.draw_number,
            draw.plan_id
        );
        Ok(draw.into())
    }

    pub async fn list_draws(&self) -> AppResult<Vec<DrawResponse>> {
        let mut tx = self.store.begin().await?;
        let draws = tx.list_draws().await?;
        Ok(draws.into_iter().map(Into::into).collect())
    }

    pub async fn get_draw(&self, draw_id: i64) -> AppResult<DrawResponse> {
        let mut tx = self.store.begin().await?;
        let draw = tx
            .get_draw(draw_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;
        Ok(draw.into())
    }

    /// 更新期号 / 日期；所属计划保持不变
    pub async fn update_draw(
        &self,
        draw_id: i64,
        request: UpdateDrawRequest,
    ) -> AppResult<DrawResponse> {
        let mut tx = self.store.begin().await?;
        let mut draw = tx
            .get_draw(draw_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;

        if let Some(draw_number) = request.draw_number {
            draw.draw_number = draw_number;
        }
        if let Some(date) = request.date {
            draw.draw_date = date;
        }
        validation::validate_draw_mutation(&mut tx, draw.plan_id, &draw.draw_number, Some(draw.id))
            .await?;

        let draw = tx.update_draw(draw).await?;
        tx.commit().await?;

        log::info!("Updated draw {draw_id}");
        Ok(draw.into())
    }

    /// 删除开奖并级联删除其全部结果
    pub async fn delete_draw(&self, draw_id: i64) -> AppResult<DeleteConfirmation> {
        let mut tx = self.store.begin().await?;
        let report = integrity::delete_draw(&mut tx, draw_id).await?;
        tx.commit().await?;

        log::info!(
            "Deleted draw {draw_id} and {} result(s)",
            report.cascaded
        );
        Ok(DeleteConfirmation::new(format!(
            "Draw {draw_id} and its {} result(s) deleted",
            report.cascaded
        )))
    }
}
