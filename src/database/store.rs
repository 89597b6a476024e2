use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{
    draw_entity as draws, plan_entity as plans, prize_entity as prizes, result_entity as results,
};
use crate::error::{AppError, AppResult};
use crate::store::{NewDraw, NewPlan, NewPrize, NewResult, Store, StoreTx};

/// 基于 sea-orm (PostgreSQL) 的实体存储
#[derive(Clone)]
pub struct SeaOrmStore {
    pool: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    type Tx = SeaOrmTx;

    async fn begin(&self) -> AppResult<SeaOrmTx> {
        let txn = self.pool.begin().await?;
        Ok(SeaOrmTx { txn })
    }
}

/// 数据库事务；未 commit 即被丢弃时由 sea-orm 自动回滚
pub struct SeaOrmTx {
    txn: DatabaseTransaction,
}

fn ensure_deleted(rows_affected: u64, what: &str, id: i64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("{what} {id} not found")));
    }
    Ok(())
}

#[async_trait]
impl StoreTx for SeaOrmTx {
    async fn get_plan(&mut self, id: i64) -> AppResult<Option<plans::Model>> {
        Ok(plans::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn list_plans(&mut self) -> AppResult<Vec<plans::Model>> {
        Ok(plans::Entity::find()
            .order_by_asc(plans::Column::Id)
            .all(&self.txn)
            .await?)
    }

    async fn insert_plan(&mut self, plan: NewPlan) -> AppResult<plans::Model> {
        let model = plans::ActiveModel {
            name: Set(plan.name),
            description: Set(plan.description),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(model)
    }

    async fn update_plan(&mut self, plan: plans::Model) -> AppResult<plans::Model> {
        let model = plans::ActiveModel {
            id: Unchanged(plan.id),
            name: Set(plan.name),
            description: Set(plan.description),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.txn)
        .await?;
        Ok(model)
    }

    async fn delete_plan(&mut self, id: i64) -> AppResult<()> {
        let res = plans::Entity::delete_by_id(id).exec(&self.txn).await?;
        ensure_deleted(res.rows_affected, "Plan", id)
    }

    async fn get_prize(&mut self, id: i64) -> AppResult<Option<prizes::Model>> {
        Ok(prizes::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn prizes_by_plan(&mut self, plan_id: i64) -> AppResult<Vec<prizes::Model>> {
        Ok(prizes::Entity::find()
            .filter(prizes::Column::PlanId.eq(plan_id))
            .order_by_asc(prizes::Column::Id)
            .all(&self.txn)
            .await?)
    }

    async fn find_prize_by_title(
        &mut self,
        plan_id: i64,
        title: &str,
    ) -> AppResult<Option<prizes::Model>> {
        Ok(prizes::Entity::find()
            .filter(prizes::Column::PlanId.eq(plan_id))
            .filter(prizes::Column::Title.eq(title))
            .one(&self.txn)
            .await?)
    }

    async fn insert_prize(&mut self, prize: NewPrize) -> AppResult<prizes::Model> {
        let model = prizes::ActiveModel {
            plan_id: Set(prize.plan_id),
            title: Set(prize.title),
            display_value: Set(prize.display_value),
            ball_count: Set(prize.ball_count),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(model)
    }

    async fn update_prize(&mut self, prize: prizes::Model) -> AppResult<prizes::Model> {
        let model = prizes::ActiveModel {
            id: Unchanged(prize.id),
            title: Set(prize.title),
            display_value: Set(prize.display_value),
            ball_count: Set(prize.ball_count),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.txn)
        .await?;
        Ok(model)
    }

    async fn delete_prize(&mut self, id: i64) -> AppResult<()> {
        let res = prizes::Entity::delete_by_id(id).exec(&self.txn).await?;
        ensure_deleted(res.rows_affected, "Prize", id)
    }

    async fn get_draw(&mut self, id: i64) -> AppResult<Option<draws::Model>> {
        Ok(draws::Entity::find_by_id(id).one(&self.txn).await?)
    }

    async fn find_draw_by_number(&mut self, draw_number: &str) -> AppResult<Option<draws::Model>> {
        Ok(draws::Entity::find()
            .filter(draws::Column::DrawNumber.eq(draw_number))
            .one(&self.txn)
            .await?)
    }

    async fn list_draws(&mut self) -> AppResult<Vec<draws::Model>> {
        Ok(draws::Entity::find()
            .order_by_asc(draws::Column::Id)
            .all(&self.txn)
            .await?)
    }

    async fn plan_has_draws(&mut self, plan_id: i64) -> AppResult<bool> {
        let first = draws::Entity::find()
            .filter(draws::Column::PlanId.eq(plan_id))
            .one(&self.txn)
            .await?;
        Ok(first.is_some())
    }

    async fn insert_draw(&mut self, draw: NewDraw) -> AppResult<draws::Model> {
        let model = draws::ActiveModel {
            draw_number: Set(draw.draw_number),
            draw_date: Set(draw.draw_date),
            plan_id: Set(draw.plan_id),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(model)
    }

    async fn update_draw(&mut self, draw: draws::Model) -> AppResult<draws::Model> {
        // plan_id 不参与更新
        let model = draws::ActiveModel {
            id: Unchanged(draw.id),
            draw_number: Set(draw.draw_number),
            draw_date: Set(draw.draw_date),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.txn)
        .await?;
        Ok(model)
    }

    async fn delete_draw(&mut self, id: i64) -> AppResult<()> {
        let res = draws::Entity::delete_by_id(id).exec(&self.txn).await?;
        ensure_deleted(res.rows_affected, "Draw", id)
    }

    async fn find_result(
        &mut self,
        draw_id: i64,
        prize_id: i64,
    ) -> AppResult<Option<results::Model>> {
        Ok(results::Entity::find()
            .filter(results::Column::DrawId.eq(draw_id))
            .filter(results::Column::PrizeId.eq(prize_id))
            .one(&self.txn)
            .await?)
    }

    async fn results_by_draw(&mut self, draw_id: i64) -> AppResult<Vec<results::Model>> {
        Ok(results::Entity::find()
            .filter(results::Column::DrawId.eq(draw_id))
            .order_by_asc(results::Column::Id)
            .all(&self.txn)
            .await?)
    }

    async fn prize_has_results(&mut self, prize_id: i64) -> AppResult<bool> {
        let first = results::Entity::find()
            .filter(results::Column::PrizeId.eq(prize_id))
            .one(&self.txn)
            .await?;
        Ok(first.is_some())
    }

    async fn insert_result(&mut self, result: NewResult) -> AppResult<results::Model> {
        let model = results::ActiveModel {
            draw_id: Set(result.draw_id),
            prize_id: Set(result.prize_id),
            winning_numbers: Set(result.winning_numbers),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(model)
    }

    async fn update_result(&mut self, result: results::Model) -> AppResult<results::Model> {
        // 仅更新号码，draw_id / prize_id 保持不变
        let model = results::ActiveModel {
            id: Unchanged(result.id),
            winning_numbers: Set(result.winning_numbers),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.txn)
        .await?;
        Ok(model)
    }

    async fn delete_result(&mut self, id: i64) -> AppResult<()> {
        let res = results::Entity::delete_by_id(id).exec(&self.txn).await?;
        ensure_deleted(res.rows_affected, "Result", id)
    }

    async fn commit(self) -> AppResult<()> {
        self.txn.commit().await?;
        Ok(())
    }
}
