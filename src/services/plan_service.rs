use crate::error::{AppError, AppResult};
use crate::models::{CreatePlanRequest, DeleteConfirmation, PlanResponse, UpdatePlanRequest};
use crate::services::{integrity, validation};
use crate::store::{NewPlan, NewPrize, Store, StoreTx};

#[derive(Clone)]
pub struct PlanService<S> {
    store: S,
}

impl<S: Store> PlanService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 创建计划及其初始奖项 (同一事务)
    pub async fn create_plan(&self, request: CreatePlanRequest) -> AppResult<PlanResponse> {
        validation::validate_plan_mutation(&request.name)?;

        let mut tx = self.store.begin().await?;
        let plan = tx
            .insert_plan(NewPlan {
                name: request.name,
                description: request.description,
            })
            .await?;

        let mut prizes = Vec::with_capacity(request.prizes.len());
        for prize in request.prizes {
            validation::validate_prize_mutation(
                &mut tx,
                plan.id,
                &prize.title,
                prize.ball_count,
                None,
            )
            .await?;
            let created = tx
                .insert_prize(NewPrize {
                    plan_id: plan.id,
                    title: prize.title,
                    display_value: prize.display_value,
                    ball_count: prize.ball_count,
                })
                .await?;
            prizes.push(created);
        }
        tx.commit().await?;

        log::info!(
            "Created plan {} ({}) with {} prize(s)",
            plan.id,
            plan.name,
            prizes.len()
        );
        Ok(PlanResponse::from_parts(plan, prizes))
    }

    /// 获取全部计划 (含奖项)
    pub async fn list_plans(&self) -> AppResult<Vec<PlanResponse>> {
        let mut tx = self.store.begin().await?;
        let plans = tx.list_plans().await?;
        let mut list = Vec::with_capacity(plans.len());
        for plan in plans {
            let prizes = tx.prizes_by_plan(plan.id).await?;
            list.push(PlanResponse::from_parts(plan, prizes));
        }
        Ok(list)
    }

    pub async fn get_plan(&self, plan_id: i64) -> AppResult<PlanResponse> {
        let mut tx = self.store.begin().await?;
        let plan = tx
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))?;
        let prizes = tx.prizes_by_plan(plan_id).await?;
        Ok(PlanResponse::from_parts(plan, prizes))
    }

    /// 部分更新计划名称 / 描述；描述可显式清空
    pub async fn update_plan(
        &self,
        plan_id: i64,
        request: UpdatePlanRequest,
    ) -> AppResult<PlanResponse> {
        if let Some(name) = &request.name {
            validation::validate_plan_mutation(name)?;
        }

        let mut tx = self.store.begin().await?;
        let mut plan = tx
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))?;

        if let Some(name) = request.name {
            plan.name = name;
        }
        // Some(None) 表示清空描述
        if let Some(description) = request.description {
            plan.description = description;
        }
        let plan = tx.update_plan(plan).await?;
        let prizes = tx.prizes_by_plan(plan_id).await?;
        tx.commit().await?;

        log::info!("Updated plan {plan_id}");
        Ok(PlanResponse::from_parts(plan, prizes))
    }

    /// 删除计划；存在历史开奖时拒绝
    pub async fn delete_plan(&self, plan_id: i64) -> AppResult<DeleteConfirmation> {
        let mut tx = self.store.begin().await?;
        let report = integrity::delete_plan(&mut tx, plan_id).await?;
        tx.commit().await?;

        log::info!(
            "Deleted plan {plan_id} and {} prize(s)",
            report.cascaded
        );
        Ok(DeleteConfirmation::new(format!(
            "Plan {plan_id} and its {} prize(s) deleted",
            report.cascaded
        )))
    }
}
