//! 进程内存储实现 (测试与本地演示用)
//!
//! 事务持有全局互斥锁并在副本上工作，提交时整体写回，因此隔离级别为
//! 可串行化；未提交的事务被丢弃时副本随之丢弃。
//! id 序列独立于事务，回滚不会导致 id 复用。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{NewDraw, NewPlan, NewPrize, NewResult, Store, StoreTx};
use crate::entities::{draw_entity, plan_entity, prize_entity, result_entity};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct Tables {
    plans: BTreeMap<i64, plan_entity::Model>,
    prizes: BTreeMap<i64, prize_entity::Model>,
    draws: BTreeMap<i64, draw_entity::Model>,
    results: BTreeMap<i64, result_entity::Model>,
    // 唯一索引
    prize_titles: HashMap<(i64, String), i64>,
    draw_numbers: HashMap<String, i64>,
    result_pairs: HashMap<(i64, i64), i64>,
}

#[derive(Debug, Default)]
struct Sequences {
    plan: AtomicI64,
    prize: AtomicI64,
    draw: AtomicI64,
    result: AtomicI64,
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    ids: Arc<Sequences>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储层故障：之后的 `begin()` 返回 Unavailable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> AppResult<MemoryTx> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("memory store is offline".into()));
        }
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx {
            guard,
            work,
            ids: self.ids.clone(),
        })
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
    ids: Arc<Sequences>,
}

fn unique_violation(index: &str) -> AppError {
    AppError::Conflict(format!("Unique constraint violated: {index}"))
}

fn fk_violation(constraint: &str) -> AppError {
    AppError::Conflict(format!("Foreign key constraint violated: {constraint}"))
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get_plan(&mut self, id: i64) -> AppResult<Option<plan_entity::Model>> {
        Ok(self.work.plans.get(&id).cloned())
    }

    async fn list_plans(&mut self) -> AppResult<Vec<plan_entity::Model>> {
        Ok(self.work.plans.values().cloned().collect())
    }

    async fn insert_plan(&mut self, plan: NewPlan) -> AppResult<plan_entity::Model> {
        let now = Some(Utc::now());
        let model = plan_entity::Model {
            id: next_id(&self.ids.plan),
            name: plan.name,
            description: plan.description,
            created_at: now,
            updated_at: now,
        };
        self.work.plans.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_plan(&mut self, mut plan: plan_entity::Model) -> AppResult<plan_entity::Model> {
        if !self.work.plans.contains_key(&plan.id) {
            return Err(AppError::NotFound(format!("Plan {} not found", plan.id)));
        }
        plan.updated_at = Some(Utc::now());
        self.work.plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn delete_plan(&mut self, id: i64) -> AppResult<()> {
        if self.work.prizes.values().any(|p| p.plan_id == id) {
            return Err(fk_violation("fk_prizes_plan"));
        }
        if self.work.draws.values().any(|d| d.plan_id == id) {
            return Err(fk_violation("fk_draws_plan"));
        }
        self.work
            .plans
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Plan {id} not found")))
    }

    async fn get_prize(&mut self, id: i64) -> AppResult<Option<prize_entity::Model>> {
        Ok(self.work.prizes.get(&id).cloned())
    }

    async fn prizes_by_plan(&mut self, plan_id: i64) -> AppResult<Vec<prize_entity::Model>> {
        Ok(self
            .work
            .prizes
            .values()
            .filter(|p| p.plan_id == plan_id)
            .cloned()
            .collect())
    }

    async fn find_prize_by_title(
        &mut self,
        plan_id: i64,
        title: &str,
    ) -> AppResult<Option<prize_entity::Model>> {
        Ok(self
            .work
            .prize_titles
            .get(&(plan_id, title.to_string()))
            .and_then(|id| self.work.prizes.get(id))
            .cloned())
    }

    async fn insert_prize(&mut self, prize: NewPrize) -> AppResult<prize_entity::Model> {
        if !self.work.plans.contains_key(&prize.plan_id) {
            return Err(fk_violation("fk_prizes_plan"));
        }
        let key = (prize.plan_id, prize.title.clone());
        if self.work.prize_titles.contains_key(&key) {
            return Err(unique_violation("idx_prizes_plan_title_unique"));
        }
        let now = Some(Utc::now());
        let model = prize_entity::Model {
            id: next_id(&self.ids.prize),
            plan_id: prize.plan_id,
            title: prize.title,
            display_value: prize.display_value,
            ball_count: prize.ball_count,
            created_at: now,
            updated_at: now,
        };
        self.work.prize_titles.insert(key, model.id);
        self.work.prizes.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_prize(
        &mut self,
        mut prize: prize_entity::Model,
    ) -> AppResult<prize_entity::Model> {
        let Some(old) = self.work.prizes.get(&prize.id).cloned() else {
            return Err(AppError::NotFound(format!("Prize {} not found", prize.id)));
        };
        let key = (prize.plan_id, prize.title.clone());
        if let Some(owner) = self.work.prize_titles.get(&key)
            && *owner != prize.id
        {
            return Err(unique_violation("idx_prizes_plan_title_unique"));
        }
        self.work.prize_titles.remove(&(old.plan_id, old.title));
        self.work.prize_titles.insert(key, prize.id);
        prize.updated_at = Some(Utc::now());
        self.work.prizes.insert(prize.id, prize.clone());
        Ok(prize)
    }

    async fn delete_prize(&mut self, id: i64) -> AppResult<()> {
        if self.work.results.values().any(|r| r.prize_id == id) {
            return Err(fk_violation("fk_results_prize"));
        }
        let prize = self
            .work
            .prizes
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?;
        self.work.prize_titles.remove(&(prize.plan_id, prize.title));
        Ok(())
    }

    async fn get_draw(&mut self, id: i64) -> AppResult<Option<draw_entity::Model>> {
        Ok(self.work.draws.get(&id).cloned())
    }

    async fn find_draw_by_number(
        &mut self,
        draw_number: &str,
    ) -> AppResult<Option<draw_entity::Model>> {
        Ok(self
            .work
            .draw_numbers
            .get(draw_number)
            .and_then(|id| self.work.draws.get(id))
            .cloned())
    }

    async fn list_draws(&mut self) -> AppResult<Vec<draw_entity::Model>> {
        Ok(self.work.draws.values().cloned().collect())
    }

    async fn plan_has_draws(&mut self, plan_id: i64) -> AppResult<bool> {
        Ok(self.work.draws.values().any(|d| d.plan_id == plan_id))
    }

    async fn insert_draw(&mut self, draw: NewDraw) -> AppResult<draw_entity::Model> {
        if !self.work.plans.contains_key(&draw.plan_id) {
            return Err(fk_violation("fk_draws_plan"));
        }
        if self.work.draw_numbers.contains_key(&draw.draw_number) {
            return Err(unique_violation("idx_draws_draw_number_unique"));
        }
        let now = Some(Utc::now());
        let model = draw_entity::Model {
            id: next_id(&self.ids.draw),
            draw_number: draw.draw_number,
            draw_date: draw.draw_date,
            plan_id: draw.plan_id,
            created_at: now,
            updated_at: now,
        };
        self.work
            .draw_numbers
            .insert(model.draw_number.clone(), model.id);
        self.work.draws.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_draw(&mut self, mut draw: draw_entity::Model) -> AppResult<draw_entity::Model> {
        let Some(old) = self.work.draws.get(&draw.id).cloned() else {
            return Err(AppError::NotFound(format!("Draw {} not found", draw.id)));
        };
        if let Some(owner) = self.work.draw_numbers.get(&draw.draw_number)
            && *owner != draw.id
        {
            return Err(unique_violation("idx_draws_draw_number_unique"));
        }
        self.work.draw_numbers.remove(&old.draw_number);
        self.work
            .draw_numbers
            .insert(draw.draw_number.clone(), draw.id);
        draw.updated_at = Some(Utc::now());
        self.work.draws.insert(draw.id, draw.clone());
        Ok(draw)
    }

    async fn delete_draw(&mut self, id: i64) -> AppResult<()> {
        if self.work.results.values().any(|r| r.draw_id == id) {
            return Err(fk_violation("fk_results_draw"));
        }
        let draw = self
            .work
            .draws
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Draw {id} not found")))?;
        self.work.draw_numbers.remove(&draw.draw_number);
        Ok(())
    }

    async fn find_result(
        &mut self,
        draw_id: i64,
        prize_id: i64,
    ) -> AppResult<Option<result_entity::Model>> {
        Ok(self
            .work
            .result_pairs
            .get(&(draw_id, prize_id))
            .and_then(|id| self.work.results.get(id))
            .cloned())
    }

    async fn results_by_draw(&mut self, draw_id: i64) -> AppResult<Vec<result_entity::Model>> {
        Ok(self
            .work
            .results
            .values()
            .filter(|r| r.draw_id == draw_id)
            .cloned()
            .collect())
    }

    async fn prize_has_results(&mut self, prize_id: i64) -> AppResult<bool> {
        Ok(self.work.results.values().any(|r| r.prize_id == prize_id))
    }

    async fn insert_result(&mut self, result: NewResult) -> AppResult<result_entity::Model> {
        if !self.work.draws.contains_key(&result.draw_id) {
            return Err(fk_violation("fk_results_draw"));
        }
        if !self.work.prizes.contains_key(&result.prize_id) {
            return Err(fk_violation("fk_results_prize"));
        }
        let key = (result.draw_id, result.prize_id);
        if self.work.result_pairs.contains_key(&key) {
            return Err(unique_violation("idx_results_draw_prize_unique"));
        }
        let now = Some(Utc::now());
        let model = result_entity::Model {
            id: next_id(&self.ids.result),
            draw_id: result.draw_id,
            prize_id: result.prize_id,
            winning_numbers: result.winning_numbers,
            created_at: now,
            updated_at: now,
        };
        self.work.result_pairs.insert(key, model.id);
        self.work.results.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_result(
        &mut self,
        mut result: result_entity::Model,
    ) -> AppResult<result_entity::Model> {
        let Some(old) = self.work.results.get(&result.id) else {
            return Err(AppError::NotFound(format!("Result {} not found", result.id)));
        };
        // 结果不可改指向其他开奖或奖项
        if old.draw_id != result.draw_id || old.prize_id != result.prize_id {
            return Err(AppError::InvalidInput(
                "A result cannot be moved to another draw or prize".into(),
            ));
        }
        result.updated_at = Some(Utc::now());
        self.work.results.insert(result.id, result.clone());
        Ok(result)
    }

    async fn delete_result(&mut self, id: i64) -> AppResult<()> {
        let result = self
            .work
            .results
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Result {id} not found")))?;
        self.work
            .result_pairs
            .remove(&(result.draw_id, result.prize_id));
        Ok(())
    }

    async fn commit(self) -> AppResult<()> {
        let MemoryTx { mut guard, work, .. } = self;
        *guard = work;
        Ok(())
    }
}
