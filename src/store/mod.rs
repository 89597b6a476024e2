//! 实体存储抽象
//!
//! 业务服务只依赖 [`Store`] / [`StoreTx`]，不直接依赖 sea-orm 连接。
//! 每个写操作都在单个 `StoreTx` 中完成：`commit()` 之前的写入对外不可见，
//! 事务对象被丢弃 (未提交) 即回滚。
//!
//! 二级唯一索引由存储实现负责维护，并作为并发写入的最终裁决：
//! - `draws.draw_number` 全局唯一
//! - `prizes (plan_id, title)` 唯一
//! - `results (draw_id, prize_id)` 唯一
//!
//! 所有列表均按 id 升序 (即插入顺序) 返回。

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{draw_entity, plan_entity, prize_entity, result_entity};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPrize {
    pub plan_id: i64,
    pub title: String,
    pub display_value: String,
    pub ball_count: i32,
}

#[derive(Debug, Clone)]
pub struct NewDraw {
    pub draw_number: String,
    pub draw_date: NaiveDate,
    pub plan_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewResult {
    pub draw_id: i64,
    pub prize_id: i64,
    pub winning_numbers: String,
}

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    /// 开启事务
    async fn begin(&self) -> AppResult<Self::Tx>;
}

#[async_trait]
pub trait StoreTx: Send {
    // -- plans --
    async fn get_plan(&mut self, id: i64) -> AppResult<Option<plan_entity::Model>>;
    async fn list_plans(&mut self) -> AppResult<Vec<plan_entity::Model>>;
    async fn insert_plan(&mut self, plan: NewPlan) -> AppResult<plan_entity::Model>;
    async fn update_plan(&mut self, plan: plan_entity::Model) -> AppResult<plan_entity::Model>;
    async fn delete_plan(&mut self, id: i64) -> AppResult<()>;

    // -- prizes --
    async fn get_prize(&mut self, id: i64) -> AppResult<Option<prize_entity::Model>>;
    async fn prizes_by_plan(&mut self, plan_id: i64) -> AppResult<Vec<prize_entity::Model>>;
    /// 按 (plan_id, title) 精确匹配 (区分大小写)
    async fn find_prize_by_title(
        &mut self,
        plan_id: i64,
        title: &str,
    ) -> AppResult<Option<prize_entity::Model>>;
    async fn insert_prize(&mut self, prize: NewPrize) -> AppResult<prize_entity::Model>;
    async fn update_prize(
        &mut self,
        prize: prize_entity::Model,
    ) -> AppResult<prize_entity::Model>;
    async fn delete_prize(&mut self, id: i64) -> AppResult<()>;

    // -- draws --
    async fn get_draw(&mut self, id: i64) -> AppResult<Option<draw_entity::Model>>;
    async fn find_draw_by_number(
        &mut self,
        draw_number: &str,
    ) -> AppResult<Option<draw_entity::Model>>;
    async fn list_draws(&mut self) -> AppResult<Vec<draw_entity::Model>>;
    async fn plan_has_draws(&mut self, plan_id: i64) -> AppResult<bool>;
    async fn insert_draw(&mut self, draw: NewDraw) -> AppResult<draw_entity::Model>;
    async fn update_draw(&mut self, draw: draw_entity::Model) -> AppResult<draw_entity::Model>;
    async fn delete_draw(&mut self, id: i64) -> AppResult<()>;

    // -- results --
    async fn find_result(
        &mut self,
        draw_id: i64,
        prize_id: i64,
    ) -> AppResult<Option<result_entity::Model>>;
    async fn results_by_draw(&mut self, draw_id: i64) -> AppResult<Vec<result_entity::Model>>;
    async fn prize_has_results(&mut self, prize_id: i64) -> AppResult<bool>;
    async fn insert_result(&mut self, result: NewResult) -> AppResult<result_entity::Model>;
    async fn update_result(
        &mut self,
        result: result_entity::Model,
    ) -> AppResult<result_entity::Model>;
    async fn delete_result(&mut self, id: i64) -> AppResult<()>;

    /// 提交事务
    async fn commit(self) -> AppResult<()>
    where
        Self: Sized;
}
