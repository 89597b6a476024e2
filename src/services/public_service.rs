use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{PublicDrawView, PublicResultEntry};
use crate::store::{Store, StoreTx};

/// 公开查询 (只读)
#[derive(Clone)]
pub struct PublicService<S> {
    store: S,
}

impl<S: Store> PublicService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 按期号获取完整奖项表
    ///
    /// 计划内每个奖项都会出现 (按奖项创建顺序)，尚未录入结果的奖项
    /// winning_numbers 为 None，前端据此显示占位符。
    pub async fn public_view(&self, draw_number: &str) -> AppResult<PublicDrawView> {
        let mut tx = self.store.begin().await?;
        let draw = tx
            .find_draw_by_number(draw_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw '{draw_number}' not found")))?;

        let prizes = tx.prizes_by_plan(draw.plan_id).await?;
        let mut results: HashMap<i64, _> = tx
            .results_by_draw(draw.id)
            .await?
            .into_iter()
            .map(|r| (r.prize_id, r))
            .collect();

        let entries = prizes
            .into_iter()
            .map(|prize| {
                let result = results.remove(&prize.id);
                PublicResultEntry {
                    result_id: result.as_ref().map(|r| r.id),
                    prize_id: prize.id,
                    prize_title: prize.title,
                    display_value: prize.display_value,
                    winning_numbers: result.map(|r| r.winning_numbers),
                }
            })
            .collect();

        Ok(PublicDrawView {
            draw_number: draw.draw_number,
            date: draw.draw_date,
            results: entries,
        })
    }
}
