use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::draw_entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDrawRequest {
    /// 期号 (字符串，可为 "001"、"Extra")
    pub draw_number: String,
    pub date: NaiveDate,
    pub plan_id: i64,
}

/// 开奖更新请求；不含 plan_id，开奖所属计划创建后不可变更
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDrawRequest {
    pub draw_number: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResponse {
    pub id: i64,
    pub draw_number: String,
    pub date: NaiveDate,
    pub plan_id: i64,
}

impl From<draw_entity::Model> for DrawResponse {
    fn from(m: draw_entity::Model) -> Self {
        DrawResponse {
            id: m.id,
            draw_number: m.draw_number,
            date: m.draw_date,
            plan_id: m.plan_id,
        }
    }
}
