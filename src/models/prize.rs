use serde::{Deserialize, Serialize};

use crate::entities::prize_entity;

/// 新增奖项请求 (也用于创建计划时的初始奖项)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrizeRequest {
    /// 奖项标题，如 "MAYOR"、"SECO 36"
    pub title: String,
    /// 展示用奖金文本
    pub display_value: String,
    /// 中奖号码位数
    pub ball_count: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePrizeRequest {
    pub title: Option<String>,
    pub display_value: Option<String>,
    pub ball_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeResponse {
    pub id: i64,
    pub plan_id: i64,
    pub title: String,
    pub display_value: String,
    pub ball_count: i32,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            plan_id: m.plan_id,
            title: m.title,
            display_value: m.display_value,
            ball_count: m.ball_count,
        }
    }
}
