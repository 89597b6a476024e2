use serde::{Deserialize, Serialize};

use crate::entities::result_entity;

/// 开奖引用：按 id 或按期号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRef {
    Id(i64),
    Number(String),
}

impl std::fmt::Display for DrawRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawRef::Id(id) => write!(f, "id {id}"),
            DrawRef::Number(number) => write!(f, "number '{number}'"),
        }
    }
}

/// 录入结果请求：奖项按标题解析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResultRequest {
    pub draw: DrawRef,
    pub prize_title: String,
    pub winning_numbers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub id: i64,
    pub draw_id: i64,
    pub prize_id: i64,
    pub winning_numbers: String,
}

impl From<result_entity::Model> for ResultResponse {
    fn from(m: result_entity::Model) -> Self {
        ResultResponse {
            id: m.id,
            draw_id: m.draw_id,
            prize_id: m.prize_id,
            winning_numbers: m.winning_numbers,
        }
    }
}
