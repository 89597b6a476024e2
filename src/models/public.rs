use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 公开查询中的单个奖项行；尚未录入结果时 winning_numbers 为 null
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicResultEntry {
    pub result_id: Option<i64>,
    pub prize_id: i64,
    pub prize_title: String,
    pub display_value: String,
    pub winning_numbers: Option<String>,
}

/// 公开查询：某期开奖的完整奖项表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDrawView {
    pub draw_number: String,
    pub date: NaiveDate,
    pub results: Vec<PublicResultEntry>,
}
