use serde::{Deserialize, Deserializer, Serialize};

use super::{CreatePrizeRequest, PrizeResponse};
use crate::entities::{plan_entity, prize_entity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    /// 初始奖项 (可为空)
    #[serde(default)]
    pub prizes: Vec<CreatePrizeRequest>,
}

/// 部分更新：仅覆盖提供的字段
///
/// `description`: 缺省 -> None (不修改)；`null` -> Some(None) (清空)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

/// 字段出现即为 Some，值本身可以是 null
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// 计划及其奖项 (奖项按创建顺序)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub prizes: Vec<PrizeResponse>,
}

impl PlanResponse {
    pub fn from_parts(plan: plan_entity::Model, prizes: Vec<prize_entity::Model>) -> Self {
        PlanResponse {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            prizes: prizes.into_iter().map(Into::into).collect(),
        }
    }
}
