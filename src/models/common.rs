use serde::{Deserialize, Serialize};

/// 删除操作的确认信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub ok: bool,
    pub message: String,
}

impl DeleteConfirmation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}
