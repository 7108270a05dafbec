//! 对话框结果
//!
use crate::parameters::DialogParameters;

/// 宿主界面给出的关闭信号：确认 / 取消 / 未作选择直接关闭
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DialogOutcome {
    Confirmed,
    Cancelled,
    #[default]
    Dismissed,
}

impl DialogOutcome {
    /// 三值表示：`Some(true)` 确认，`Some(false)` 取消，`None` 未作选择
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Confirmed => Some(true),
            Self::Cancelled => Some(false),
            Self::Dismissed => None,
        }
    }
}

impl From<Option<bool>> for DialogOutcome {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Confirmed,
            Some(false) => Self::Cancelled,
            None => Self::Dismissed,
        }
    }
}

impl From<DialogOutcome> for Option<bool> {
    fn from(value: DialogOutcome) -> Self {
        value.as_bool()
    }
}

/// 对话框结果：关闭信号 + 回传参数
#[derive(Debug, Default)]
pub struct DialogResult {
    pub outcome: DialogOutcome,
    pub parameters: DialogParameters,
}

impl DialogResult {
    pub fn new(outcome: DialogOutcome) -> Self {
        Self {
            outcome,
            parameters: DialogParameters::new(),
        }
    }

    pub fn with_parameters(outcome: DialogOutcome, parameters: DialogParameters) -> Self {
        Self {
            outcome,
            parameters,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.outcome == DialogOutcome::Confirmed
    }

    pub fn is_cancelled(&self) -> bool {
        self.outcome == DialogOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_to_three_valued_flag() {
        for flag in [Some(true), Some(false), None] {
            assert_eq!(DialogOutcome::from(flag).as_bool(), flag);
        }
        assert_eq!(DialogResult::default().outcome, DialogOutcome::Dismissed);
    }
}
