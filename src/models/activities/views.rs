use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生活动列表的分栏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum ActivityTab {
    Pending,   // 待提交
    Submitted, // 已提交（不论是否评分）
    Overdue,   // 已逾期且未提交
}

/// 分栏过滤条件，`All` 不做状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum TabFilter {
    #[default]
    All,
    Pending,
    Submitted,
    Overdue,
}

impl TabFilter {
    pub fn matches(&self, tab: Option<ActivityTab>) -> bool {
        match self {
            TabFilter::All => true,
            TabFilter::Pending => tab == Some(ActivityTab::Pending),
            TabFilter::Submitted => tab == Some(ActivityTab::Submitted),
            TabFilter::Overdue => tab == Some(ActivityTab::Overdue),
        }
    }
}

impl std::str::FromStr for TabFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TabFilter::All),
            "pending" => Ok(TabFilter::Pending),
            "submitted" => Ok(TabFilter::Submitted),
            "overdue" => Ok(TabFilter::Overdue),
            _ => Err(format!("Invalid tab: {s}")),
        }
    }
}

/// 各分栏数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct TabCounts {
    pub pending: usize,
    pub submitted: usize,
    pub overdue: usize,
}

/// 展示强调色，仅用于界面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub enum Tone {
    Primary,
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Primary => "primary",
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
