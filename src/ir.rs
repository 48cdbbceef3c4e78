use serde::{Deserialize, Serialize};

/// One row of the compensation table: a single rank of a role at a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompRow {
    pub ticker: String,
    pub role: String,
    pub rank_name: String,
    pub rank: i32,
    pub total_pay: f32,
    pub base_pay: f32,
    pub stock: f32,
    pub bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub ticker: String,
    pub name: String,
    pub industry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Roles of one company on the left.
    #[default]
    Company,
    /// Top companies for one role on the left.
    Role,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Company => "company",
            ViewMode::Role => "role",
        }
    }
}

/// An aggregated left-column item: a role (company view) or a company
/// (role view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeftItem {
    /// Raw key; also the group key of this item's ranks.
    pub name: String,
    pub display_name: String,
    pub avg_pay: f32,
    pub avg_base: f32,
    pub avg_stock: f32,
    pub avg_bonus: f32,
    pub ranks: Vec<RankItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankItem {
    pub company: String,
    pub company_display_name: String,
    pub role: String,
    pub rank_name: String,
    pub rank: i32,
    pub total_pay: f32,
    pub base_pay: f32,
    pub stock: f32,
    pub bonus: f32,
}

impl RankItem {
    /// Key of the left item this rank hangs off.
    pub fn group_key(&self, view: ViewMode) -> &str {
        match view {
            ViewMode::Company => &self.role,
            ViewMode::Role => &self.company,
        }
    }

    pub fn has_valid_pay(&self) -> bool {
        self.total_pay.is_finite() && self.total_pay > 0.0
    }
}

/// Everything a single slope chart needs, already filtered and sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeView {
    pub mode: ViewMode,
    pub title: String,
    pub left: Vec<LeftItem>,
    pub right: Vec<RankItem>,
    /// Keys the color palette is assigned over, sorted.
    pub color_domain: Vec<String>,
}

/// Interaction state passed explicitly into every layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub group: Option<String>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn group(key: impl Into<String>) -> Self {
        Self {
            group: Some(key.into()),
        }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.group.as_deref() == Some(key)
    }

    /// True when some other item is selected.
    pub fn is_dimmed(&self, key: &str) -> bool {
        self.group.is_some() && !self.is_selected(key)
    }
}
