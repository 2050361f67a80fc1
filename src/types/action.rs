use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Payload path written by [`ActionKind::MarkOutOfPolicy`].
pub const OUT_OF_POLICY_FLAG: &str = "policy_flags.out_of_policy_rule";

/// Payload object that receives [`ActionKind::AddMetadataFlag`] writes.
pub const METADATA_ROOT: &str = "metadata";

/// The closed set of action kinds a rule may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ApplyDiscountPercent,
    ApplyDiscountAmount,
    OverridePrice,
    SetField,
    AddMetadataFlag,
    MarkOutOfPolicy,
}

impl ActionKind {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "apply_discount_percent" => Self::ApplyDiscountPercent,
            "apply_discount_amount" => Self::ApplyDiscountAmount,
            "override_price" => Self::OverridePrice,
            "set_field" => Self::SetField,
            "add_metadata_flag" => Self::AddMetadataFlag,
            "mark_out_of_policy" => Self::MarkOutOfPolicy,
            _ => return None,
        })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ApplyDiscountPercent => "apply_discount_percent",
            Self::ApplyDiscountAmount => "apply_discount_amount",
            Self::OverridePrice => "override_price",
            Self::SetField => "set_field",
            Self::AddMetadataFlag => "add_metadata_flag",
            Self::MarkOutOfPolicy => "mark_out_of_policy",
        }
    }

    /// Kinds whose target must be an existing numeric field and whose
    /// amount must be a number.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::ApplyDiscountPercent | Self::ApplyDiscountAmount | Self::OverridePrice
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a rule's ordered action list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub target_field: String,
    pub amount_or_value: Value,
}

impl Action {
    #[must_use]
    pub fn discount_percent(target_field: &str, percent: f64) -> Self {
        Self::new(ActionKind::ApplyDiscountPercent, target_field, percent)
    }

    #[must_use]
    pub fn discount_amount(target_field: &str, amount: f64) -> Self {
        Self::new(ActionKind::ApplyDiscountAmount, target_field, amount)
    }

    #[must_use]
    pub fn override_price(target_field: &str, price: f64) -> Self {
        Self::new(ActionKind::OverridePrice, target_field, price)
    }

    #[must_use]
    pub fn set_field(target_field: &str, value: impl Into<Value>) -> Self {
        Self::new(ActionKind::SetField, target_field, value)
    }

    /// Write `value` under `metadata.<flag>`.
    #[must_use]
    pub fn metadata_flag(flag: &str, value: impl Into<Value>) -> Self {
        Self::new(ActionKind::AddMetadataFlag, flag, value)
    }

    #[must_use]
    pub fn mark_out_of_policy() -> Self {
        Self::new(ActionKind::MarkOutOfPolicy, OUT_OF_POLICY_FLAG, true)
    }

    fn new(kind: ActionKind, target_field: &str, value: impl Into<Value>) -> Self {
        Self {
            kind,
            target_field: target_field.to_owned(),
            amount_or_value: value.into(),
        }
    }

    /// The payload path this action writes to.
    #[must_use]
    pub fn resolved_target(&self) -> String {
        match self.kind {
            ActionKind::AddMetadataFlag => format!("{METADATA_ROOT}.{}", self.target_field),
            _ => self.target_field.clone(),
        }
    }
}

/// Record of one applied action: what changed, from what, to what.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedAction {
    pub action: Action,
    pub field: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
    /// Human-readable effect, e.g. `"price 200 -> 180"`.
    pub effect: String,
}
