//! Actions fed to transition functions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `meta` value that asks the tracker not to record a transition.
pub const SKIP_HISTORY_TRACKING: &str = "SKIP_HISTORY_TRACKING";

/// Label of the action a [`Store`](crate::store::Store) dispatches when it is created.
pub const INIT_ACTION: &str = "@@state-trail/INIT";

/// Typed view over an action's `meta` field.
///
/// Whatever JSON value arrives is kept so it serializes back unchanged;
/// `skip_tracking` is set only when that value is the
/// [`SKIP_HISTORY_TRACKING`] string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<Value>")]
pub struct ActionMeta {
    skip_tracking: bool,
    value: Option<Value>,
}

impl ActionMeta {
    pub fn skip_tracking() -> Self {
        Self::from(Some(Value::String(SKIP_HISTORY_TRACKING.to_string())))
    }

    pub fn skips_tracking(&self) -> bool {
        self.skip_tracking
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl From<Option<Value>> for ActionMeta {
    fn from(value: Option<Value>) -> Self {
        let value = value.filter(|v| !v.is_null());
        let skip_tracking = matches!(&value, Some(Value::String(s)) if s == SKIP_HISTORY_TRACKING);
        Self {
            skip_tracking,
            value,
        }
    }
}

impl From<ActionMeta> for Option<Value> {
    fn from(meta: ActionMeta) -> Self {
        meta.value
    }
}

/// An intent to change state.
///
/// # Example
///
/// ```rust
/// use state_trail::core::Action;
/// use serde_json::json;
///
/// let action: Action = serde_json::from_value(json!({
///     "type": "DEBUG_SET",
///     "meta": "SKIP_HISTORY_TRACKING"
/// }))
/// .unwrap();
///
/// assert_eq!(action.kind, "DEBUG_SET");
/// assert!(action.meta.skips_tracking());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,

    #[serde(default, skip_serializing_if = "ActionMeta::is_empty")]
    pub meta: ActionMeta,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
            meta: ActionMeta::default(),
        }
    }

    pub(crate) fn init() -> Self {
        Self::new(INIT_ACTION)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = ActionMeta::from(Some(meta));
        self
    }

    /// Mark the action so its transition is not recorded.
    pub fn untracked(mut self) -> Self {
        self.meta = ActionMeta::skip_tracking();
        self
    }
}
