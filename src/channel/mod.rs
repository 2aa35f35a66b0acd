pub mod codec;
pub mod reply;
pub mod ui;
pub mod plugin;

use serde::Deserialize;
use serde_json::Value;

use crate::queries::contact_queries::QueryOptions;

pub use plugin::ContactsPlugin;
pub use reply::{MethodResult, PendingReply, Reply};
pub use ui::{ContactsUi, UiCompletion, UiOutcome};

/// A method name plus its argument map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name).filter(|v| !v.is_null())
    }

    pub fn argument_str(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(Value::as_str)
    }

    pub fn argument_bool(&self, name: &str, default: bool) -> bool {
        self.argument(name).and_then(Value::as_bool).unwrap_or(default)
    }

    fn query_options(&self, localized_default: bool) -> QueryOptions {
        QueryOptions {
            with_thumbnails: self.argument_bool("withThumbnails", false),
            photo_high_resolution: self.argument_bool("photoHighResolution", false),
            order_by_given_name: self.argument_bool("orderByGivenName", false),
            localized_labels: self.argument_bool("androidLocalizedLabels", localized_default),
        }
    }
}
