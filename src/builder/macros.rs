//! Macros for ergonomic tracked state declarations.

/// Declare a struct with an embedded history log and implement
/// [`Tracked`](crate::core::Tracked) for it.
///
/// The macro appends a `state_history` field, serialized as
/// `stateHistory` and defaulting to an empty log when absent.
///
/// [`content`](crate::core::Tracked::content) serializes a borrowed view of
/// the declared fields only, so its cost does not grow with the history.
/// Field attributes apply to that view too. Container-level serde attributes
/// (such as `rename_all`) do not.
///
/// [`with_history`](crate::core::Tracked::with_history) clones each declared
/// field. Wrap large fields in an `Arc` to share them between snapshots.
///
/// # Example
///
/// ```
/// use state_trail::tracked_state;
/// use state_trail::core::Tracked;
///
/// tracked_state! {
///     #[derive(Default)]
///     pub struct Counter {
///         pub counter: i64,
///     }
/// }
///
/// let state = Counter::default();
/// assert_eq!(state.history().cursor(), -1);
/// assert_eq!(state.content().unwrap(), serde_json::json!({"counter": 0}));
/// ```
#[macro_export]
macro_rules! tracked_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
            #[serde(rename = "stateHistory", default)]
            pub state_history: $crate::core::HistoryLog,
        }

        impl $crate::core::Tracked for $name {
            fn history(&self) -> &$crate::core::HistoryLog {
                &self.state_history
            }

            fn with_history(&self, history: $crate::core::HistoryLog) -> Self {
                Self {
                    $( $field: ::std::clone::Clone::clone(&self.$field), )*
                    state_history: history,
                }
            }

            fn content(
                &self,
            ) -> ::std::result::Result<$crate::__serde_json::Value, $crate::core::DiffError> {
                #[derive(serde::Serialize)]
                struct Content<'a> {
                    $(
                        $(#[$field_meta])*
                        $field: &'a $ty,
                    )*
                    #[serde(skip)]
                    _history: ::std::marker::PhantomData<&'a ()>,
                }

                let view = Content {
                    $( $field: &self.$field, )*
                    _history: ::std::marker::PhantomData,
                };
                ::std::result::Result::Ok($crate::__serde_json::to_value(&view)?)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Delta, HistoryLog, Tracked, HISTORY_KEY};
    use serde_json::json;
    use std::sync::Arc;

    tracked_state! {
        #[derive(Default)]
        struct Profile {
            name: String,
            #[serde(default)]
            tags: Vec<String>,
        }
    }

    #[test]
    fn tracked_state_macro_generates_trait() {
        let profile = Profile {
            name: "ada".to_string(),
            tags: vec!["admin".to_string()],
            state_history: HistoryLog::new(),
        };

        assert!(profile.history().is_empty());
        assert_eq!(
            profile.content().unwrap(),
            json!({"name": "ada", "tags": ["admin"]})
        );
    }

    #[test]
    fn history_field_uses_shared_key() {
        let json = serde_json::to_value(Profile::default()).unwrap();
        assert!(json.get(HISTORY_KEY).is_some());
    }

    #[test]
    fn with_history_replaces_only_history() {
        let profile = Profile {
            name: "ada".to_string(),
            ..Profile::default()
        };
        let next = profile.with_history(HistoryLog::new().record(Delta::new(json!([])), 1, "A"));

        assert_eq!(next.name, "ada");
        assert_eq!(next.history().len(), 1);
        assert!(profile.history().is_empty());
    }

    #[test]
    fn missing_history_deserializes_empty() {
        let profile: Profile = serde_json::from_value(json!({"name": "bob"})).unwrap();
        assert_eq!(profile.name, "bob");
        assert!(profile.tags.is_empty());
        assert_eq!(profile.history().cursor(), -1);
    }

    #[test]
    fn tracked_state_supports_visibility() {
        tracked_state! {
            pub struct PublicState {
                pub value: u8,
            }
        }

        let state = PublicState {
            value: 1,
            state_history: HistoryLog::new(),
        };
        assert_eq!(state.value, 1);
    }

    tracked_state! {
        #[derive(Default)]
        struct Catalog {
            #[serde(rename = "displayName")]
            name: String,
            items: Arc<Vec<String>>,
        }
    }

    fn long_history(len: i64) -> HistoryLog {
        (0..len).fold(HistoryLog::new(), |log, n| {
            log.record(Delta::new(json!([{"op": "replace", "path": "/n", "value": n}])), n, "STEP")
        })
    }

    #[test]
    fn content_ignores_history_size() {
        let empty = Catalog {
            name: "books".to_string(),
            ..Catalog::default()
        };
        let busy = empty.with_history(long_history(2_000));

        let content = busy.content().unwrap();
        assert_eq!(content, empty.content().unwrap());
        assert_eq!(content, json!({"displayName": "books", "items": []}));
        assert!(content.get(HISTORY_KEY).is_none());
    }

    #[test]
    fn content_honours_field_attributes() {
        let catalog = Catalog {
            name: "music".to_string(),
            ..Catalog::default()
        };
        let serialized = serde_json::to_value(&catalog).unwrap();

        assert_eq!(serialized["displayName"], catalog.content().unwrap()["displayName"]);
    }

    #[test]
    fn with_history_shares_arc_fields() {
        let catalog = Catalog {
            name: "films".to_string(),
            items: Arc::new(vec!["a".to_string(); 100]),
            state_history: HistoryLog::new(),
        };
        let next = catalog.with_history(long_history(1));

        assert!(Arc::ptr_eq(&catalog.items, &next.items));
        assert_eq!(next.name, "films");
        assert_eq!(next.history().len(), 1);
    }
}
