//! Serde helpers for partial-update bodies.

use serde::{Deserialize, Deserializer};

/// `deserialize_with` for a nullable column in an update body: absent is
/// `None`, explicit `null` is `Some(None)`; pair with `#[serde(default)]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
        #[serde(default, deserialize_with = "nullable")]
        owner: Option<Option<Uuid>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let patch: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        assert_eq!(patch.note, Some(None));
        assert_eq!(patch.owner, None);

        let patch: Patch = serde_json::from_str(r#"{"note":"rent","owner":null}"#).unwrap();
        assert_eq!(patch.note, Some(Some("rent".to_string())));
        assert_eq!(patch.owner, Some(None));
    }

    #[test]
    fn wrong_type_is_still_an_error() {
        assert!(serde_json::from_str::<Patch>(r#"{"owner":"not-a-uuid"}"#).is_err());
    }
}
