//! Tri-state field for partial updates of nullable columns.
//!
//! A key missing from the JSON body leaves the column alone, an explicit
//! `null` clears it, and a value replaces it. Fields of this type must carry
//! `#[serde(default)]` so a missing key maps to [`Patch::Absent`].

use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when absent, otherwise the new column value.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn apply(self, target: &mut ActiveValue<Option<T>>)
    where
        Option<T>: Into<sea_orm::Value>,
    {
        if let Some(change) = self.into_change() {
            *target = Set(change);
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        logo: Patch<String>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.logo, Patch::Absent);
        let null: Body = serde_json::from_str(r#"{"logo":null}"#).unwrap();
        assert_eq!(null.logo, Patch::Null);
        let value: Body = serde_json::from_str(r#"{"logo":"x.png"}"#).unwrap();
        assert_eq!(value.logo, Patch::Value("x.png".to_string()));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut col: ActiveValue<Option<String>> = ActiveValue::Unchanged(Some("old".into()));
        Patch::<String>::Absent.apply(&mut col);
        assert_eq!(col, ActiveValue::Unchanged(Some("old".into())));
        Patch::<String>::Null.apply(&mut col);
        assert_eq!(col, Set(None));
    }
}
