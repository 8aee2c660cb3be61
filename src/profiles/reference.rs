//! Profile references as they arrive from callers: an id to look up, or a full profile.

use super::{DataCenterProfile, HardwareProfile, ModelProfile, ProfileLookup};
use crate::error::ProfileKind;
use crate::{Error, Result};
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// Either a catalog id (`"nvidia-a100"`) or an inline profile object.
///
/// A string is always an id. Anything else is parsed as the profile itself, and
/// its own error (e.g. a failed invariant) is reported unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ProfileRef<T> {
    ById(String),
    Inline(T),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ProfileRef<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(id) => Ok(ProfileRef::ById(id)),
            inline => T::deserialize(inline)
                .map(ProfileRef::Inline)
                .map_err(D::Error::custom),
        }
    }
}

impl<T> From<T> for ProfileRef<T>
where
    T: CatalogEntry,
{
    fn from(profile: T) -> Self {
        ProfileRef::Inline(profile)
    }
}

impl<T> ProfileRef<T> {
    pub fn id(id: impl Into<String>) -> Self {
        ProfileRef::ById(id.into())
    }
}

/// A profile type that can be found in a [`ProfileLookup`].
pub trait CatalogEntry: Sized {
    const KIND: ProfileKind;

    fn find(lookup: &dyn ProfileLookup, id: &str) -> Option<Self>;
}

impl CatalogEntry for HardwareProfile {
    const KIND: ProfileKind = ProfileKind::Hardware;

    fn find(lookup: &dyn ProfileLookup, id: &str) -> Option<Self> {
        lookup.hardware(id)
    }
}

impl CatalogEntry for DataCenterProfile {
    const KIND: ProfileKind = ProfileKind::DataCenter;

    fn find(lookup: &dyn ProfileLookup, id: &str) -> Option<Self> {
        lookup.data_center(id)
    }
}

impl CatalogEntry for ModelProfile {
    const KIND: ProfileKind = ProfileKind::Model;

    fn find(lookup: &dyn ProfileLookup, id: &str) -> Option<Self> {
        lookup.model(id)
    }
}

impl<T: CatalogEntry> ProfileRef<T> {
    /// Resolve to a concrete profile. Unknown ids are an error; there is no default.
    pub fn resolve(self, lookup: &dyn ProfileLookup) -> Result<T> {
        match self {
            ProfileRef::Inline(profile) => Ok(profile),
            ProfileRef::ById(id) => {
                T::find(lookup, &id).ok_or_else(|| Error::profile_not_found(T::KIND, id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileCatalog;

    #[test]
    fn test_untagged_string_is_id() {
        let r: ProfileRef<HardwareProfile> = serde_json::from_str(r#""nvidia-a100""#).unwrap();
        assert_eq!(r, ProfileRef::id("nvidia-a100"));
    }

    #[test]
    fn test_untagged_object_is_inline() {
        let r: ProfileRef<DataCenterProfile> =
            serde_json::from_str(r#"{"id":"dc","pue":1.2,"carbonIntensity":0.3}"#).unwrap();
        match r {
            ProfileRef::Inline(dc) => assert_eq!(dc.pue(), 1.2),
            other => panic!("expected inline profile, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_invariant_error_is_kept() {
        let err = serde_json::from_str::<ProfileRef<HardwareProfile>>(
            r#"{"id":"x","powerWatts":400,"tokensPerSecond":0}"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid hardware profile 'x'"), "{msg}");
        assert!(msg.contains("tokensPerSecond"), "{msg}");
    }

    #[test]
    fn test_yaml_id_and_inline() {
        let by_id: ProfileRef<DataCenterProfile> = serde_yaml::from_str("us-west").unwrap();
        assert_eq!(by_id, ProfileRef::id("us-west"));

        let inline: ProfileRef<DataCenterProfile> =
            serde_yaml::from_str("{ id: dc, pue: 1.2, carbonIntensity: 0.3 }").unwrap();
        assert!(matches!(inline, ProfileRef::Inline(_)));
    }

    #[test]
    fn test_unknown_id_is_profile_not_found() {
        let catalog = ProfileCatalog::new();
        let err = ProfileRef::<ModelProfile>::id("gpt-9")
            .resolve(&catalog)
            .unwrap_err();
        match err {
            Error::ProfileNotFound { kind, id } => {
                assert_eq!(kind, ProfileKind::Model);
                assert_eq!(id, "gpt-9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inline_skips_lookup() {
        let catalog = ProfileCatalog::new();
        let hw = HardwareProfile::new("custom", 250.0, 900.0).unwrap();
        let resolved = ProfileRef::from(hw.clone()).resolve(&catalog).unwrap();
        assert_eq!(resolved, hw);
    }
}
