use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Original uploaded bytes preserved for later retrieval.
///
/// Owned by `Storage`, not by any individual KB record — its lifetime is
/// reference-counted by the set of KB records whose `attachment_id` points
/// to it; it is deleted only once the last referrer is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attachment {
    pub id: String,
    pub project_id: String,
    pub mime: String,
    pub original_name: String,
    #[serde(with = "bytes_as_base64")]
    #[schemars(with = "String")]
    pub bytes: Vec<u8>,
}

mod bytes_as_base64 {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrips_through_json() {
        let att = Attachment {
            id: "a1".into(),
            project_id: "p1".into(),
            mime: "application/pdf".into(),
            original_name: "policy.pdf".into(),
            bytes: vec![0x25, 0x50, 0x44, 0x46],
        };
        let json = serde_json::to_string(&att).unwrap();
        let back: Attachment = serde_json::from_str(&json).unwrap();
        assert_eq!(att, back);
    }
}
