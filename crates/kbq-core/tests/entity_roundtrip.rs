//! Serde roundtrip tests for entity types.

use std::collections::BTreeSet;

use chrono::Utc;
use kbq_core::entities::{
    Attachment, BuildState, FaqRecord, IndexVersion, KbRecord, Project, RecordSource, Session,
    Trace,
};
use pretty_assertions::assert_eq;

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "roundtrip failed for {}", stringify!($ty));
        }
    };
}

roundtrip!(project_roundtrip, Project, Project::new("95", "ASPCA"));

roundtrip!(
    faq_roundtrip,
    FaqRecord,
    FaqRecord::new("95", "What does ASPCA stand for?", "American Society for the Prevention of Cruelty to Animals.", RecordSource::Manual)
);

roundtrip!(
    kb_manual_roundtrip,
    KbRecord,
    KbRecord::manual("95", "Policy", "Some content")
);

roundtrip!(
    kb_chunk_roundtrip,
    KbRecord,
    KbRecord::upload_chunk("95", "Policy", "chunk text", 2, "doc-1", "att-1")
);

roundtrip!(
    attachment_roundtrip,
    Attachment,
    Attachment {
        id: "att-1".into(),
        project_id: "95".into(),
        mime: "application/pdf".into(),
        original_name: "policy.pdf".into(),
        bytes: vec![1, 2, 3, 4],
    }
);

roundtrip!(
    index_version_roundtrip,
    IndexVersion,
    IndexVersion::new("95", 1, "fingerprint".into())
);

roundtrip!(build_state_roundtrip, BuildState, BuildState::default());

roundtrip!(
    session_roundtrip,
    Session,
    Session {
        id: "ses-1".into(),
        token_jti: "jti-1".into(),
        scopes: BTreeSet::from(["query".to_string()]),
        issued_at: Utc::now(),
        expires_at: Utc::now() + chrono::TimeDelta::hours(1),
        disabled: false,
    }
);

roundtrip!(
    trace_roundtrip,
    Trace,
    Trace {
        id: "trc-1".into(),
        ts: Utc::now(),
        method: "POST".into(),
        path: "/v1/query".into(),
        status: 200,
        latency_ms: 12,
        ip: "127.0.0.1".into(),
        user_agent: Some("test-agent".into()),
        headers_scrubbed: Default::default(),
        query_params: Default::default(),
        body_sha256: "deadbeef".into(),
        session_id: None,
        error: None,
    }
);
