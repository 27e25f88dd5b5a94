use cm_core::ContainerRef;
use group_provider::{CourseManagementGroupProvider, GroupProvider, RoleMapping, SectionRoleResolver};
use metrics_util::CompositeKey;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use std::collections::BTreeMap;
use std::sync::Arc;
use testing::{LAB, TEACHING_ASSISTANT, membership, sample_catalog};

type SnapshotVec = Vec<(
    CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue
)>;

/// Run test closure with a scoped recorder and return the snapshot
fn with_test_recorder<F, R>(f: F) -> (R, SnapshotVec)
where
    F: FnOnce() -> R
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, f);
    let snapshot = snapshotter.snapshot().into_vec();

    (result, snapshot)
}

fn has_metric_with_labels(snapshot: &SnapshotVec, name: &str, labels: &[(&str, &str)]) -> bool {
    snapshot.iter().any(|(k, _, _, _)| {
        if k.key().name() != name {
            return false;
        }
        let key_labels: Vec<_> = k.key().labels().collect();
        labels.iter().all(|(label_name, label_value)| {
            key_labels
                .iter()
                .any(|l| l.key() == *label_name && l.value() == *label_value)
        })
    })
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn test_mapping_fallback_is_counted() {
    let (external, snapshot) = with_test_recorder(|| {
        RoleMapping::new(BTreeMap::new(), "guest", Vec::new()).to_external("Auditor")
    });

    assert_eq!(external, "guest");
    assert!(has_metric_with_labels(
        &snapshot,
        "cm_role_mapping_fallback_total",
        &[("internal_role", "Auditor")]
    ));
}

#[test]
fn test_mapped_role_is_not_counted() {
    let (_, snapshot) = with_test_recorder(|| {
        RoleMapping::new(
            BTreeMap::from([("GSI".to_string(), "maintain".to_string())]),
            "guest",
            Vec::new()
        )
        .to_external("GSI")
    });

    assert!(!has_metric_with_labels(
        &snapshot,
        "cm_role_mapping_fallback_total",
        &[]
    ));
}

#[test]
fn test_provider_reports_unmapped_membership_role() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership(
        TEACHING_ASSISTANT,
        "Auditor",
        ContainerRef::section(LAB)
    ))
    .unwrap();
    let provider = CourseManagementGroupProvider::new(
        Arc::new(cm),
        vec![Arc::new(SectionRoleResolver::default())],
        &config::RoleMappingConfig::default()
    );

    let (role, snapshot) =
        with_test_recorder(|| block_on(provider.get_role(LAB, TEACHING_ASSISTANT)));

    assert_eq!(role.unwrap(), Some("access".to_string()));
    assert!(has_metric_with_labels(
        &snapshot,
        "cm_role_mapping_fallback_total",
        &[("internal_role", "Auditor")]
    ));
    assert!(has_metric_with_labels(
        &snapshot,
        "cm_group_provider_requests_total",
        &[("operation", "get_role")]
    ));
}
