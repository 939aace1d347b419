//! Algebraic properties of the engine's pure operations, checked over
//! small hand-picked input grids.

use quickcluster_core::{ParameterSchema, Product, Quota, WizardValues};
use quickcluster_wizard::{exceeded, merge, project, ErrorSet, ErrorTag, StepId, WizardConfig};

fn value_sets() -> Vec<WizardValues> {
    vec![
        WizardValues::new(),
        WizardValues::new().with("a", 1),
        WizardValues::new().with("a", 2).with("b", "x"),
        WizardValues::new().with("num_web_nodes", 4).with("web_flavor", "large"),
    ]
}

fn tags() -> Vec<ErrorTag> {
    vec![
        ErrorTag::quota(),
        ErrorTag::invalid_conditions(),
        ErrorTag::missing_required(StepId::AdvancedConfiguration),
    ]
}

// ──────────────────────────────────────
// Value store
// ──────────────────────────────────────

#[test]
fn merge_twice_equals_merge_once() {
    for v in value_sets() {
        for a in value_sets() {
            let once = merge(&v, &a);
            assert_eq!(merge(&once, &a), once, "v={:?} a={:?}", v, a);
        }
    }
}

#[test]
fn merge_keeps_every_key() {
    for v in value_sets() {
        for a in value_sets() {
            let merged = merge(&v, &a);
            for key in v.keys().chain(a.keys()) {
                assert!(merged.contains(key));
            }
            for (key, value) in a.iter() {
                assert_eq!(merged.get(key), Some(value));
            }
        }
    }
}

// ──────────────────────────────────────
// Error set
// ──────────────────────────────────────

#[test]
fn tag_add_is_idempotent_and_remove_of_absent_is_noop() {
    for start in tags() {
        let base = ErrorSet::new().add(start);
        for t in tags() {
            let once = base.clone().add(t);
            assert_eq!(once.clone().add(t), once);
            if !base.contains(&t) {
                assert_eq!(base.clone().remove(t), base);
            }
        }
    }
}

// ──────────────────────────────────────
// Projection and quota
// ──────────────────────────────────────

fn product() -> Product {
    Product::new(1, "p")
        .with_parameter(ParameterSchema::new("num_web_nodes").with_default(2))
        .with_parameter(ParameterSchema::new("web_flavor").with_default("small"))
        .with_flavor("small", Quota::new(2, 4096, 10, 1))
        .with_flavor("large", Quota::new(8, 16384, 40, 2))
}

#[test]
fn projection_is_deterministic() {
    let cfg = WizardConfig::default();
    let baseline = Quota::new(3, 1024, 7, 1);
    for values in value_sets() {
        let first = project(&product(), baseline, &values, &cfg);
        for _ in 0..3 {
            assert_eq!(project(&product(), baseline, &values, &cfg), first);
        }
    }
}

#[test]
fn projection_never_drops_below_baseline() {
    let cfg = WizardConfig::default();
    let baseline = Quota::new(3, 1024, 7, 1);
    for values in value_sets() {
        let total = project(&product(), baseline, &values, &cfg);
        assert!(total.vcpu_count >= baseline.vcpu_count);
        assert!(total.ram_mb >= baseline.ram_mb);
        assert!(total.volumes_gb >= baseline.volumes_gb);
        assert!(total.volume_count >= baseline.volume_count);
    }
}

#[test]
fn comparator_only_clears_on_decrease_or_raised_limit() {
    let limit = Quota::new(16, 65536, 500, 10);
    let over = Quota::new(17, 0, 0, 0);
    assert!(exceeded(&over, &limit).is_some());

    // increasing any other resource keeps it violated
    let more = Quota::new(17, 1024, 10, 1);
    assert!(exceeded(&more, &limit).is_some());

    // compensating decrease
    assert!(exceeded(&Quota::new(16, 0, 0, 0), &limit).is_none());
    // or a raised limit
    let raised = Quota::new(17, 65536, 500, 10);
    assert!(exceeded(&over, &raised).is_none());
}
