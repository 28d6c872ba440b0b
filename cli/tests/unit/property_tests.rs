//! Property tests for node config patching and release version ordering.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use qnode_cli::domain::node_config::{NodeSettings, PatchOutcome, apply_patches, default_patches};
use qnode_cli::domain::manifest::ReleaseVersion;

fn settings() -> impl Strategy<Value = NodeSettings> {
    (-1_000_000i64..1_000_000, 1024u16..u16::MAX, 1024u16..u16::MAX).prop_map(|(frames, grpc, rest)| {
        NodeSettings {
            max_frames: frames,
            listen_grpc_multiaddr: format!("/ip4/127.0.0.1/tcp/{grpc}"),
            listen_rest_multiaddr: format!("/ip4/127.0.0.1/tcp/{rest}"),
        }
    })
}

/// Lines that never contain a patched key.
fn filler() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}: [a-z0-9/.]{0,12}", 0..8)
}

fn fresh_config(before: &[String], after: &[String]) -> String {
    let mut lines = before.to_vec();
    lines.push("engine:".into());
    lines.push("  maxFrames: -1".into());
    lines.push("listenGrpcMultiaddr: \"\"".into());
    lines.push("listenRESTMultiaddr: \"\"".into());
    lines.extend_from_slice(after);
    lines.join("\n") + "\n"
}

proptest! {
    #[test]
    fn prop_patching_twice_changes_nothing(
        s in settings(),
        before in filler(),
        after in filler(),
    ) {
        let patches = default_patches(&s);
        let once = apply_patches(&fresh_config(&before, &after), &patches);
        let twice = apply_patches(&once.text, &patches);

        prop_assert!(once.is_changed());
        prop_assert!(!twice.is_changed());
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.outcomes.iter().all(|(_, o)| *o == PatchOutcome::AlreadySet));
    }

    #[test]
    fn prop_patching_keeps_unrelated_lines(
        s in settings(),
        before in filler(),
        after in filler(),
    ) {
        let report = apply_patches(&fresh_config(&before, &after), &default_patches(&s));
        for line in before.iter().chain(after.iter()) {
            prop_assert!(report.text.lines().any(|l| l == line));
        }
    }

    #[test]
    fn prop_version_order_matches_numeric_tuple(
        a in prop::collection::vec(0u64..50, 1..5),
        b in prop::collection::vec(0u64..50, 1..5),
    ) {
        let join = |v: &[u64]| v.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let va = ReleaseVersion::parse(&join(&a)).unwrap();
        let vb = ReleaseVersion::parse(&join(&b)).unwrap();

        let len = a.len().max(b.len());
        let pad = |v: &[u64]| {
            let mut p = v.to_vec();
            p.resize(len, 0);
            p
        };
        prop_assert_eq!(va.cmp(&vb), pad(&a).cmp(&pad(&b)));
    }

    #[test]
    fn prop_trailing_zero_is_equal(v in prop::collection::vec(0u64..50, 1..4)) {
        let s = v.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        prop_assert_eq!(
            ReleaseVersion::parse(&s).unwrap(),
            ReleaseVersion::parse(&format!("{s}.0")).unwrap()
        );
    }
}
