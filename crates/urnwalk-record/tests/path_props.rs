use proptest::prelude::*;
use urnwalk_record::{PathStep, RecordPath};

fn step() -> impl Strategy<Value = PathStep> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_map(PathStep::Field),
        (0..64usize).prop_map(PathStep::Index),
    ]
}

fn path() -> impl Strategy<Value = RecordPath> {
    // Record paths always start at a field of the root record
    ("[a-zA-Z_][a-zA-Z0-9_]{0,8}", proptest::collection::vec(step(), 0..6)).prop_map(
        |(head, tail)| {
            tail.into_iter()
                .fold(RecordPath::single(head), |path, step| path.child(step))
        },
    )
}

proptest! {
    #[test]
    fn prop_display_parse_roundtrip(path in path()) {
        let rendered = path.to_string();
        let parsed: RecordPath = rendered.parse().unwrap();
        prop_assert_eq!(parsed, path);
    }

    #[test]
    fn prop_prefixed_matches_child(head in step(), tail in path()) {
        let prefixed = tail.prefixed(head.clone());
        prop_assert_eq!(prefixed.len(), tail.len() + 1);
        prop_assert_eq!(prefixed.first(), Some(&head));
        prop_assert_eq!(&prefixed.steps()[1..], tail.steps());
    }
}
