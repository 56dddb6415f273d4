use scoped_rbac::rbac::Policy;

pub const SEGMENTS: [&str; 3] = ["a", "b", "c"];

/// A small but representative universe of policies over `SEGMENTS`,
/// covering every variant and nesting up to two levels.
pub fn sample_policies() -> Vec<Policy> {
    let leaves = vec![
        Policy::True,
        Policy::False,
        Policy::set(Vec::<String>::new()),
        Policy::set(["a"]),
        Policy::set(["b", "c"]),
    ];

    let mut policies = leaves.clone();
    policies.push(Policy::dict(Vec::<(String, Policy)>::new()));
    for key in SEGMENTS.iter().take(2) {
        for leaf in &leaves {
            policies.push(Policy::dict([(*key, leaf.clone())]));
        }
    }
    policies.push(Policy::dict([
        ("a", Policy::set(["b"])),
        ("c", Policy::dict([("a", Policy::True)])),
    ]));
    policies.push(Policy::dict([
        ("b", Policy::dict([("c", Policy::set(["a", "b"]))])),
        ("c", Policy::set(["c"])),
    ]));
    policies
}

/// Every path over `SEGMENTS` up to length 3, plus the empty path and a
/// segment no policy mentions.
pub fn sample_paths() -> Vec<Vec<&'static str>> {
    let mut paths: Vec<Vec<&'static str>> = vec![vec![], vec!["zzz"]];
    let mut frontier: Vec<Vec<&'static str>> = vec![vec![]];
    for _ in 0..3 {
        let mut next = Vec::new();
        for path in &frontier {
            for segment in SEGMENTS {
                let mut longer = path.clone();
                longer.push(segment);
                next.push(longer);
            }
        }
        paths.extend(next.iter().cloned());
        frontier = next;
    }
    paths
}

/// Panics with the first path on which the two policies disagree.
pub fn assert_equivalent(left: &Policy, right: &Policy) {
    for path in sample_paths() {
        assert_eq!(
            left.evaluate(&path, &()),
            right.evaluate(&path, &()),
            "policies disagree on {path:?}\n left: {}\nright: {}",
            left.to_json(),
            right.to_json()
        );
    }
}
