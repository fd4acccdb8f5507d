//! Property-based tests for the kernel schedule.
//!
//! Replays `KernelLayout::schedule` over concrete buffers and checks that a
//! tier kernel computes the same result as the scalar fallback for every
//! length, lane count and pointer alignment, and touches each element once.

use ezsimd_codegen::layout::{Alignment, KernelLayout, Step};
use ezsimd_registry::{Action, Registry};
use proptest::prelude::*;

fn apply(action: Action, x: i64, y: i64) -> i64 {
    match action {
        Action::Add => x.wrapping_add(y),
        Action::Sub => x.wrapping_sub(y),
        Action::Mul => x.wrapping_mul(y),
        Action::Div if y != 0 => x.wrapping_div(y),
        _ => 0,
    }
}

/// Executes the schedule and returns the output plus a per-index write count.
fn run(
    layout: &KernelLayout,
    action: Action,
    a: &[i64],
    b: &[i64],
    alignment: Alignment,
) -> (Vec<i64>, Vec<u32>) {
    let mut c = vec![0; a.len()];
    let mut writes = vec![0; a.len()];
    for step in layout.schedule(a.len(), alignment) {
        match step {
            Step::Vector { offset, .. } => {
                for i in offset..offset + layout.lanes {
                    c[i] = apply(action, a[i], b[i]);
                    writes[i] += 1;
                }
            }
            Step::Cleanup => {}
            Step::Scalar { index } => {
                c[index] = apply(action, a[index], b[index]);
                writes[index] += 1;
            }
        }
    }
    (c, writes)
}

fn layout(lanes: usize, cleanup: bool) -> KernelLayout {
    KernelLayout {
        lanes,
        align_bytes: 16,
        cleanup: cleanup.then(|| "_mm_empty()".to_owned()),
    }
}

fn arithmetic() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ARITHMETIC.to_vec())
}

fn alignment() -> impl Strategy<Value = Alignment> {
    prop::sample::select(Alignment::ALL.to_vec())
}

fn lane_count() -> impl Strategy<Value = usize> {
    prop::sample::select(vec![1usize, 2, 4, 8, 16, 32])
}

proptest! {
    /// The vectorized schedule matches the scalar loop for every length.
    #[test]
    fn prop_vector_matches_scalar(
        lanes in lane_count(),
        cleanup in any::<bool>(),
        action in arithmetic(),
        align in alignment(),
        values in prop::collection::vec((any::<i64>(), any::<i64>()), 0..100),
    ) {
        let (a, b): (Vec<i64>, Vec<i64>) = values.into_iter().unzip();
        let expected: Vec<i64> = a.iter().zip(&b).map(|(x, y)| apply(action, *x, *y)).collect();
        let (c, writes) = run(&layout(lanes, cleanup), action, &a, &b, align);
        prop_assert_eq!(c, expected);
        prop_assert!(writes.iter().all(|w| *w == 1));
    }

    /// Result does not depend on which pointers are aligned.
    #[test]
    fn prop_alignment_independent(
        lanes in lane_count(),
        action in arithmetic(),
        values in prop::collection::vec((any::<i64>(), any::<i64>()), 0..64),
    ) {
        let (a, b): (Vec<i64>, Vec<i64>) = values.into_iter().unzip();
        let l = layout(lanes, false);
        let (reference, _) = run(&l, action, &a, &b, Alignment::ALL[0]);
        for align in Alignment::ALL {
            let (c, _) = run(&l, action, &a, &b, align);
            prop_assert_eq!(&c, &reference);
        }
    }

    /// Loads and stores follow the probes; cleanup sits between the vector
    /// loop and the scalar tail.
    #[test]
    fn prop_step_order(
        lanes in lane_count(),
        len in 0usize..200,
        align in alignment(),
    ) {
        let steps: Vec<Step> = layout(lanes, true).schedule(len, align).collect();
        let cleanup_at = steps.iter().position(|s| *s == Step::Cleanup);
        prop_assert!(cleanup_at.is_some());
        let cleanup_at = cleanup_at.unwrap_or_default();
        prop_assert_eq!(cleanup_at, len / lanes);
        for step in &steps[..cleanup_at] {
            match step {
                Step::Vector { load_a, load_b, store, .. } => {
                    prop_assert_eq!(*load_a, Action::load(align.a));
                    prop_assert_eq!(*load_b, Action::load(align.b));
                    prop_assert_eq!(*store, Action::store(align.c));
                }
                other => prop_assert!(false, "unexpected {:?} before cleanup", other),
            }
        }
        prop_assert_eq!(steps.len() - cleanup_at - 1, len % lanes);
    }

    /// Sub-lane lengths never enter the vector loop.
    #[test]
    fn prop_short_buffers_stay_scalar(lanes in 2usize..33, len in 0usize..32) {
        prop_assume!(len < lanes);
        let steps: Vec<Step> = layout(lanes, false)
            .schedule(len, Alignment::default())
            .collect();
        prop_assert_eq!(steps.len(), len);
        let all_scalar = steps.iter().all(|s| matches!(s, Step::Scalar { .. }));
        prop_assert!(all_scalar);
    }
}

#[test]
fn add_int32_sse2_length_ten() {
    let registry = Registry::x86();
    let (Some(sse2), Some(int32)) = (
        registry.find_tier("SSE2"),
        registry.find_numeric_type("INT32"),
    ) else {
        panic!("built-in registry is missing SSE2/INT32");
    };
    let layout = KernelLayout::new(sse2, int32);
    assert_eq!(layout.lanes, 4);
    assert_eq!(layout.align_bytes, 16);
    assert_eq!(layout.loop_bound(), 3);

    let steps: Vec<Step> = layout
        .schedule(10, Alignment::new(true, false, true))
        .collect();
    let offsets: Vec<usize> = steps
        .iter()
        .filter_map(|s| match s {
            Step::Vector { offset, .. } => Some(*offset),
            _ => None,
        })
        .collect();
    let tail: Vec<usize> = steps
        .iter()
        .filter_map(|s| match s {
            Step::Scalar { index } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, [0, 4]);
    assert_eq!(tail, [8, 9]);
}

#[test]
fn every_builtin_layout_divides_evenly() {
    let registry = Registry::x86();
    for (tier, action, numeric) in registry.support.supported() {
        let (Some(t), Some(n)) = (registry.find_tier(tier), registry.find_numeric_type(numeric))
        else {
            panic!("{tier}/{numeric} not declared");
        };
        assert_eq!(t.bit_width % n.bit_width, 0, "{tier} {} {numeric}", action.as_str());
        assert!(KernelLayout::new(t, n).lanes >= 1);
    }
}
