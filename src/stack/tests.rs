use proptest::prelude::*;
use proptest_derive::Arbitrary;

use super::*;

fn stack(ids: &[u32]) -> Stack<u32> {
    let mut stack = Stack::new();
    for id in ids {
        assert!(stack.add(*id, WindowType::Normal, false));
    }
    stack.verify_invariants();
    stack
}

fn order(stack: &Stack<u32>) -> Vec<u32> {
    stack.order().copied().collect()
}

fn visible(stack: &Stack<u32>) -> Vec<u32> {
    stack.stacking().copied().collect()
}

#[test]
fn restack_valid_permutation() {
    let mut stack = stack(&[1, 2, 3]);
    stack.restack(&[3, 1, 2]).unwrap();
    assert_eq!(order(&stack), [3, 1, 2]);
    stack.verify_invariants();
}

#[test]
fn restack_rejects_invalid_permutations() {
    let mut stack = stack(&[1, 2, 3]);

    assert_eq!(
        stack.restack(&[3, 1, 4]),
        Err(RestackError::UnknownWindow(4))
    );
    assert_eq!(
        stack.restack(&[3, 1, 1]),
        Err(RestackError::Duplicate(1))
    );
    assert_eq!(stack.restack(&[3, 1]), Err(RestackError::Missing(2)));
    assert_eq!(stack.restack(&[]), Err(RestackError::Missing(1)));

    assert_eq!(order(&stack), [1, 2, 3]);
}

#[test]
fn restack_error_messages() {
    assert_eq!(
        RestackError::Missing(7).to_string(),
        "window 7 is missing from the new order"
    );
}

#[test]
fn add_raise_lower_remove() {
    let mut stack = stack(&[1, 2, 3]);
    assert!(!stack.add(2, WindowType::Normal, false));

    assert!(stack.raise(&1));
    assert!(!stack.raise(&1));
    assert_eq!(order(&stack), [2, 3, 1]);

    assert!(stack.lower(&3));
    assert!(!stack.lower(&3));
    assert_eq!(order(&stack), [3, 2, 1]);

    assert!(stack.remove(&2));
    assert!(!stack.remove(&2));
    assert!(!stack.raise(&2));
    assert_eq!(order(&stack), [3, 1]);
}

#[test]
fn minimized_windows_keep_their_place() {
    let mut stack = stack(&[1, 2, 3]);
    assert!(stack.set_minimized(&2, true));
    assert!(!stack.set_minimized(&2, true));
    assert_eq!(visible(&stack), [1, 3]);
    assert_eq!(order(&stack), [1, 2, 3]);

    stack.set_minimized(&2, false);
    assert_eq!(visible(&stack), [1, 2, 3]);
}

#[test]
fn show_desktop_round_trip() {
    let mut stack = stack(&[1, 2]);
    stack.add(10, WindowType::Desktop, false);
    stack.add(11, WindowType::Dock, false);
    stack.add(3, WindowType::Normal, false);
    stack.set_minimized(&2, true);
    let before = visible(&stack);

    assert!(stack.show_desktop());
    assert!(!stack.show_desktop());
    assert_eq!(visible(&stack), [10, 11]);
    assert!(!stack.is_visible(&1));
    stack.verify_invariants();

    assert!(stack.unshow_desktop());
    assert!(!stack.unshow_desktop());
    assert_eq!(visible(&stack), before);
}

#[test]
fn auxiliary_windows_are_created_once() {
    let mut stack = stack(&[]);
    let guard = stack.create_guard_window();
    assert_eq!(stack.create_guard_window(), guard);

    let corner = stack.create_corner_window(ScreenCorner::TopLeft);
    assert_eq!(stack.create_corner_window(ScreenCorner::TopLeft), corner);
    assert_ne!(stack.create_corner_window(ScreenCorner::BottomRight), corner);

    stack.verify_invariants();
}

#[test]
fn server_stack_layout() {
    let mut stack = stack(&[1, 2, 3, 4]);
    let overlay = stack.create_overlay_window();
    let guard = stack.create_guard_window();
    let corner = stack.create_corner_window(ScreenCorner::TopRight);
    stack.set_minimized(&3, true);
    stack.set_minimized(&1, true);

    assert_eq!(
        stack.server_stack(),
        [
            StackItem::Client(1),
            StackItem::Client(3),
            StackItem::Aux(guard),
            StackItem::Client(2),
            StackItem::Client(4),
            StackItem::Aux(corner),
            StackItem::Aux(overlay),
        ]
    );
    assert!(!order(&stack).is_empty());
    stack.verify_invariants();
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Add {
        #[proptest(strategy = "1..=8u32")]
        id: u32,
        desktop: bool,
    },
    Remove(#[proptest(strategy = "1..=8u32")] u32),
    Raise(#[proptest(strategy = "1..=8u32")] u32),
    Lower(#[proptest(strategy = "1..=8u32")] u32),
    SetMinimized(#[proptest(strategy = "1..=8u32")] u32, bool),
    Restack(#[proptest(strategy = "prop::collection::vec(1..=8u32, 0..10)")] Vec<u32>),
    ShowDesktop,
    UnshowDesktop,
    CreateGuard,
    CreateOverlay,
}

impl Op {
    fn apply(self, stack: &mut Stack<u32>) {
        match self {
            Op::Add { id, desktop } => {
                let window_type = if desktop {
                    WindowType::Desktop
                } else {
                    WindowType::Normal
                };
                stack.add(id, window_type, false);
            }
            Op::Remove(id) => {
                stack.remove(&id);
            }
            Op::Raise(id) => {
                stack.raise(&id);
            }
            Op::Lower(id) => {
                stack.lower(&id);
            }
            Op::SetMinimized(id, minimized) => {
                stack.set_minimized(&id, minimized);
            }
            Op::Restack(new_order) => {
                let before = order(stack);
                if stack.restack(&new_order).is_err() {
                    assert_eq!(order(stack), before);
                } else {
                    assert_eq!(order(stack), new_order);
                }
            }
            Op::ShowDesktop => {
                stack.show_desktop();
            }
            Op::UnshowDesktop => {
                stack.unshow_desktop();
            }
            Op::CreateGuard => {
                stack.create_guard_window();
            }
            Op::CreateOverlay => {
                stack.create_overlay_window();
            }
        }
    }
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> Stack<u32> {
    let mut stack = Stack::new();
    for op in ops {
        op.apply(&mut stack);
        stack.verify_invariants();
    }
    stack
}

#[test]
fn restack_after_minimize() {
    let stack = check_ops([
        Op::Add {
            id: 1,
            desktop: false,
        },
        Op::Add {
            id: 2,
            desktop: true,
        },
        Op::SetMinimized(1, true),
        Op::Restack(vec![2, 1]),
        Op::SetMinimized(1, false),
    ]);
    assert_eq!(visible(&stack), [2, 1]);
}

proptest! {
    #[test]
    fn random_operations_dont_panic(ops in prop::collection::vec(any::<Op>(), 0..30)) {
        check_ops(ops);
    }

    #[test]
    fn show_then_unshow_restores_visibility(ops in prop::collection::vec(any::<Op>(), 0..30)) {
        let mut stack = check_ops(ops);
        stack.unshow_desktop();
        let before = visible(&stack);
        stack.show_desktop();
        stack.unshow_desktop();
        prop_assert_eq!(visible(&stack), before);
    }
}
