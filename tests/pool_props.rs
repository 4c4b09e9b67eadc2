//! Pool invariants under arbitrary acquire/release sequences

use keigeki::sim::{Effect, Pool};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Acquire,
    Release(usize),
    Sweep,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Acquire),
        2 => (0usize..8).prop_map(Op::Release),
        1 => Just(Op::Sweep),
    ]
}

proptest! {
    #[test]
    fn pool_tracks_a_simple_model(
        capacity in 1usize..8,
        ops in proptest::collection::vec(op(), 0..200),
    ) {
        let mut pool: Pool<Effect> = Pool::new(capacity);
        let mut model = vec![false; capacity];
        let mut refused = 0u64;

        for op in ops {
            match op {
                Op::Acquire => match pool.acquire() {
                    Some((handle, _)) => {
                        prop_assert!(!model[handle.slot]);
                        model[handle.slot] = true;
                    }
                    None => {
                        prop_assert!(model.iter().all(|&live| live));
                        refused += 1;
                    }
                },
                Op::Release(slot) => {
                    pool.release(slot);
                    if slot < capacity {
                        model[slot] = false;
                    }
                }
                Op::Sweep => {
                    let mut retired = Vec::new();
                    pool.sweep(|h| retired.push(h));
                    // A retired occupancy is gone even if its slot was reused
                    for handle in retired {
                        prop_assert!(pool.get(handle).is_none());
                    }
                }
            }

            prop_assert!(pool.active_count() <= capacity);
            prop_assert_eq!(pool.active_count(), model.iter().filter(|&&l| l).count());
        }
        prop_assert_eq!(pool.dropped_count(), refused);
    }
}
