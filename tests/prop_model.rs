use std::collections::VecDeque;

use fixring::{Error, RingBuffer, RingBufferAttr};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    AddMulti(Vec<u8>),
    Get,
    GetMulti(usize),
    Peek(isize),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Add),
        2 => prop::collection::vec(any::<u8>(), 1..7).prop_map(Op::AddMulti),
        3 => Just(Op::Get),
        2 => (1usize..7).prop_map(Op::GetMulti),
        2 => (-8isize..8).prop_map(Op::Peek),
        1 => Just(Op::Reset),
    ]
}

/// Reference behaviour: a bounded deque of the retained items.
struct Model {
    items: VecDeque<u8>,
    capacity: usize,
    override_on_full: bool,
}

impl Model {
    fn add_multi(&mut self, batch: &[u8]) -> Result<(), Error> {
        let free = self.capacity - self.items.len();
        if batch.len() > free && (!self.override_on_full || batch.len() > self.capacity) {
            return Err(Error::InsufficientSpace { requested: batch.len(), free });
        }
        for b in batch {
            if self.items.len() == self.capacity {
                self.items.pop_front();
            }
            self.items.push_back(*b);
        }
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_deque_model(
        capacity in 1usize..6,
        override_on_full in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..64),
    ) {
        let attr = RingBufferAttr::default().with_override(override_on_full);
        let mut rb = RingBuffer::new(capacity, attr).unwrap();
        let mut model = Model { items: VecDeque::new(), capacity, override_on_full };

        for op in ops {
            match op {
                Op::Add(b) => {
                    let want = model.add_multi(&[b]).map_err(|_| Error::Full);
                    prop_assert_eq!(rb.add(&[b]), want);
                }
                Op::AddMulti(batch) => {
                    let want = model.add_multi(&batch);
                    prop_assert_eq!(rb.add_multi(&batch), want);
                }
                Op::Get => {
                    let mut out = [0u8];
                    match model.items.pop_front() {
                        Some(b) => {
                            prop_assert_eq!(rb.get(&mut out), Ok(()));
                            prop_assert_eq!(out[0], b);
                        }
                        None => {
                            prop_assert_eq!(rb.get(&mut out), Err(Error::Empty));
                        }
                    }
                }
                Op::GetMulti(n) => {
                    let mut out = vec![0u8; n];
                    if model.items.len() < n {
                        prop_assert_eq!(
                            rb.get_multi(&mut out),
                            Err(Error::InsufficientData { requested: n, available: model.items.len() })
                        );
                    } else {
                        prop_assert_eq!(rb.get_multi(&mut out), Ok(()));
                        let want: Vec<u8> = model.items.drain(..n).collect();
                        prop_assert_eq!(out, want);
                    }
                }
                Op::Peek(idx) => {
                    let got = rb.get_scalar_by_index::<u8>(idx);
                    if !fixring::is_valid_index(idx, capacity) {
                        prop_assert_eq!(got, Err(Error::InvalidIndex { index: idx, capacity }));
                    } else {
                        let len = model.items.len() as isize;
                        // only indices that land on a live item have a defined value
                        let live = if idx >= 0 { idx < len } else { -idx <= len };
                        if live {
                            let pos = (if idx >= 0 { idx } else { len + idx }) as usize;
                            prop_assert_eq!(got, Ok(model.items[pos]));
                        } else {
                            prop_assert!(got.is_ok());
                        }
                    }
                }
                Op::Reset => {
                    model.items.clear();
                    prop_assert_eq!(rb.reset(), Ok(()));
                }
            }

            prop_assert_eq!(rb.taken(), Ok(model.items.len()));
            prop_assert_eq!(rb.free(), Ok(capacity - model.items.len()));
            prop_assert_eq!(rb.is_full(), Ok(model.items.len() == capacity));
            prop_assert_eq!(rb.is_empty(), Ok(model.items.is_empty()));
        }
    }
}
