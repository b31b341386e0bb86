use std::thread;

use fixring::{Error, RingBuffer, RingBufferAttr};

const ITEMS: u32 = 200_000;

#[test]
fn spsc_stress_no_loss_no_duplicates() {
    let capacity = 7;
    let mut rb = RingBuffer::new(capacity, RingBufferAttr::default().with_item_size(4)).unwrap();
    let (mut tx, mut rx) = rb.split().unwrap();

    thread::scope(|s| {
        s.spawn(move || {
            for v in 0..ITEMS {
                loop {
                    match tx.add_scalar(v) {
                        Ok(()) => break,
                        Err(Error::Full) => thread::yield_now(),
                        Err(e) => panic!("unexpected error: {e:?}"),
                    }
                }
                assert!(tx.free() <= capacity);
            }
        });

        for expected in 0..ITEMS {
            let v = loop {
                assert!(rx.taken() <= capacity);
                match rx.get_scalar::<u32>() {
                    Ok(v) => break v,
                    Err(Error::Empty) => thread::yield_now(),
                    Err(e) => panic!("unexpected error: {e:?}"),
                }
            };
            assert_eq!(v, expected);
        }
    });

    assert_eq!(rb.taken(), Ok(0));
}

#[test]
fn spsc_stress_multi() {
    const BATCH: usize = 3;
    let mut rb = RingBuffer::new(8, RingBufferAttr::default().with_item_size(8)).unwrap();
    let (mut tx, mut rx) = rb.split().unwrap();

    thread::scope(|s| {
        s.spawn(move || {
            let mut next = 0u64;
            while next < 30_000 {
                let batch: Vec<u8> = (next..next + BATCH as u64).flat_map(|v| v.to_ne_bytes()).collect();
                match tx.add_multi(&batch) {
                    Ok(()) => next += BATCH as u64,
                    Err(Error::InsufficientSpace { .. }) => thread::yield_now(),
                    Err(e) => panic!("unexpected error: {e:?}"),
                }
            }
        });

        let mut expected = 0u64;
        let mut out = [0u8; 8 * BATCH];
        while expected < 30_000 {
            match rx.get_multi(&mut out) {
                Ok(()) => {
                    for chunk in out.chunks_exact(8) {
                        let mut word = [0u8; 8];
                        word.copy_from_slice(chunk);
                        assert_eq!(u64::from_ne_bytes(word), expected);
                        expected += 1;
                    }
                }
                Err(Error::InsufficientData { available, .. }) => {
                    assert!(available <= 8);
                    thread::yield_now();
                }
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
    });

    assert_eq!(rb.taken(), Ok(0));
}
