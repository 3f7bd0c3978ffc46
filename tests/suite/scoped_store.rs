//! Scope boundary and store behaviour through the public API

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use corral_engine::{
    EpochStore, RefId, StoreError, StoreOptions, run_epoch_scoped, run_scoped, try_run_scoped,
};

#[test]
fn allocation_ids_strictly_increase() {
    let ids = run_scoped(|scope| {
        let mut ids = Vec::new();
        for n in 0..100_u32 {
            ids.push(scope.alloc(n).id());
        }
        ids
    });
    let expected: Vec<RefId> = (0..100).map(RefId::new).collect();
    assert_eq!(ids, expected);
}

#[test]
fn read_after_write_sees_latest_write() {
    let out = try_run_scoped(|scope| -> Result<Vec<i64>, StoreError> {
        let cell = scope.alloc(0_i64);
        let mut seen = Vec::new();
        for value in [5, -3, i64::MAX, 0] {
            scope.write(cell, value)?;
            seen.push(scope.read(cell)?);
        }
        Ok(seen)
    });
    assert_eq!(out, Ok(vec![5, -3, i64::MAX, 0]));
}

#[test]
fn writes_to_one_cell_leave_others_alone() {
    let out = try_run_scoped(|scope| -> Result<(i32, i32), StoreError> {
        let a = scope.alloc(1);
        let b = scope.alloc(2);
        scope.write(a, 10)?;
        Ok((scope.read(a)?, scope.read(b)?))
    });
    assert_eq!(out, Ok((10, 2)));
}

#[test]
fn allocate_one_two_write_42_read_first() {
    let out = try_run_scoped(|scope| -> Result<i32, StoreError> {
        let h1 = scope.alloc(1);
        let _h2 = scope.alloc(2);
        scope.write(h1, 42)?;
        scope.read(h1)
    });
    assert_eq!(out, Ok(42));
}

#[test]
fn structurally_identical_runs_are_independent() {
    fn computation(seed: i32) -> Result<(RefId, i32), StoreError> {
        try_run_scoped(|scope| -> Result<(RefId, i32), StoreError> {
            let cell = scope.alloc(seed);
            scope.modify(cell, |v: &mut i32| *v += 1)?;
            Ok((cell.id(), scope.read(cell)?))
        })
    }

    let first = computation(0).unwrap();
    let second = computation(100).unwrap();
    // Both scopes hand out id 0, yet each only ever sees its own value.
    assert_eq!(first, (RefId::new(0), 1));
    assert_eq!(second, (RefId::new(0), 101));
}

#[test]
fn store_options_flow_through() {
    let options = StoreOptions::default().with_capacity_hint(8);
    let total = corral_engine::run_scoped_with(&options, |scope| {
        let cells: Vec<_> = (1..=8_u64).map(|n| scope.alloc(n)).collect();
        cells
            .into_iter()
            .map(|cell| scope.read(cell))
            .sum::<Result<u64, StoreError>>()
    });
    assert_eq!(total, Ok(36));
}

#[test]
fn store_is_released_on_every_exit_path() {
    let tracker = Rc::new(());

    let held = run_scoped(|scope| {
        scope.alloc(Rc::clone(&tracker));
        Rc::strong_count(&tracker)
    });
    assert_eq!(held, 2);
    assert_eq!(Rc::strong_count(&tracker), 1, "normal return");

    let failed = try_run_scoped(|scope| -> Result<(), StoreError> {
        let cell = scope.alloc(Rc::clone(&tracker));
        Err(StoreError::DanglingReference { id: cell.id() })
    });
    assert!(failed.is_err());
    assert_eq!(Rc::strong_count(&tracker), 1, "error return");

    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        run_scoped(|scope| -> Result<(), StoreError> {
            let cell = scope.alloc(Rc::clone(&tracker));
            let _held = scope.get(cell)?;
            panic!("computation failed");
        })
    }));
    assert!(caught.is_err());
    assert_eq!(Rc::strong_count(&tracker), 1, "unwind");
}

#[test]
fn epoch_store_rejects_handles_from_a_closed_scope() {
    let leaked = run_epoch_scoped(|store| {
        [1, 2, 3].map(|n| store.alloc(n).expect("store is open"))
    });

    let errors = run_epoch_scoped(|store| {
        leaked
            .iter()
            .map(|handle| store.read(*handle).unwrap_err())
            .collect::<Vec<_>>()
    });
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(StoreError::is_border_crossing));
}

#[test]
fn epoch_store_explicit_lifecycle() {
    let mut store = EpochStore::open(&StoreOptions::default());
    let cell = store.alloc(vec![1_u8]).unwrap();
    store.modify(cell, |v: &mut Vec<u8>| v.push(2)).unwrap();
    assert_eq!(store.read(cell), Ok(vec![1, 2]));

    store.close().unwrap();
    assert_eq!(
        store.read(cell),
        Err(StoreError::ScopeClosed {
            scope: store.epoch()
        })
    );
}
