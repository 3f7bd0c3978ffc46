use corral_engine::{EpochRef, Ref, run_epoch_scoped, run_scoped};

fn main() {
    let branded = run_scoped(|scope| {
        let cell = scope.alloc::<for<'a> fn(&'a u8)>(|_| {});
        let same: Ref<'_, for<'a> fn(&'a u8)> = cell;
        scope.read(same).is_ok()
    });
    assert!(branded);

    let epoch = run_epoch_scoped(|store| {
        let cell = store.alloc::<for<'a> fn(&'a u8)>(|_| {}).unwrap();
        let same: EpochRef<for<'a> fn(&'a u8)> = cell;
        store.read(same).is_ok()
    });
    assert!(epoch);
}
