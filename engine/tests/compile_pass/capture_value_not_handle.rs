use corral_engine::run_scoped;

fn main() {
    let mut slot = None;
    run_scoped(|scope| {
        let cell = scope.alloc(0_u8);
        slot = Some(scope.read(cell));
    });
    assert_eq!(slot, Some(Ok(0)));
}
