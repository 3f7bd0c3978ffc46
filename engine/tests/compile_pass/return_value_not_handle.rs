use corral_engine::{StoreError, run_scoped};

fn main() {
    let value: Result<&str, StoreError> = run_scoped(|scope| {
        let cell = scope.alloc("a");
        scope.read(cell)
    });
    assert_eq!(value, Ok("a"));
}
