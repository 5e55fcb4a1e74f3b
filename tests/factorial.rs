use std::path::Path;

#[test]
fn computes_factorial_of_five() {
    test_utils::check_jit_result(Path::new("demos/factorial.teeny"), 120).unwrap();
}
