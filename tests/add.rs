use std::path::Path;

#[test]
fn adds_two_parameters() {
    test_utils::check_jit_result(Path::new("demos/add.teeny"), 42).unwrap();
}
