use std::path::Path;

#[test]
fn orders_two_floats() {
    test_utils::check_jit_result(Path::new("demos/float_compare.teeny"), 1).unwrap();
}
