use std::path::Path;

#[test]
fn sums_one_to_ten() {
    test_utils::check_jit_result(Path::new("demos/while_loop.teeny"), 55).unwrap();
}
