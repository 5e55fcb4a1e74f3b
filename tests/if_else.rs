use std::path::Path;

#[test]
fn picks_the_larger_argument() {
    test_utils::check_jit_result(Path::new("demos/if_else.teeny"), 41).unwrap();
}
