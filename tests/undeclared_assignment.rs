use std::path::Path;

#[test]
fn rejects_assignment_to_an_undeclared_name() {
    test_utils::check_rejected(Path::new("demos/undeclared_assignment.teeny")).unwrap();
}
