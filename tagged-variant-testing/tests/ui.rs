//! Compile-time diagnostics of `#[derive(Alternatives)]`.

#[test]
fn ui_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/*.rs");
}
