#![cfg(test)]
#![allow(dead_code)]

use static_assertions::{assert_impl_all, assert_not_impl_any};
use std::{any::type_name, cell::Cell, rc::Rc, sync::Once};
use tagged_variant::{Alternatives, Variant, VariantError};

/// Installs a tracing subscriber once per test process so the crate's
/// `tracing` events show up in test output.
fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Alternatives)]
struct IntOrString(i32, String);

#[derive(Alternatives)]
struct Shape {
    circle: Circle,
    square: Square,
    label: &'static str,
}

#[derive(Alternatives)]
struct Either<L, R>(L, R);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Circle {
    radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Square {
    side: u32,
}

#[derive(Debug, Clone)]
struct Tracked(Rc<Cell<usize>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

assert_impl_all!(Variant<IntOrString>: Send, Sync, Clone, Default);
assert_impl_all!(Variant<Either<u8, Tracked>>: Clone);
assert_not_impl_any!(Variant<Either<u8, Tracked>>: Send, Sync);

#[test]
fn int_then_string() {
    setup();
    let mut v = Variant::<IntOrString>::new();
    assert!(v.is_empty());

    v.set(42_i32);
    assert_eq!(v.get::<i32, _>(), Ok(&42));

    v.set(String::from("hi"));
    let err = v.get::<i32, _>().unwrap_err();
    assert!(matches!(err, VariantError::TypeMismatch { expected: "i32", found: Some(_) }));
    assert_eq!(v.get::<String, _>().unwrap(), "hi");
}

#[test]
fn named_fields() {
    setup();
    let mut v = Variant::<Shape>::with(Circle { radius: 1.5 });
    assert_eq!(Variant::<Shape>::COUNT, 3);
    assert_eq!(v.get::<Circle, _>(), Ok(&Circle { radius: 1.5 }));

    v.set(Square { side: 4 });
    assert!(v.get::<Circle, _>().is_err());
    assert_eq!(v.get::<Square, _>().map(|s| s.side), Ok(4));

    v.set("label");
    assert_eq!(v.get::<&str, _>(), Ok(&"label"));
    assert_eq!(v.discriminant().index(), Some(2));
}

#[test]
fn generic_alternatives() {
    setup();
    let mut v = Variant::<Either<u8, String>>::with(String::from("right"));
    assert!(v.is::<String, _>());
    assert_eq!(v.take_as::<String, _>().unwrap(), "right");
    assert!(v.is_empty());
    v.set(1_u8);
    assert!(v.is::<u8, _>());
}

#[test]
fn every_alternative_round_trips() {
    setup();
    let mut v = Variant::<Shape>::new();
    let circle = Circle { radius: 0.25 };
    let square = Square { side: 9 };

    v.set(circle);
    assert_eq!(v.get::<Circle, _>().copied(), Ok(circle));
    v.set(square);
    assert_eq!(v.get::<Square, _>().copied(), Ok(square));
    v.set("text");
    assert_eq!(v.get::<&str, _>().copied(), Ok("text"));
}

#[test]
fn take_then_drop_both_drops_once() {
    setup();
    let drops = Rc::new(Cell::new(0));
    let mut first = Variant::<Either<u8, Tracked>>::with(Tracked(drops.clone()));
    let second = first.take();

    assert!(first.is_empty());
    assert!(second.is::<Tracked, _>());
    drop(first);
    drop(second);
    assert_eq!(drops.get(), 1);
}

#[test]
fn clones_are_independent() {
    setup();
    let drops = Rc::new(Cell::new(0));
    let original = Variant::<Either<u8, Tracked>>::with(Tracked(drops.clone()));
    let copy = original.clone();

    drop(original);
    assert_eq!(drops.get(), 1);
    assert!(copy.is::<Tracked, _>());
    drop(copy);
    assert_eq!(drops.get(), 2);
}

#[test]
fn copy_mutation_does_not_leak() {
    setup();
    let original = Variant::<IntOrString>::with(String::from("one"));
    let mut copy = original.clone();
    copy.get_mut::<String, _>().unwrap().push_str(" two");
    assert_eq!(original.get::<String, _>().unwrap(), "one");
    assert_eq!(copy.get::<String, _>().unwrap(), "one two");
}

#[test]
fn assign_from_snapshot_of_self() {
    setup();
    let drops = Rc::new(Cell::new(0));
    let mut v = Variant::<Either<u8, Tracked>>::with(Tracked(drops.clone()));
    let snapshot = v.clone();

    v.assign(&snapshot);
    assert_eq!(drops.get(), 1);
    assert!(v.is::<Tracked, _>());

    drop(snapshot);
    drop(v);
    assert_eq!(drops.get(), 3);
}

#[test]
fn error_messages() {
    let empty = Variant::<IntOrString>::new();
    let err = empty.get::<String, _>().unwrap_err();
    assert!(err.is_empty());
    assert_eq!(
        err.to_string(),
        format!("expected alternative `{}`, variant is empty", type_name::<String>())
    );

    let full = Variant::<IntOrString>::with(1_i32);
    let err = full.get::<String, _>().unwrap_err();
    assert!(!err.is_empty());
    assert_eq!(
        err.to_string(),
        format!("expected alternative `{}`, found `i32`", type_name::<String>())
    );
}
