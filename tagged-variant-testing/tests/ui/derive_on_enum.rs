#![allow(dead_code)]

use tagged_variant::Alternatives;

#[derive(Alternatives)]
enum Shape {
    Circle,
    Square,
}

fn main() {}
