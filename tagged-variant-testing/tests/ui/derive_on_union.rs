#![allow(dead_code)]

use tagged_variant::Alternatives;

#[derive(Alternatives)]
union Bits {
    int: u32,
    float: f32,
}

fn main() {}
