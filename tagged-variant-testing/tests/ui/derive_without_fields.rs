#![allow(dead_code)]

use tagged_variant::Alternatives;

#[derive(Alternatives)]
struct Nothing;

fn main() {}
