#![allow(dead_code)]

use tagged_variant::Alternatives;

#[derive(Alternatives)]
struct Twice(String, i32, String);

fn main() {}
