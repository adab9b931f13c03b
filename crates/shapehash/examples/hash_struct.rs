use shapehash::{Hasher, Shape};

#[derive(Shape)]
struct Quote {
    venue: String,
    price: f64,
    depths: Vec<u32>,
}

fn main() {
    let hasher = Hasher::<Quote>::new(0).expect("Quote has a hashable shape");
    let quote = Quote { venue: "XNAS".to_owned(), price: 101.25, depths: vec![10, 20, 40] };
    println!("{:#x}", hasher.hash(&quote));
}
