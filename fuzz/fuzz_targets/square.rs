#![no_main]

use arbiter::Square;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|square: Square| {
    assert_eq!(square.to_string().parse::<Square>().ok(), Some(square));
    assert_eq!(Square::from_coords(square.file(), square.rank()), square);
});
