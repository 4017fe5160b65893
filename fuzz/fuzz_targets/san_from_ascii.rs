#![no_main]

use arbiter::san::Token;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = Token::from_ascii(data) else {
        return;
    };
    let roundtripped = Token::from_ascii(token.to_string().as_bytes()).expect("roundtrip");
    assert_eq!(token, roundtripped);
});
