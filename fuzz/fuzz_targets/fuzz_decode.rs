#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let format = mirmap::detect(data);
    let grid = match mirmap::decode(data) {
        Ok(grid) => grid,
        Err(_) => return,
    };

    assert!(mirmap::validate(&grid));
    if !mirmap::is_missing(data) {
        assert_eq!(grid.format(), format);
    }

    // re-encoding whatever was decoded must never fail
    let out = mirmap::MapEncoder::new().xor_key(0x77).encode(&grid).unwrap();
    assert_eq!(out.len(), grid.format().file_size(grid.width(), grid.height()));
    let _ = mirmap::decode(&out);
});
