#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(records) = mirmap::decode_objects(data) {
        let out = mirmap::encode_objects(&records);
        assert_eq!(mirmap::decode_objects(&out).unwrap().len(), records.len());
    }
});
