#![no_main]

use libfuzzer_sys::fuzz_target;
use movejudge_dxx::FileFormat;

fuzz_target!(|data: &[u8]| {
    for format in FileFormat::ALL {
        if let Ok(samples) = movejudge_dxx::decode(format, data) {
            if let Ok(bytes) = movejudge_dxx::encode(format, &samples, 48_000) {
                let _ = movejudge_dxx::decode(format, &bytes);
            }
        }
    }
});
