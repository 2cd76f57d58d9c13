#![no_main]

use libfuzzer_sys::fuzz_target;
use movejudge_render::RenderConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<RenderConfig>(json) {
            let _ = config.validate();
            if let Ok(pretty) = config.to_json_pretty() {
                let reparsed: RenderConfig =
                    serde_json::from_str(&pretty).expect("config must reparse");
                assert_eq!(reparsed, config);
            }
        }
    }
});
