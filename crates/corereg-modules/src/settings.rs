//! Core setting metadata.
//!
//! Values live in the external configuration store; these entries only
//! describe defaults and accepted ranges.

use corereg_core::SettingInfo;
use corereg_registry::Module;

pub const TCP_CONNECT_TIMEOUT: &str = "network/limits/tcp/connect_timeout_seconds";
pub const PACKET_PEER_MAX_BUFFER_PO2: &str = "network/limits/packet_peer_stream/max_buffer_po2";
pub const CERTIFICATE_BUNDLE_OVERRIDE: &str = "network/ssl/certificate_bundle_override";

pub fn module() -> Module {
    Module::new("settings")
        .setting(SettingInfo::new(TCP_CONNECT_TIMEOUT, 30).with_range(1, 1800, 1))
        .setting(
            SettingInfo::new(PACKET_PEER_MAX_BUFFER_PO2, 16)
                .with_range(0, 64, 1)
                .or_greater()
                .restart_required(),
        )
        .setting(SettingInfo::new(CERTIFICATE_BUNDLE_OVERRIDE, "").with_file_filter("*.crt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use corereg_core::SettingValue;

    #[test]
    fn core_settings() {
        let module = module();
        let settings = module.settings();
        assert_eq!(settings.len(), 3);

        let timeout = &settings[0];
        assert_eq!(timeout.default, SettingValue::Int(30));
        assert!(timeout.validate(&SettingValue::Int(1800)).is_ok());
        assert!(timeout.validate(&SettingValue::Int(1801)).is_err());

        let po2 = &settings[1];
        assert!(po2.restart_required);
        assert!(po2.validate(&SettingValue::Int(100)).is_ok());

        let bundle = &settings[2];
        assert!(bundle.validate(&SettingValue::from("")).is_ok());
        assert!(bundle.validate(&SettingValue::from("certs/ca.crt")).is_ok());
        assert!(bundle.validate(&SettingValue::from("certs/ca.pem")).is_err());
    }
}
