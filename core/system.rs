use serde::Serialize;
use std::env;
use sysinfo::System;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

pub fn gather_host_info() -> HostInfo {
    let info = HostInfo {
        os: env::consts::OS.to_string(),
        arch: env::consts::ARCH.to_string(),
        os_version: System::long_os_version(),
    };
    log::debug!("Host info: {:?}", info);
    info
}

impl HostInfo {
    /// `"<os> <arch>"`, followed by the distribution/version when known.
    pub fn descriptor(&self) -> String {
        match &self.os_version {
            Some(version) if !version.trim().is_empty() => {
                format!("{} {} ({})", self.os, self.arch, version.trim())
            }
            _ => format!("{} {}", self.os, self.arch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_includes_version_when_present() {
        let mut info = HostInfo {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            ..Default::default()
        };
        assert_eq!(info.descriptor(), "linux x86_64");
        info.os_version = Some("Linux 24.04 Ubuntu".to_string());
        assert_eq!(info.descriptor(), "linux x86_64 (Linux 24.04 Ubuntu)");
        info.os_version = Some("  ".to_string());
        assert_eq!(info.descriptor(), "linux x86_64");
    }

    #[test]
    fn gathered_info_names_this_platform() {
        let info = gather_host_info();
        assert_eq!(info.os, env::consts::OS);
        assert_eq!(info.arch, env::consts::ARCH);
    }
}
