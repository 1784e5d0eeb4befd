/// CPU特性检测模块
///
/// 运行时检测3D内核可用的SIMD指令集，结果只检测一次并缓存

use std::fmt;
use std::sync::OnceLock;

/// CPU特性标志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuFeatures {
    // x86/x64特性
    pub sse2: bool,
    pub sse3: bool,
    pub sse41: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,

    // ARM特性
    pub neon: bool,

    // 厂商信息
    pub vendor: CpuVendor,
    pub brand: String,
}

/// CPU厂商
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVendor {
    Intel,
    Amd,
    AppleSilicon,
    Qualcomm,
    Other,
}

impl CpuFeatures {
    /// 检测当前CPU特性
    fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self::detect_x86_64()
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self::detect_aarch64()
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::default()
        }
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_x86_64() -> Self {
        let avx = is_x86_feature_detected!("avx");
        Self {
            sse2: is_x86_feature_detected!("sse2"),
            sse3: is_x86_feature_detected!("sse3"),
            sse41: is_x86_feature_detected!("sse4.1"),
            avx,
            avx2: avx && is_x86_feature_detected!("avx2"),
            // FMA3 只和AVX一起使用
            fma: avx && is_x86_feature_detected!("fma"),
            neon: false,
            vendor: Self::detect_x86_vendor(),
            brand: Self::get_cpu_brand(),
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_aarch64() -> Self {
        let brand = Self::get_cpu_brand();
        Self {
            sse2: false,
            sse3: false,
            sse41: false,
            avx: false,
            avx2: false,
            fma: false,
            neon: std::arch::is_aarch64_feature_detected!("neon"),
            vendor: Self::detect_arm_vendor(&brand),
            brand,
        }
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_x86_vendor() -> CpuVendor {
        // cpuid leaf 0: 厂商字符串按 ebx, edx, ecx 排列
        // SAFETY: x86_64 上 cpuid 指令总是可用
        let result = unsafe { std::arch::x86_64::__cpuid(0) };
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&result.ebx.to_le_bytes());
        bytes[4..8].copy_from_slice(&result.edx.to_le_bytes());
        bytes[8..12].copy_from_slice(&result.ecx.to_le_bytes());

        match &bytes {
            b"GenuineIntel" => CpuVendor::Intel,
            b"AuthenticAMD" => CpuVendor::Amd,
            _ => CpuVendor::Other,
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_arm_vendor(brand: &str) -> CpuVendor {
        let brand = brand.to_lowercase();
        if brand.contains("apple") {
            CpuVendor::AppleSilicon
        } else if brand.contains("qualcomm") || brand.contains("snapdragon") {
            CpuVendor::Qualcomm
        } else {
            CpuVendor::Other
        }
    }

    fn get_cpu_brand() -> String {
        // 尝试从/proc/cpuinfo读取（Linux）
        #[cfg(target_os = "linux")]
        {
            if let Ok(content) = std::fs::read_to_string("/proc/cpuinfo") {
                for line in content.lines() {
                    if line.starts_with("model name") || line.starts_with("Hardware") {
                        if let Some(name) = line.split(':').nth(1) {
                            return name.trim().to_string();
                        }
                    }
                }
            }
        }

        // macOS可以使用sysctl
        #[cfg(target_os = "macos")]
        {
            use std::process::Command;
            if let Ok(output) = Command::new("sysctl")
                .arg("-n")
                .arg("machdep.cpu.brand_string")
                .output()
            {
                if let Ok(brand) = String::from_utf8(output.stdout) {
                    return brand.trim().to_string();
                }
            }
        }

        "Unknown".to_string()
    }
}

impl Default for CpuFeatures {
    fn default() -> Self {
        Self {
            sse2: false,
            sse3: false,
            sse41: false,
            avx: false,
            avx2: false,
            fma: false,
            neon: false,
            vendor: CpuVendor::Other,
            brand: "Unknown".to_string(),
        }
    }
}

impl fmt::Display for CpuFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.vendor, self.brand)?;
        let flags = [
            ("sse2", self.sse2),
            ("sse3", self.sse3),
            ("sse4.1", self.sse41),
            ("avx", self.avx),
            ("avx2", self.avx2),
            ("fma", self.fma),
            ("neon", self.neon),
        ];
        for (name, enabled) in flags {
            if enabled {
                write!(f, " +{}", name)?;
            }
        }
        Ok(())
    }
}

/// 全局CPU特性缓存
static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// 检测CPU特性（缓存结果）
pub fn detect_cpu_features() -> &'static CpuFeatures {
    CPU_FEATURES.get_or_init(CpuFeatures::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_detection() {
        let features = detect_cpu_features();

        #[cfg(target_arch = "x86_64")]
        assert!(features.sse2, "SSE2 should be available on all x86_64 CPUs");

        #[cfg(target_arch = "aarch64")]
        assert!(features.neon, "NEON should be available on all aarch64 CPUs");

        // FMA 必须伴随 AVX
        assert!(!features.fma || features.avx);
    }

    #[test]
    fn test_detection_is_cached() {
        let a = detect_cpu_features() as *const CpuFeatures;
        let b = detect_cpu_features() as *const CpuFeatures;
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_lists_flags() {
        let features = CpuFeatures {
            sse2: true,
            avx: true,
            ..CpuFeatures::default()
        };
        let text = features.to_string();
        assert!(text.contains("+sse2"));
        assert!(text.contains("+avx"));
        assert!(!text.contains("+neon"));
    }
}
