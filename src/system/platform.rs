// EN: src/system/platform.rs

use crate::{
    constants::{KERNEL_IDENTITY_PATH, WSL2_VERSION_MARKER, WSL_ENV_MARKERS, WSL_VENDOR_MARKER},
    models::{OsKind, PlatformType, VirtualizationState},
    system::{
        env::{EnvSource, ProcessEnv},
        probe::ProbeFailure,
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// What the kernel identity text says about WSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelIdentity {
    /// Both the vendor and the WSL2 markers are present.
    SecondGeneration,
    /// Only the vendor marker is present: WSL1, which is not supported.
    FirstGeneration,
    /// No WSL markers at all.
    NoMarkers,
}

/// Classifies kernel identity text (the contents of `/proc/version`).
pub fn classify_kernel_identity(text: &str) -> KernelIdentity {
    let lowered = text.to_lowercase();
    let vendor = lowered.contains(WSL_VENDOR_MARKER);
    let version = lowered.contains(WSL2_VERSION_MARKER);
    match (vendor, version) {
        (true, true) => KernelIdentity::SecondGeneration,
        (true, false) => KernelIdentity::FirstGeneration,
        // A version marker without the vendor marker is not a WSL kernel.
        (false, _) => KernelIdentity::NoMarkers,
    }
}

/// Write-once memo of the virtualization probe. Empty means "unknown".
#[derive(Debug, Default)]
pub struct DetectionCache {
    state: OnceLock<VirtualizationState>,
}

impl DetectionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached state, or `None` while detection has not run yet.
    pub fn get(&self) -> Option<VirtualizationState> {
        self.state.get().copied()
    }

    fn get_or_init(&self, probe: impl FnOnce() -> VirtualizationState) -> VirtualizationState {
        *self.state.get_or_init(probe)
    }
}

/// Classifies the running environment and memoizes the WSL2 probe.
#[derive(Debug)]
pub struct PlatformDetector {
    os: OsKind,
    kernel_identity_path: PathBuf,
    env: Arc<dyn EnvSource>,
    cache: DetectionCache,
}

static SHARED_DETECTOR: OnceLock<PlatformDetector> = OnceLock::new();

impl PlatformDetector {
    /// A detector for the real host: compiled-in OS kind, `/proc/version` and the process environment.
    pub fn new() -> Self {
        Self::with_sources(OsKind::current(), KERNEL_IDENTITY_PATH, Arc::new(ProcessEnv))
    }

    /// A detector with explicit sources, used to probe a simulated host.
    pub fn with_sources(os: OsKind, kernel_identity_path: impl Into<PathBuf>, env: Arc<dyn EnvSource>) -> Self {
        Self {
            os,
            kernel_identity_path: kernel_identity_path.into(),
            env,
            cache: DetectionCache::new(),
        }
    }

    /// The process-wide detector, created on first use.
    pub fn shared() -> &'static Self {
        SHARED_DETECTOR.get_or_init(Self::new)
    }

    /// Returns the platform. The WSL2 probe runs on the first call only.
    pub fn detect_platform(&self) -> PlatformType {
        let virtualization = self.virtualization();
        match self.os {
            OsKind::Windows => PlatformType::Windows,
            OsKind::MacOs => PlatformType::MacOs,
            OsKind::Other => PlatformType::Other,
            OsKind::Linux => match virtualization {
                VirtualizationState::ConfirmedVm2 => PlatformType::Wsl2,
                VirtualizationState::NotVm2 => PlatformType::Linux,
            },
        }
    }

    /// True when running under WSL2.
    pub fn is_wsl2(&self) -> bool {
        self.detect_platform() == PlatformType::Wsl2
    }

    /// The memoized virtualization state, computing it if needed.
    pub fn virtualization(&self) -> VirtualizationState {
        self.cache.get_or_init(|| {
            if self.os != OsKind::Linux {
                return VirtualizationState::NotVm2;
            }
            self.probe_virtualization().unwrap_or_else(|failure| {
                log::debug!("WSL detection failed, assuming native Linux: {}", failure);
                VirtualizationState::NotVm2
            })
        })
    }

    /// The cache, for inspecting whether detection has already happened.
    pub fn cache(&self) -> &DetectionCache {
        &self.cache
    }

    fn probe_virtualization(&self) -> Result<VirtualizationState, ProbeFailure> {
        match self.read_kernel_identity() {
            Ok(text) => match classify_kernel_identity(&text) {
                KernelIdentity::SecondGeneration => {
                    log::debug!("WSL2 kernel detected.");
                    return Ok(VirtualizationState::ConfirmedVm2);
                }
                KernelIdentity::FirstGeneration => {
                    log::warn!(
                        "WSL1 detected. Only WSL2 is supported; upgrade with `wsl --set-version <distro> 2`. Treating this host as plain Linux."
                    );
                    return Ok(VirtualizationState::NotVm2);
                }
                KernelIdentity::NoMarkers => {}
            },
            Err(failure) => log::debug!("Kernel identity unavailable: {}", failure),
        }

        if let Some(marker) = WSL_ENV_MARKERS.iter().find(|key| self.env.var(key).is_some()) {
            log::warn!(
                "WSL environment variable '{}' is set but the kernel does not identify as WSL2. Could not confirm WSL2; treating this host as plain Linux.",
                marker
            );
        }
        Ok(VirtualizationState::NotVm2)
    }

    fn read_kernel_identity(&self) -> Result<String, ProbeFailure> {
        fs::read_to_string(&self.kernel_identity_path).map_err(|source| ProbeFailure::Read {
            path: self.kernel_identity_path.display().to_string(),
            source,
        })
    }
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `PlatformDetector::shared().detect_platform()`.
pub fn detect_platform() -> PlatformType {
    PlatformDetector::shared().detect_platform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_logs, warnings};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WSL2_VERSION: &str = "Linux version 5.15.153.1-microsoft-standard-WSL2 (root@941d701f84f1) (gcc (GCC) 11.2.0)";
    const WSL1_VERSION: &str = "Linux version 4.4.0-19041-Microsoft (Microsoft@Microsoft.com) (gcc version 5.4.0)";
    const NATIVE_VERSION: &str = "Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075) (x86_64-linux-gnu-gcc-13)";

    fn kernel_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn empty_env() -> Arc<dyn EnvSource> {
        Arc::new(HashMap::<String, String>::new())
    }

    #[test]
    fn test_classify_kernel_identity() {
        assert_eq!(classify_kernel_identity(WSL2_VERSION), KernelIdentity::SecondGeneration);
        assert_eq!(classify_kernel_identity(WSL1_VERSION), KernelIdentity::FirstGeneration);
        assert_eq!(classify_kernel_identity(NATIVE_VERSION), KernelIdentity::NoMarkers);
        assert_eq!(classify_kernel_identity("custom-wsl2-kernel"), KernelIdentity::NoMarkers);
    }

    #[test]
    fn test_wsl2_kernel_yields_wsl2_platform() {
        let file = kernel_file(WSL2_VERSION);
        let detector = PlatformDetector::with_sources(OsKind::Linux, file.path(), empty_env());
        assert_eq!(detector.detect_platform(), PlatformType::Wsl2);
        assert!(detector.is_wsl2());
    }

    #[test]
    fn test_wsl1_kernel_yields_plain_linux() {
        let file = kernel_file(WSL1_VERSION);
        let detector = PlatformDetector::with_sources(OsKind::Linux, file.path(), empty_env());
        assert_eq!(detector.detect_platform(), PlatformType::Linux);
        assert_eq!(detector.cache().get(), Some(VirtualizationState::NotVm2));
    }

    #[test]
    fn test_wsl1_warns_once_across_repeated_detection() {
        capture_logs();
        let file = kernel_file(WSL1_VERSION);
        let detector = PlatformDetector::with_sources(OsKind::Linux, file.path(), empty_env());

        for _ in 0..3 {
            assert_eq!(detector.detect_platform(), PlatformType::Linux);
        }
        assert!(!detector.is_wsl2());

        let warnings = warnings();
        assert_eq!(warnings.len(), 1, "{:?}", warnings);
        assert!(warnings.iter().all(|w| w.contains("WSL1") && w.contains("Only WSL2 is supported")));
    }

    #[test]
    fn test_wsl2_and_native_kernels_do_not_warn() {
        capture_logs();
        for version in [WSL2_VERSION, NATIVE_VERSION] {
            let file = kernel_file(version);
            PlatformDetector::with_sources(OsKind::Linux, file.path(), empty_env()).detect_platform();
        }
        assert!(warnings().is_empty(), "{:?}", warnings());
    }

    #[test]
    fn test_detection_is_memoized_after_source_disappears() {
        let file = kernel_file(WSL2_VERSION);
        let path = file.path().to_path_buf();
        let detector = PlatformDetector::with_sources(OsKind::Linux, &path, empty_env());

        assert_eq!(detector.cache().get(), None);
        assert_eq!(detector.detect_platform(), PlatformType::Wsl2);

        drop(file);
        assert!(!path.exists());

        assert_eq!(detector.detect_platform(), PlatformType::Wsl2);
        assert_eq!(detector.cache().get(), Some(VirtualizationState::ConfirmedVm2));
    }

    #[test]
    fn test_env_markers_without_kernel_markers_stay_linux() {
        let file = kernel_file(NATIVE_VERSION);
        let env: Arc<dyn EnvSource> = Arc::new(HashMap::from([(
            "WSL_DISTRO_NAME".to_string(),
            "Ubuntu".to_string(),
        )]));
        capture_logs();
        let detector = PlatformDetector::with_sources(OsKind::Linux, file.path(), env);
        assert_eq!(detector.detect_platform(), PlatformType::Linux);
        assert_eq!(detector.detect_platform(), PlatformType::Linux);

        let warnings = warnings();
        assert_eq!(warnings.len(), 1, "{:?}", warnings);
        assert!(warnings.iter().all(|w| w.contains("WSL_DISTRO_NAME") && w.contains("Could not confirm WSL2")));
    }

    #[test]
    fn test_unreadable_kernel_identity_falls_back_to_linux() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("version");
        let detector = PlatformDetector::with_sources(OsKind::Linux, missing, empty_env());
        assert_eq!(detector.detect_platform(), PlatformType::Linux);
    }

    #[test]
    fn test_non_linux_never_reads_kernel_identity() {
        // The WSL2 file would flip a Linux detector, but a macOS one must ignore it.
        let file = kernel_file(WSL2_VERSION);
        let detector = PlatformDetector::with_sources(OsKind::MacOs, file.path(), empty_env());
        assert_eq!(detector.detect_platform(), PlatformType::MacOs);
        assert_eq!(detector.cache().get(), Some(VirtualizationState::NotVm2));

        let windows = PlatformDetector::with_sources(OsKind::Windows, file.path(), empty_env());
        assert_eq!(windows.detect_platform(), PlatformType::Windows);
    }
}
