//! Parameterised architecture resolution tests.

use rstest::rstest;
use tagsync_core::{platform, ArchitectureId, PlatformError};

#[rstest]
#[case("amd64", "linux", "amd64", None)]
#[case("arm32v5", "linux", "arm", Some("v5"))]
#[case("arm32v6", "linux", "arm", Some("v6"))]
#[case("arm32v7", "linux", "arm", Some("v7"))]
#[case("arm64", "linux", "arm64", None)]
#[case("arm64v8", "linux", "arm64", Some("v8"))]
#[case("i386", "linux", "386", None)]
#[case("mips64le", "linux", "mips64le", None)]
#[case("ppc64le", "linux", "ppc64le", None)]
#[case("riscv64", "linux", "riscv64", None)]
#[case("s390x", "linux", "s390x", None)]
#[case("windows-amd64", "windows", "amd64", None)]
fn resolves_supported(
    #[case] id: &str,
    #[case] os: &str,
    #[case] arch: &str,
    #[case] variant: Option<&str>,
) {
    let p = platform::resolve(&ArchitectureId::from(id)).expect("resolve");
    assert_eq!(p.os, os);
    assert_eq!(p.architecture, arch);
    assert_eq!(p.variant.as_deref(), variant);
}

#[rstest]
#[case("")]
#[case("AMD64")]
#[case("arm")]
#[case("sparc64")]
fn rejects_unknown(#[case] id: &str) {
    let err = platform::resolve(&ArchitectureId::from(id)).unwrap_err();
    assert_eq!(
        err,
        PlatformError::UnsupportedArchitecture {
            arch: id.to_string()
        }
    );
}

#[test]
fn every_listed_architecture_resolves() {
    for id in platform::supported_architectures() {
        assert!(platform::resolve(&ArchitectureId::from(id)).is_ok(), "{id}");
    }
}
