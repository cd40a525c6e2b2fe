//! Backend dispatch (spec §4.6, §9 "Polymorphism over backends").
//!
//! A backend is a capability set of three primitives — `accumulate_512`,
//! `scramble`, `init_custom_secret` — resolved once per process and cached
//! in a lazily-initialized, never-torn-down table, exactly as the spec's
//! capability probe requires.
//!
//! Every backend must be bit-identical to [`crate::accumulator`]'s scalar
//! reference implementation; see `DESIGN.md` for which vector kernels are
//! genuinely vectorized today versus routed through the scalar path while
//! this crate is built without a toolchain to validate hand-written
//! intrinsics against.

mod avx2;
mod neon;
mod scalar;
mod sse2;

use std::sync::OnceLock;

use crate::accumulator::{Width, ACC_LANES};
use crate::error::XxError;

/// Vector-width tag identifying a concrete backend (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    Scalar,
    Sse2,
    Avx2,
    Avx512,
    Neon,
    Sve,
    Vsx,
}

/// The three vectorizable primitives a backend must supply.
pub struct Ops {
    pub id: BackendId,
    pub accumulate_512: fn(&mut [u64; ACC_LANES], &[u8], &[u8], Width),
    pub scramble: fn(&mut [u64; ACC_LANES], &[u8]),
    pub init_custom_secret: fn(&mut [u8; crate::secret::SECRET_DEFAULT_SIZE], u64),
}

static SCALAR_OPS: Ops = Ops {
    id: BackendId::Scalar,
    accumulate_512: scalar::accumulate_512,
    scramble: scalar::scramble,
    init_custom_secret: scalar::init_custom_secret,
};

static SSE2_OPS: Ops = Ops {
    id: BackendId::Sse2,
    accumulate_512: sse2::accumulate_512,
    scramble: sse2::scramble,
    init_custom_secret: sse2::init_custom_secret,
};

static AVX2_OPS: Ops = Ops {
    id: BackendId::Avx2,
    accumulate_512: avx2::accumulate_512,
    scramble: avx2::scramble,
    init_custom_secret: avx2::init_custom_secret,
};

static NEON_OPS: Ops = Ops {
    id: BackendId::Neon,
    accumulate_512: neon::accumulate_512,
    scramble: neon::scramble,
    init_custom_secret: neon::init_custom_secret,
};

/// AVX512 has no dedicated kernel in this crate (spec §9 treats the probe
/// uniformly; a 512-bit kernel is a pure optimization over AVX2, not a
/// behavioral difference). Forcing it succeeds and reuses the AVX2 table,
/// which is documented in `DESIGN.md`.
static AVX512_OPS: Ops = Ops {
    id: BackendId::Avx512,
    accumulate_512: avx2::accumulate_512,
    scramble: avx2::scramble,
    init_custom_secret: avx2::init_custom_secret,
};

/// SVE reuses the NEON kernel for the same reason (spec §9).
static SVE_OPS: Ops = Ops {
    id: BackendId::Sve,
    accumulate_512: neon::accumulate_512,
    scramble: neon::scramble,
    init_custom_secret: neon::init_custom_secret,
};

fn ops_for(id: BackendId) -> &'static Ops {
    match id {
        BackendId::Scalar => &SCALAR_OPS,
        BackendId::Sse2 => &SSE2_OPS,
        BackendId::Avx2 => &AVX2_OPS,
        BackendId::Avx512 => &AVX512_OPS,
        BackendId::Neon => &NEON_OPS,
        BackendId::Sve => &SVE_OPS,
        BackendId::Vsx => &SCALAR_OPS, // no VSX target support; never probed as available
    }
}

/// Whether the current CPU/OS actually supports running `id`'s kernel.
///
/// `Scalar` is always supported. Everything else goes through the
/// standard runtime feature-detection macros (spec §4.6 "Capability
/// probe"); `Vsx` is never detected as available since this crate targets
/// no PowerPC intrinsics.
fn is_supported(id: BackendId) -> bool {
    match id {
        BackendId::Scalar => true,
        #[cfg(target_arch = "x86_64")]
        BackendId::Sse2 => std::is_x86_feature_detected!("sse2"),
        #[cfg(target_arch = "x86_64")]
        BackendId::Avx2 => std::is_x86_feature_detected!("avx2"),
        #[cfg(target_arch = "x86_64")]
        BackendId::Avx512 => std::is_x86_feature_detected!("avx512f"),
        #[cfg(target_arch = "aarch64")]
        BackendId::Neon => std::arch::is_aarch64_feature_detected!("neon"),
        #[cfg(target_arch = "aarch64")]
        BackendId::Sve => std::arch::is_aarch64_feature_detected!("sve"),
        BackendId::Vsx => false,
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// The probe order, strongest first: SSE2 is required before AVX2 is
/// trusted, and AVX2 before AVX512, mirroring spec §4.6's "require SSE2,
/// then additionally require ... AVX2 ... AVX512" chain. On aarch64, SVE
/// is preferred over NEON when present.
fn detect() -> BackendId {
    #[cfg(target_arch = "x86_64")]
    {
        if is_supported(BackendId::Avx512) {
            return BackendId::Avx512;
        }
        if is_supported(BackendId::Avx2) {
            return BackendId::Avx2;
        }
        if is_supported(BackendId::Sse2) {
            return BackendId::Sse2;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if is_supported(BackendId::Sve) {
            return BackendId::Sve;
        }
        if is_supported(BackendId::Neon) {
            return BackendId::Neon;
        }
    }
    BackendId::Scalar
}

static DISPATCH: OnceLock<BackendId> = OnceLock::new();

/// The backend the dispatcher resolves to on this process, probed exactly
/// once (spec §4.6 "The probe runs exactly once per process").
pub fn current_backend() -> BackendId {
    *DISPATCH.get_or_init(|| {
        let chosen = detect();
        tracing::debug!(backend = ?chosen, "xxh3 backend resolved");
        chosen
    })
}

/// The op table for whatever [`current_backend`] resolves to.
pub fn current_ops() -> &'static Ops {
    ops_for(current_backend())
}

/// Force a specific backend, failing if the CPU/OS does not actually
/// support it (spec §4.6 "Verification policy").
pub fn force_backend(id: BackendId) -> Result<&'static Ops, XxError> {
    if is_supported(id) {
        Ok(ops_for(id))
    } else {
        Err(XxError::UnsupportedBackend(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_always_supported() {
        assert!(is_supported(BackendId::Scalar));
        assert!(force_backend(BackendId::Scalar).is_ok());
    }

    #[test]
    fn current_backend_is_stable_across_calls() {
        assert_eq!(current_backend(), current_backend());
    }

    #[test]
    fn vsx_is_never_supported() {
        assert!(!is_supported(BackendId::Vsx));
        assert!(matches!(
            force_backend(BackendId::Vsx),
            Err(XxError::UnsupportedBackend(BackendId::Vsx))
        ));
    }

    #[test]
    fn every_backend_agrees_with_scalar_on_a_stripe() {
        use crate::secret::DEFAULT_SECRET;
        let data: Vec<u8> = (0..64u32).map(|v| v as u8).collect();
        let reference = {
            let mut acc = crate::accumulator::ACC_INIT;
            (SCALAR_OPS.accumulate_512)(&mut acc, &data, &DEFAULT_SECRET, Width::W64);
            acc
        };
        for ops in [&SCALAR_OPS, &SSE2_OPS, &AVX2_OPS, &NEON_OPS] {
            let mut acc = crate::accumulator::ACC_INIT;
            (ops.accumulate_512)(&mut acc, &data, &DEFAULT_SECRET, Width::W64);
            assert_eq!(acc, reference, "backend {:?} diverged", ops.id);
        }
    }
}
