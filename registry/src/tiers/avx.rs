//! `AVX` tier: 256-bit floating-point registers.

use super::TierModule;
use crate::model::{Action, TierDescriptor};

/// Returns the `AVX` tier module.
#[must_use]
pub fn module() -> TierModule {
    let both = |ps: &str, pd: &str| {
        vec![("FLOAT32", ps.to_owned()), ("FLOAT64", pd.to_owned())]
    };

    TierModule {
        descriptor: TierDescriptor {
            id: "AVX".to_owned(),
            guard: "__AVX__".to_owned(),
            bit_width: 256,
            target: "avx".to_owned(),
            header: "immintrin.h".to_owned(),
            cleanup: None,
        },
        register_types: vec![
            ("FLOAT32", "__m256".to_owned()),
            ("FLOAT64", "__m256d".to_owned()),
        ],
        support: Action::ARITHMETIC
            .iter()
            .map(|&action| (action, vec!["FLOAT32", "FLOAT64"]))
            .collect(),
        intrinsics: vec![
            (Action::PackAligned, both("_mm256_load_ps", "_mm256_load_pd")),
            (Action::PackUnaligned, both("_mm256_loadu_ps", "_mm256_loadu_pd")),
            (Action::Add, both("_mm256_add_ps", "_mm256_add_pd")),
            (Action::Sub, both("_mm256_sub_ps", "_mm256_sub_pd")),
            (Action::Mul, both("_mm256_mul_ps", "_mm256_mul_pd")),
            (Action::Div, both("_mm256_div_ps", "_mm256_div_pd")),
            (Action::UnpackAligned, both("_mm256_store_ps", "_mm256_store_pd")),
            (Action::UnpackUnaligned, both("_mm256_storeu_ps", "_mm256_storeu_pd")),
        ],
    }
}
