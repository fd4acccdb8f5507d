//! Kernel schedule model.
//!
//! A [`KernelLayout`] holds the constants one tier kernel is emitted with:
//! lanes per register, the alignment its pointers are probed against, and the
//! optional register-state cleanup. The emitter takes its loop bounds from
//! here, and [`KernelLayout::schedule`] replays the exact control flow of the
//! emitted kernel for a given length and pointer alignment.

use ezsimd_registry::{Action, NumericTypeDescriptor, TierDescriptor};

/// Alignment probe results for the three kernel pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    /// First input is aligned.
    pub a: bool,
    /// Second input is aligned.
    pub b: bool,
    /// Output is aligned.
    pub c: bool,
}

impl Alignment {
    /// All eight (a, b, c) combinations.
    pub const ALL: [Alignment; 8] = [
        Alignment::new(false, false, false),
        Alignment::new(false, false, true),
        Alignment::new(false, true, false),
        Alignment::new(false, true, true),
        Alignment::new(true, false, false),
        Alignment::new(true, false, true),
        Alignment::new(true, true, false),
        Alignment::new(true, true, true),
    ];

    /// Creates a probe result.
    #[must_use]
    pub const fn new(a: bool, b: bool, c: bool) -> Self {
        Self { a, b, c }
    }

    /// Probes byte addresses the way `isAligned(ptr, bytes)` does.
    #[must_use]
    pub fn probe(a: usize, b: usize, c: usize, bytes: usize) -> Self {
        let aligned = |addr: usize| bytes != 0 && addr % bytes == 0;
        Self::new(aligned(a), aligned(b), aligned(c))
    }
}

/// One step of an emitted tier kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One vector iteration over `offset .. offset + lanes`.
    Vector {
        /// First element index.
        offset: usize,
        /// Load used for `a`.
        load_a: Action,
        /// Load used for `b`.
        load_b: Action,
        /// Store used for `c`.
        store: Action,
    },
    /// The tier's register-state cleanup statement.
    Cleanup,
    /// One scalar remainder iteration.
    Scalar {
        /// Element index.
        index: usize,
    },
}

/// The loop constants of one (tier, numeric type) kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelLayout {
    /// Elements per register.
    pub lanes: usize,
    /// Byte alignment the pointers are probed against.
    pub align_bytes: usize,
    /// Statement run after the vector loop, if the tier has one.
    pub cleanup: Option<String>,
}

impl KernelLayout {
    /// Derives the layout for one tier and numeric type. The lane count is
    /// not re-validated against the register width.
    #[must_use]
    pub fn new(tier: &TierDescriptor, numeric: &NumericTypeDescriptor) -> Self {
        Self {
            lanes: tier.lanes(numeric) as usize,
            align_bytes: tier.byte_width() as usize,
            cleanup: tier.cleanup.clone(),
        }
    }

    /// `lanes - 1`, the constant in `i + (lanes - 1) < l`.
    #[must_use]
    pub fn loop_bound(&self) -> usize {
        self.lanes.saturating_sub(1)
    }

    /// Number of elements the vector loop covers for a length `len`.
    #[must_use]
    pub fn vector_span(&self, len: usize) -> usize {
        if self.lanes == 0 {
            return 0;
        }
        len - len % self.lanes
    }

    /// Replays the emitted kernel for `len` elements.
    ///
    /// Yields the vector iterations in order, then [`Step::Cleanup`] when the
    /// tier has a cleanup statement, then one [`Step::Scalar`] per trailing
    /// element.
    pub fn schedule(&self, len: usize, alignment: Alignment) -> impl Iterator<Item = Step> + '_ {
        let span = self.vector_span(len);
        let step = self.lanes.max(1);
        let vector = (0..span).step_by(step).map(move |offset| Step::Vector {
            offset,
            load_a: Action::load(alignment.a),
            load_b: Action::load(alignment.b),
            store: Action::store(alignment.c),
        });
        let cleanup = self.cleanup.as_ref().map(|_| Step::Cleanup);
        let tail = (span..len).map(|index| Step::Scalar { index });
        vector.chain(cleanup).chain(tail)
    }
}
