//! Precomputed multiplication tables shared by signing and verification.
use crate::{
    Error, Scalar,
    ecmult::{ECMultContext, ECMultGenContext, WINDOW_G, WINDOW_G_RANGE},
    group::Gej,
};
use rand_core::{CryptoRng, RngCore};

/// Runtime options for building a [`Context`].
///
/// ```
/// use p256k1::{Context, context::ContextConfig};
/// let config = ContextConfig {
///     ecmult_window: 8,
///     blinding_seed: Some([7u8; 32]),
/// };
/// let ctx = Context::with_config(&config).unwrap();
/// assert_eq!(ctx.ecmult().window_g(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextConfig {
    /// wNAF window for multiples of the generator in variable time
    /// multiplication. Each extra bit doubles the size of the two tables
    /// (`2^(window - 2)` points each). Must be in `2..=15`.
    pub ecmult_window: usize,
    /// Seed to randomize the fixed-base blinding with right after construction.
    pub blinding_seed: Option<[u8; 32]>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            ecmult_window: WINDOW_G,
            blinding_seed: None,
        }
    }
}

/// Holds the precomputed tables for variable time multi-scalar multiplication
/// and for constant-time multiplication of the generator.
///
/// Building a context is expensive (the default window allocates about a
/// megabyte) so build one and share it. A `Context` is immutable apart from
/// [`randomize`](Context::randomize), which needs exclusive access.
///
/// ```
/// use p256k1::{Context, Scalar};
/// let mut ctx = Context::new();
/// ctx.randomize(Some(&[42u8; 32]));
/// let one_g = ctx.ecmult_gen(&Scalar::ONE);
/// let also_one_g = ctx.ecmult().ecmult(&one_g, &Scalar::ZERO, &Scalar::ONE);
/// assert!(one_g.eq_var(&also_one_g));
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    ecmult: ECMultContext,
    gen_ctx: ECMultGenContext,
}

impl Context {
    /// Builds a context with the default configuration.
    pub fn new() -> Self {
        Self::build(WINDOW_G, None)
    }

    /// Builds a context from `config`.
    ///
    /// Fails with [`Error::InvalidInput`] if the window is out of range.
    #[tracing::instrument(level = "debug", skip_all, fields(window = config.ecmult_window))]
    pub fn with_config(config: &ContextConfig) -> Result<Self, Error> {
        if !WINDOW_G_RANGE.contains(&config.ecmult_window) {
            tracing::debug!("ecmult window out of range");
            return Err(Error::InvalidInput);
        }
        Ok(Self::build(config.ecmult_window, config.blinding_seed.as_ref()))
    }

    fn build(window: usize, seed: Option<&[u8; 32]>) -> Self {
        let mut ctx = Self {
            ecmult: ECMultContext::new(window),
            gen_ctx: ECMultGenContext::new(),
        };
        if seed.is_some() {
            ctx.randomize(seed);
        }
        tracing::debug!(window, "built multiplication context");
        ctx
    }

    /// Refreshes the blinding used by [`Context::ecmult_gen`] with `seed`.
    ///
    /// Blinding protects fixed-base multiplication (signing, key generation)
    /// against side channels. Passing `None` resets the blinding to its
    /// deterministic initial state. Results of any operation are unaffected.
    pub fn randomize(&mut self, seed: Option<&[u8; 32]>) {
        tracing::trace!(reset = seed.is_none(), "randomizing context");
        self.gen_ctx.blind(seed);
    }

    /// Like [`randomize`](Context::randomize) with a seed drawn from `rng`.
    pub fn randomize_with_rng(&mut self, rng: &mut (impl RngCore + CryptoRng)) {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        self.randomize(Some(&seed));
    }

    /// The variable time multiplication tables.
    pub fn ecmult(&self) -> &ECMultContext {
        &self.ecmult
    }

    /// The constant-time fixed-base tables.
    pub fn ecmult_gen_context(&self) -> &ECMultGenContext {
        &self.gen_ctx
    }

    /// Computes `k * G` in constant time.
    pub fn ecmult_gen(&self, k: &Scalar) -> Gej {
        self.gen_ctx.ecmult_gen(k)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
lazy_static::lazy_static! {
    /// Built once and shared between tests.
    pub(crate) static ref TEST_CONTEXT: Context = Context::new();
}
