//! Arithmetic channels: key generation for the ACES encryption scheme.

use crate::errors::{Error, Result};
use crate::keys::{AcesPublicKey, SecretKey};
use crate::parameters::AcesParameters;
use aces_math::linalg::solve_in_basis;
use aces_math::ru::{dot_product, Context, Poly};
use ndarray::{Array2, Array3};
use rand::{CryptoRng, Rng, RngCore};
use std::sync::Arc;
use zeroize::Zeroize;

/// Number of secret key draws attempted before key generation reports a
/// singular basis.
const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// An arithmetic channel: the complete key material of an ACES cryptosystem.
///
/// Generation samples the reduction polynomial u, the secret key x, the
/// initializer matrix f0, the vanishers e', the noisy key f1 = f0 x + e', and
/// the 3-tensor expressing every product x_i x_j in the basis (1, x_1, ...,
/// x_n). The published portion may be shared freely; the secret key is only
/// reachable through the channel value itself and is zeroized on drop.
pub struct ArithChannel {
    par: Arc<AcesParameters>,
    secret: SecretKey,
    public: Arc<AcesPublicKey>,
}

impl ArithChannel {
    /// Generates a fresh channel for the given parameters, drawing all key
    /// material from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(
        par: &Arc<AcesParameters>,
        rng: &mut R,
    ) -> Result<Self> {
        let ctx = Arc::new(Context::random(par.cipher_modulus(), par.degree(), rng)?);

        // The tensor solve fails when the drawn secret basis is singular
        // modulo the composite q; x is redrawn in that case.
        let (x, tensor) = Self::generate_secret(&ctx, rng)?;

        let n = par.degree();
        let width = par.width();
        let p = par.plaintext();

        // Every entry of f0 evaluates at omega to p times a multiplier below
        // q / p, hence to a multiple of p in [0, q).
        let f0 = Array2::from_shape_fn((width, n), |_| {
            let multiplier = rng.random_range(0..par.cipher_modulus() / p);
            Poly::random_with_eval(&ctx, p * multiplier, rng)
        });

        // Vanishers: e'_i(1) = p * delta_i with delta_i in {0, 1}, and
        // delta_i = 0 with probability P0.
        let p0 = par.zero_noise_probability();
        let mut lvl_e = Vec::with_capacity(width);
        let mut e = Vec::with_capacity(width);
        for _ in 0..width {
            let delta: u64 = if rng.random_bool(p0) { 0 } else { 1 };
            lvl_e.push(delta);
            e.push(Poly::random_with_eval(&ctx, p * delta, rng));
        }

        // f1 = f0 x + e'.
        let f1 = (0..width)
            .map(|i| {
                let row = f0.row(i);
                let mut f1_i = dot_product(row.iter(), x.iter());
                f1_i += &e[i];
                f1_i
            })
            .collect::<Vec<_>>();

        // The vanishers conceal the secret key inside f1 and must not
        // outlive the channel construction.
        e.iter_mut().for_each(|ei| ei.zeroize());

        let secret = SecretKey::new(par, &ctx, x, &lvl_e);
        let public = Arc::new(AcesPublicKey::new(par, &ctx, f0, f1, tensor, lvl_e));
        Ok(Self {
            par: par.clone(),
            secret,
            public,
        })
    }

    /// Draws secret keys until the induced linear system is solvable, and
    /// returns the key together with its linearization tensor.
    fn generate_secret<R: RngCore + CryptoRng>(
        ctx: &Arc<Context>,
        rng: &mut R,
    ) -> Result<(Box<[Poly]>, Array3<u64>)> {
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let mut x = (0..ctx.degree())
                .map(|_| Poly::random(ctx, rng))
                .collect::<Vec<_>>();
            match Self::solve_tensor(ctx, &x) {
                Ok(tensor) => return Ok((x.into_boxed_slice(), tensor)),
                Err(_) => x.iter_mut().for_each(|xi| xi.zeroize()),
            }
        }
        Err(Error::GenerationError(format!(
            "the secret basis was singular after {MAX_KEYGEN_ATTEMPTS} draws"
        )))
    }

    /// Computes the 3-tensor lambda such that, for all i, j,
    /// x_i x_j = lambda\[i\]\[j\]\[0\] + sum_k lambda\[i\]\[j\]\[k\] x_k in
    /// Z_q\[X\]/(u).
    fn solve_tensor(ctx: &Arc<Context>, x: &[Poly]) -> Result<Array3<u64>> {
        let n = x.len();
        let q = ctx.modulus_operators();

        // One column per basis element: the constant 1, then the coefficient
        // vectors of the x_k.
        let mut basis = Array2::zeros((ctx.degree(), n + 1));
        basis[[0, 0]] = 1;
        for (k, xk) in x.iter().enumerate() {
            for (r, c) in xk.coefficients().iter().enumerate() {
                basis[[r, k + 1]] = *c;
            }
        }

        let mut tensor = Array3::zeros((n, n, n + 1));
        for i in 0..n {
            for j in i..n {
                let product = &x[i] * &x[j];
                let lambda = solve_in_basis(q, &basis, product.coefficients())?;
                for (k, lk) in lambda.iter().enumerate() {
                    tensor[[i, j, k]] = *lk;
                    tensor[[j, i, k]] = *lk;
                }
            }
        }
        Ok(tensor)
    }

    /// Returns the published portion of the channel.
    pub fn public_key(&self) -> Arc<AcesPublicKey> {
        self.public.clone()
    }

    /// Returns the secret key. Only the holder of the channel can reach it.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// Returns the parameters of the channel.
    pub const fn parameters(&self) -> &Arc<AcesParameters> {
        &self.par
    }
}

#[cfg(test)]
mod tests {
    use super::ArithChannel;
    use crate::AcesParametersBuilder;
    use aces_math::ru::{dot_product, Poly};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::error::Error;

    #[test]
    fn channel_invariants() -> Result<(), Box<dyn Error>> {
        let params = AcesParametersBuilder::new()
            .set_plaintext_modulus(4)
            .set_cipher_modulus(47601551)
            .set_degree(5)
            .set_width(10)
            .build_arc()?;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let channel = ArithChannel::generate(&params, &mut rng)?;
        let pk = channel.public_key();
        let ctx = pk.context();
        let q = ctx.modulus_operators();
        let p = params.plaintext();

        // u is monic of degree n and vanishes at omega = 1 modulo q.
        let u = ctx.reduction_polynomial();
        assert_eq!(u.len(), params.degree() + 1);
        assert_eq!(u[params.degree()], 1);
        assert_eq!(u.iter().fold(0u64, |acc, ui| q.add(acc, *ui)), 0);

        // Every f0 entry evaluates at omega to a multiple of p.
        for f in pk.initializer() {
            assert_eq!(f.eval_at_omega() % p, 0);
        }

        // f1 = f0 x + e' exactly, with e'_i(1) = p * lvl_e[i].
        let x = &channel.secret_key().x;
        for (i, f1_i) in pk.noisy_key().iter().enumerate() {
            let row = pk.initializer().row(i);
            let e_i = f1_i - &dot_product(row.iter(), x.iter());
            assert_eq!(e_i.eval_at_omega(), p * pk.vanisher_levels()[i]);
        }

        // x_i x_j reduced modulo u equals lambda^0 + sum_k lambda^k x_k.
        let tensor = pk.tensor();
        for i in 0..params.degree() {
            for j in 0..params.degree() {
                let mut rhs = Poly::constant(ctx, tensor[[i, j, 0]]);
                for (k, xk) in x.iter().enumerate() {
                    rhs += &(xk * tensor[[i, j, k + 1]]);
                }
                assert_eq!(&x[i] * &x[j], rhs);
            }
        }

        Ok(())
    }

    #[test]
    fn distinct_channels_from_distinct_draws() -> Result<(), Box<dyn Error>> {
        let params = AcesParametersBuilder::new()
            .set_plaintext_modulus(4)
            .set_cipher_modulus(47601551)
            .set_degree(5)
            .set_width(2)
            .build_arc()?;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let c1 = ArithChannel::generate(&params, &mut rng)?;
        let c2 = ArithChannel::generate(&params, &mut rng)?;
        assert_ne!(c1.secret_key().x, c2.secret_key().x);
        Ok(())
    }
}
