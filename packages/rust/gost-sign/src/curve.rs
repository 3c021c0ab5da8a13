//! Domain-parameter validation, point addition and scalar multiplication
//! for GOST R 34.10-2012 elliptic curves.

use num_bigint::{BigInt, BigUint};
use num_traits::{Num, Zero};

use crate::bigint::{bytes_to_int, pos_mod, to_signed};
use crate::error::{GostError, Result};

/// A point `(x, y)` in affine coordinates, both components in `[0, p)`.
/// The point at infinity is not representable; see module docs on why
/// that never arises for the inputs this system accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl AffinePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }
}

/// Immutable domain-parameter record: field prime `p`, subgroup order `q`,
/// Weierstrass coefficients `(a, b)`, and base point `(Gx, Gy)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    pub p: BigUint,
    pub q: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    pub g: AffinePoint,
}

impl Curve {
    /// Construct and validate a curve. Fails with [`GostError::InvalidCurve`]
    /// if the base-point equation `Gy^2 = Gx^3 + a*Gx + b (mod p)` does not
    /// hold.
    pub fn new(p: BigUint, q: BigUint, a: BigUint, b: BigUint, gx: BigUint, gy: BigUint) -> Result<Self> {
        let lhs = (&gy * &gy) % &p;
        let rhs = ((&gx * &gx + &a) * &gx + &b) % &p;
        if lhs != rhs {
            return Err(GostError::InvalidCurve);
        }
        Ok(Self {
            p,
            q,
            a,
            b,
            g: AffinePoint::new(gx, gy),
        })
    }

    /// `e = bytes_to_int(digest) mod q`, with the `e == 0 -> e = 1`
    /// substitution. Shared by [`crate::signer::sign`] and
    /// [`crate::verifier::verify`] so the substitution can never drift
    /// between the two call sites.
    pub fn reduce_digest(&self, digest: &[u8]) -> BigUint {
        let e = bytes_to_int(digest) % &self.q;
        if e.is_zero() {
            BigUint::from(1u8)
        } else {
            e
        }
    }

    /// Point addition in affine coordinates. Doubles when `p1 == p2`,
    /// otherwise uses the chord slope. Assumes `p1.x != p2.x` in the
    /// non-doubling branch (no point at infinity); for all well-formed
    /// inputs this system accepts that assumption holds, and a violation
    /// surfaces as [`GostError::NoInverse`] via the missing modular inverse.
    pub fn add(&self, p1: &AffinePoint, p2: &AffinePoint) -> Result<AffinePoint> {
        let p_i = to_signed(&self.p);
        let a_i = to_signed(&self.a);
        let (x1, y1) = (to_signed(&p1.x), to_signed(&p1.y));
        let (x2, y2) = (to_signed(&p2.x), to_signed(&p2.y));

        let lambda = if p1 == p2 {
            let num = (BigInt::from(3) * &x1 * &x1 + &a_i) % &p_i;
            let two_y = pos_mod(&(BigInt::from(2) * &y1), &p_i);
            let den = crate::bigint::modinvert(&two_y, &p_i)?;
            (num * to_signed(&den)) % &p_i
        } else {
            let num = pos_mod(&(&y2 - &y1), &p_i);
            let den = pos_mod(&(&x2 - &x1), &p_i);
            let den_inv = crate::bigint::modinvert(&den, &p_i)?;
            (num * to_signed(&den_inv)) % &p_i
        };

        let x3 = pos_mod(&(&lambda * &lambda - &x1 - &x2), &p_i);
        let y3 = pos_mod(&(&lambda * (&x1 - &x3) - &y1), &p_i);

        Ok(AffinePoint::new(
            x3.magnitude().clone(),
            y3.magnitude().clone(),
        ))
    }

    /// Scalar multiplication `k * P`, defaulting `P` to the base point `G`,
    /// via left-to-right double-and-add, with a pre-decrement loop and its
    /// `k <= 1` precondition:
    /// `k == 1` would make the loop never iterate, so it (and `k == 0`) are
    /// rejected as [`GostError::BadScalar`] rather than silently special-cased.
    pub fn scalar_mul(&self, k: &BigUint, p: Option<&AffinePoint>) -> Result<AffinePoint> {
        if *k <= BigUint::from(1u8) {
            return Err(GostError::BadScalar("scalar_mul requires k >= 2"));
        }
        let base = p.unwrap_or(&self.g);
        let mut t = base.clone();
        let mut acc = base.clone();
        let mut k = k - BigUint::from(1u8);

        while !k.is_zero() {
            if k.bit(0) {
                t = self.add(&t, &acc)?;
            }
            acc = self.add(&acc, &acc)?;
            k >>= 1;
        }
        Ok(t)
    }
}

fn hex_to_biguint(s: &str) -> BigUint {
    BigUint::from_str_radix(s, 16).expect("param set constants are valid hex")
}

/// A named GOST R 34.10-2012 parameter set from RFC 7836, as a convenience
/// constructor. Curve reconstruction on verify never depends on these
/// names: they exist purely so callers, the CLI, and tests can build a
/// [`Curve`] without retyping 512-bit hex literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSet {
    /// `GostR3410_2012_TC26_ParamSetA`.
    TC26A,
    /// `GostR3410_2012_TC26_ParamSetB`.
    TC26B,
}

impl ParamSet {
    /// Build the [`Curve`] for this named parameter set.
    pub fn curve(self) -> Result<Curve> {
        let (p, q, a, b, gx, gy) = match self {
            ParamSet::TC26A => (
                "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFDC7",
                "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF27E69532F48D89116FF22B8D4E0560609B4B38ABFAD2B85DCACDB1411F10B275",
                "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFDC4",
                "E8C2505DEDFC86DDC1BD0B2B6667F1DA34B82574761CB0E879BD081CFD0B6265EE3CB090F30D27614CB4574010DA90DD862EF9D4EBEE4761503190785A71C760",
                "3",
                "7503CFE87A836AE3A61B8816E25450E6CE5E1C93ACF1ABC1778064FDCBEFA921DF1626BE4FD036E93D75E6A50E3A41E98028FE5FC235F5B889A589CB5215F2A4",
            ),
            ParamSet::TC26B => (
                "8000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000006F",
                "800000000000000000000000000000000000000000000000000000000000000149A1EC142565A545ACFDB77BD9D40CFA8B996712101BEA0EC6346C54374F25BD",
                "8000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000006C",
                "687D1B459DC841457E3E06CF6F5E2517B97C7D614AF138BCBF85DC806C4B289F3E965D2DB1416D217F8B276FAD1AB69C50F78BEE1FA3106EFB8CCBC7C5140116",
                "2",
                "1A8F7EDA389B094C2C071E3647A8940F3C123B697578C213BE6DD9E6C8EC7335DCB228FD1EDF4A39152CBCAAF8C0398828041055F94CEEEC7E21340780FE41BD",
            ),
        };
        Curve::new(
            hex_to_biguint(p),
            hex_to_biguint(q),
            hex_to_biguint(a),
            hex_to_biguint(b),
            hex_to_biguint(gx),
            hex_to_biguint(gy),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tc26_param_sets_validate() {
        ParamSet::TC26A.curve().expect("ParamSetA must be a valid curve");
        ParamSet::TC26B.curve().expect("ParamSetB must be a valid curve");
    }

    #[test]
    fn perturbed_base_point_is_rejected() {
        let curve = ParamSet::TC26B.curve().unwrap();
        let bad = Curve::new(
            curve.p.clone(),
            curve.q.clone(),
            curve.a.clone(),
            curve.b.clone(),
            curve.g.x.clone(),
            curve.g.y.clone() + BigUint::from(1u8),
        );
        assert!(matches!(bad, Err(GostError::InvalidCurve)));
    }

    #[test]
    fn perturbed_b_coefficient_is_rejected() {
        let curve = ParamSet::TC26B.curve().unwrap();
        let bad = Curve::new(
            curve.p.clone(),
            curve.q.clone(),
            curve.a.clone(),
            curve.b.clone() + BigUint::from(1u8),
            curve.g.x.clone(),
            curve.g.y.clone(),
        );
        assert!(matches!(bad, Err(GostError::InvalidCurve)));
    }

    #[test]
    fn scalar_mul_rejects_k_below_two() {
        let curve = ParamSet::TC26A.curve().unwrap();
        assert!(matches!(
            curve.scalar_mul(&BigUint::from(0u8), None),
            Err(GostError::BadScalar(_))
        ));
        assert!(matches!(
            curve.scalar_mul(&BigUint::from(1u8), None),
            Err(GostError::BadScalar(_))
        ));
    }

    #[test]
    fn scalar_mul_two_is_doubling() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let doubled = curve.add(&curve.g, &curve.g).unwrap();
        let via_mul = curve.scalar_mul(&BigUint::from(2u8), None).unwrap();
        assert_eq!(doubled, via_mul);
    }

    #[test]
    fn scalar_mul_distributes_over_addition() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let p3 = curve.scalar_mul(&BigUint::from(3u8), None).unwrap();
        let p2 = curve.scalar_mul(&BigUint::from(2u8), None).unwrap();
        let sum = curve.add(&p2, &curve.g).unwrap();
        assert_eq!(p3, sum);
    }
}
