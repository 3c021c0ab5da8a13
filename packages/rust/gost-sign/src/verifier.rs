//! GOST R 34.10-2012 signature verification.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::bigint::{pos_mod, to_signed};
use crate::curve::{AffinePoint, Curve};
use crate::signer::Signature;

/// Verify `signature` over `digest` under `pub_point` on `curve`.
///
/// Total: any internal arithmetic failure (an unlucky `z1` landing on
/// `scalar_mul`'s `k <= 1` precondition, or the two accumulator
/// x-coordinates colliding so the chord slope's inverse doesn't exist)
/// collapses to `false`, never a surfaced error. This function never does
/// anything but return a bool.
pub fn verify(curve: &Curve, pub_point: &AffinePoint, digest: &[u8; 64], signature: &Signature) -> bool {
    let one = BigUint::from(1u8);
    if signature.r < one || signature.r >= curve.q || signature.s < one || signature.s >= curve.q {
        return false;
    }

    let e = curve.reduce_digest(digest);
    let v = match crate::bigint::modinvert(&to_signed(&e), &to_signed(&curve.q)) {
        Ok(v) => v,
        Err(_) => return false,
    };

    let z1 = (&signature.s * &v) % &curve.q;
    let z2 = (&curve.q - (&signature.r * &v) % &curve.q) % &curve.q;

    let p1 = match curve.scalar_mul(&z1, None) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let q1 = match curve.scalar_mul(&z2, Some(pub_point)) {
        Ok(p) => p,
        Err(_) => return false,
    };

    let p_i = to_signed(&curve.p);
    let lambda_num = pos_mod(&(to_signed(&q1.y) - to_signed(&p1.y)), &p_i);
    let lambda_den = pos_mod(&(to_signed(&q1.x) - to_signed(&p1.x)), &p_i);
    let lambda_inv = match crate::bigint::modinvert(&lambda_den, &p_i) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let lambda = (lambda_num * to_signed(&lambda_inv)) % &p_i;

    let x = pos_mod(
        &(&lambda * &lambda - to_signed(&p1.x) - to_signed(&q1.x)),
        &p_i,
    );

    (x.magnitude() % &curve.q) == signature.r
}
