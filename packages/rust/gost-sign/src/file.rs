//! The file driver: hash a file, build an envelope, write `<path>.sign`;
//! load an envelope, verify it against the companion file.

use std::fs;
use std::path::{Path, PathBuf};

use rand::{CryptoRng, RngCore};

use crate::bigint::PrivateScalar;
use crate::curve::{AffinePoint, Curve};
use crate::digest::{require_64, streebog_512, DigestFn};
use crate::envelope::Envelope;
use crate::error::{GostError, Result};
use crate::signer::sign;
use crate::verifier::verify;

fn default_sign_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".sign");
    PathBuf::from(os)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp_os = path.as_os_str().to_owned();
    tmp_os.push(".tmp");
    let tmp_path = PathBuf::from(tmp_os);
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Sign `path`, writing the DER envelope to `<path>.sign` (atomically,
/// write-then-rename) and returning the path written to.
///
/// `digest_fn` is the pluggable 64-byte hash adapter; `rng` supplies the
/// per-signature nonce and must be cryptographically secure (`OsRng` for
/// production callers).
pub fn sign_file<R: RngCore + CryptoRng>(
    path: impl AsRef<Path>,
    curve: &Curve,
    prv: &PrivateScalar,
    digest_fn: DigestFn,
    rng: &mut R,
) -> Result<PathBuf> {
    let path = path.as_ref();
    (|| -> Result<PathBuf> {
        let data = fs::read(path)?;
        let digest_bytes = digest_fn(&data);
        let digest = require_64(&digest_bytes)?;

        let signature = sign(curve, prv, digest, rng)?;
        let pub_point = curve.scalar_mul(&prv.to_scalar(), None)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let envelope = Envelope {
            p: curve.p.clone(),
            q: curve.q.clone(),
            a: curve.a.clone(),
            b: curve.b.clone(),
            gx: curve.g.x.clone(),
            gy: curve.g.y.clone(),
            pub_point,
            signature,
            filesize: data.len() as u64,
            filename,
        };

        let sign_path = default_sign_path(path);
        atomic_write(&sign_path, &envelope.encode())?;
        log::debug!("wrote signature envelope to {}", sign_path.display());
        Ok(sign_path)
    })()
    .map_err(|e| GostError::SignFailed(Box::new(e)))
}

/// Convenience wrapper around [`sign_file`] using the default Streebog-512
/// digest adapter and the OS CSPRNG.
pub fn sign_file_default(path: impl AsRef<Path>, curve: &Curve, prv: &PrivateScalar) -> Result<PathBuf> {
    sign_file(path, curve, prv, streebog_512, &mut rand::rngs::OsRng)
}

/// Verify `path` against its signature envelope.
///
/// `sign_path` defaults to `<path>.sign`; if it does not exist, returns
/// `Ok(false)` rather than an error. If `expected_pub` is supplied and does
/// not match the envelope's public point, returns `Ok(false)` without
/// reconstructing or validating the curve, or hashing the file: a wrong
/// `expected_pub` short-circuits even against an envelope whose domain
/// parameters wouldn't otherwise validate.
pub fn verify_file(
    path: impl AsRef<Path>,
    digest_fn: DigestFn,
    sign_path: Option<&Path>,
    expected_pub: Option<&AffinePoint>,
) -> Result<bool> {
    let path = path.as_ref();
    (|| -> Result<bool> {
        let sign_path = sign_path
            .map(PathBuf::from)
            .unwrap_or_else(|| default_sign_path(path));
        if !sign_path.exists() {
            return Ok(false);
        }

        let envelope_bytes = fs::read(&sign_path)?;
        let envelope = Envelope::decode(&envelope_bytes)?;

        if let Some(expected) = expected_pub {
            if &envelope.pub_point != expected {
                log::warn!("public key mismatch, refusing to verify {}", path.display());
                return Ok(false);
            }
        }

        let curve = Curve::new(
            envelope.p.clone(),
            envelope.q.clone(),
            envelope.a.clone(),
            envelope.b.clone(),
            envelope.gx.clone(),
            envelope.gy.clone(),
        )?;
        let data = fs::read(path)?;
        let digest_bytes = digest_fn(&data);
        let digest = require_64(&digest_bytes)?;

        Ok(verify(&curve, &envelope.pub_point, digest, &envelope.signature))
    })()
    .map_err(|e| GostError::VerifyFailed(Box::new(e)))
}

/// Convenience wrapper around [`verify_file`] using the default
/// Streebog-512 digest adapter.
pub fn verify_file_default(
    path: impl AsRef<Path>,
    sign_path: Option<&Path>,
    expected_pub: Option<&AffinePoint>,
) -> Result<bool> {
    verify_file(path, streebog_512, sign_path, expected_pub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::ParamSet;
    use num_bigint::BigUint;
    use std::io::Write;

    fn temp_file(contents: &[u8]) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gost-sign-test-{}-{}", std::process::id(), fastrand_u64()));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    fn fastrand_u64() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
    }

    #[test]
    fn s2_sign_then_verify_lorem_ipsum() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let prv = PrivateScalar::from_scalar(&BigUint::from(777u32)).unwrap();
        let path = temp_file(b"lorem ipsum");

        let sign_path = sign_file_default(&path, &curve, &prv).unwrap();
        assert!(verify_file_default(&path, None, None).unwrap());

        let envelope_bytes = fs::read(&sign_path).unwrap();
        let envelope = Envelope::decode(&envelope_bytes).unwrap();
        assert_eq!(envelope.filesize, 11);
        assert_eq!(envelope.filename, path.file_name().unwrap().to_str().unwrap());

        fs::remove_file(&path).unwrap();
        fs::remove_file(&sign_path).unwrap();
    }

    #[test]
    fn s3_bit_flip_in_s_breaks_verification() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let prv = PrivateScalar::from_scalar(&BigUint::from(778u32)).unwrap();
        let path = temp_file(b"lorem ipsum");
        let sign_path = sign_file_default(&path, &curve, &prv).unwrap();

        let mut envelope = Envelope::decode(&fs::read(&sign_path).unwrap()).unwrap();
        envelope.signature.s = envelope.signature.s ^ BigUint::from(1u8);
        fs::write(&sign_path, envelope.encode()).unwrap();

        assert!(!verify_file_default(&path, None, None).unwrap());

        fs::remove_file(&path).unwrap();
        fs::remove_file(&sign_path).unwrap();
    }

    #[test]
    fn s4_wrong_algo_surfaces_verify_failed() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let prv = PrivateScalar::from_scalar(&BigUint::from(779u32)).unwrap();
        let path = temp_file(b"lorem ipsum");
        let sign_path = sign_file_default(&path, &curve, &prv).unwrap();

        let mut bytes = fs::read(&sign_path).unwrap();
        let needle = crate::der::encode_octet_string(&crate::envelope::ALGO);
        let pos = bytes.windows(needle.len()).position(|w| w == needle.as_slice()).unwrap();
        bytes[pos + needle.len() - 1] = 0x01;
        fs::write(&sign_path, &bytes).unwrap();

        let err = verify_file_default(&path, None, None).unwrap_err();
        assert!(matches!(err, GostError::VerifyFailed(inner) if matches!(*inner, GostError::BadEnvelope(_))));

        fs::remove_file(&path).unwrap();
        fs::remove_file(&sign_path).unwrap();
    }

    #[test]
    fn s5_wrong_expected_pub_short_circuits() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let prv = PrivateScalar::from_scalar(&BigUint::from(780u32)).unwrap();
        let path = temp_file(b"lorem ipsum");
        let sign_path = sign_file_default(&path, &curve, &prv).unwrap();

        let bogus = AffinePoint::new(BigUint::from(0u8), BigUint::from(0u8));
        assert!(!verify_file_default(&path, None, Some(&bogus)).unwrap());

        fs::remove_file(&path).unwrap();
        fs::remove_file(&sign_path).unwrap();
    }

    #[test]
    fn s6_wrong_expected_pub_short_circuits_before_curve_validation() {
        let curve = ParamSet::TC26A.curve().unwrap();
        let prv = PrivateScalar::from_scalar(&BigUint::from(781u32)).unwrap();
        let path = temp_file(b"lorem ipsum");
        let sign_path = sign_file_default(&path, &curve, &prv).unwrap();

        let mut envelope = Envelope::decode(&fs::read(&sign_path).unwrap()).unwrap();
        envelope.b = envelope.b ^ BigUint::from(1u8);
        fs::write(&sign_path, envelope.encode()).unwrap();

        let bogus = AffinePoint::new(BigUint::from(0u8), BigUint::from(0u8));
        assert!(!verify_file_default(&path, None, Some(&bogus)).unwrap());

        fs::remove_file(&path).unwrap();
        fs::remove_file(&sign_path).unwrap();
    }

    #[test]
    fn missing_sign_file_verifies_false() {
        let path = temp_file(b"no signature here");
        assert!(!verify_file_default(&path, None, None).unwrap());
        fs::remove_file(&path).unwrap();
    }
}
