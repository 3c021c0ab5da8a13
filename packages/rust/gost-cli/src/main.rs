//! Non-interactive front end for `gost-sign`: `genkey`, `sign`, `verify`.
//!
//! Deliberately thin. No session-scoped key list, `use <idx>`/`keylist`/
//! `delkey`/`clear` commands, or interactive shell loop: those need
//! key-management persistence this crate treats as out of scope.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{eyre, Context, Result};
use gost_sign::{sign_file_default, verify_file_default, AffinePoint, ParamSet, PrivateScalar};
use num_bigint::BigUint;

#[derive(Parser)]
#[command(name = "gost-cli", about = "Sign and verify files with GOST R 34.10-2012")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ParamSetArg {
    A,
    B,
}

impl From<ParamSetArg> for ParamSet {
    fn from(v: ParamSetArg) -> Self {
        match v {
            ParamSetArg::A => ParamSet::TC26A,
            ParamSetArg::B => ParamSet::TC26B,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Sample a private scalar and write it (32 bytes, little-endian) to a file.
    Genkey {
        #[arg(long, value_enum, default_value_t = ParamSetArg::A)]
        param_set: ParamSetArg,
        #[arg(long)]
        out: PathBuf,
    },
    /// Sign a file, writing `<path>.sign` next to it.
    Sign {
        path: PathBuf,
        #[arg(long)]
        key: PathBuf,
        #[arg(long, value_enum, default_value_t = ParamSetArg::A)]
        param_set: ParamSetArg,
    },
    /// Verify a file against its signature envelope.
    Verify {
        path: PathBuf,
        #[arg(long)]
        sign_path: Option<PathBuf>,
        #[arg(long, requires = "expected_pub_y")]
        expected_pub_x: Option<String>,
        #[arg(long, requires = "expected_pub_x")]
        expected_pub_y: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Genkey { param_set, out } => {
            let curve: ParamSet = param_set.into();
            let curve = curve.curve().wrap_err("invalid built-in curve parameters")?;
            let prv = PrivateScalar::random(&mut rand::rngs::OsRng);
            let pub_point = curve
                .scalar_mul(&prv.to_scalar(), None)
                .wrap_err("derived private key is unusable")?;

            fs::write(&out, prv.to_bytes()).wrap_err("writing private key file")?;
            log::info!("private key written to {}", out.display());
            println!("private key written to {}", out.display());
            println!("public key x = {}", pub_point.x);
            println!("public key y = {}", pub_point.y);
            Ok(())
        }

        Command::Sign { path, key, param_set } => {
            let curve: ParamSet = param_set.into();
            let curve = curve.curve().wrap_err("invalid built-in curve parameters")?;
            let key_bytes = fs::read(&key).wrap_err("reading private key file")?;
            let key_bytes: [u8; 32] = key_bytes
                .try_into()
                .map_err(|_| eyre!("private key file must be exactly 32 bytes"))?;
            let prv = PrivateScalar::from_bytes(key_bytes);

            let sign_path = sign_file_default(&path, &curve, &prv)?;
            log::info!("signed {} -> {}", path.display(), sign_path.display());
            println!("signature written to {}", sign_path.display());
            Ok(())
        }

        Command::Verify {
            path,
            sign_path,
            expected_pub_x,
            expected_pub_y,
        } => {
            let expected_pub = match (expected_pub_x, expected_pub_y) {
                (Some(x), Some(y)) => Some(AffinePoint::new(
                    x.parse::<BigUint>().wrap_err("--expected-pub-x is not a decimal integer")?,
                    y.parse::<BigUint>().wrap_err("--expected-pub-y is not a decimal integer")?,
                )),
                _ => None,
            };

            let ok = verify_file_default(&path, sign_path.as_deref(), expected_pub.as_ref())?;
            if ok {
                println!("OK: signature is valid");
            } else {
                println!("FAILED: signature is invalid");
            }
            std::process::exit(if ok { 0 } else { 1 });
        }
    }
}
