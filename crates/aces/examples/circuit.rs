//! Homomorphic evaluation of an arithmetic circuit with mid-circuit refresh.
//!
//! Bob encrypts a batch of values with the published key and keeps the level
//! vector of each ciphertext. The circuit (0*1+2*3+4*5)*6+7 is evaluated in
//! two stages: the first stage is refreshed using the levels tracked in
//! parallel, then the second stage completes the computation. Alice, who owns
//! the channel, decrypts and checks the result.

use aces::{AcesParametersBuilder, AcesAlgebra, ArithChannel, Circuit, LevelVec, PlainDomain, Refresher};
use aces_traits::{AcesDecrypter, AcesEncrypter};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(32)
        .set_cipher_modulus(335544321) // 10 * 32^5 + 1
        .set_degree(10)
        .set_width(5)
        .build_arc()?;
    println!(
        "channel: p = {}, q = {}, n = {}, N = {}",
        params.plaintext(),
        params.cipher_modulus(),
        params.degree(),
        params.width()
    );

    let mut rng = rand::rng();
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let algebra = AcesAlgebra::new(&pk);
    let refresher = Refresher::new(&pk);
    let plain = PlainDomain::new(params.plaintext());

    let inputs: Vec<u64> = vec![2, 1, 3, 1, 2, 2, 1, 3];
    let mut send = Vec::new();
    let mut keep = Vec::new();
    for m in &inputs {
        let (ct, levels) = pk.try_encrypt(*m, &mut rng)?;
        send.push(ct);
        keep.push(levels);
    }

    let stage1 = Circuit::parse("0*1+2*3+4*5")?;
    let partial = stage1.evaluate(&algebra, &send)?;
    let tracked = stage1.evaluate(&refresher, &keep)?;
    println!(
        "stage 1: uplvl = {}, tracked level = {}",
        partial.uplvl(),
        refresher.level(&tracked)
    );

    let refreshed = algebra.refresh(&partial, refresher.level(&tracked))?;
    println!("refreshed: uplvl = {}", refreshed.uplvl());

    let stage2 = Circuit::parse("8*6+7")?;
    send.push(refreshed);
    keep.push(LevelVec::zero(params.width()));
    let online = stage2.evaluate(&algebra, &send)?;
    println!("stage 2: uplvl = {}, saturated = {}", online.uplvl(), online.is_saturated());

    let full = Circuit::parse("(0*1+2*3+4*5)*6+7")?;
    let expected = full.evaluate(&plain, &inputs)?;
    let decrypted = channel.secret_key().try_decrypt(&online)?;
    println!("decrypted = {}, expected = {expected}", decrypted.value());
    assert_eq!(decrypted.value(), expected);

    Ok(())
}
