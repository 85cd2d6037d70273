//! End-to-end scenarios for the ACES cryptosystem.

use aces::{
    AcesAlgebra, AcesParametersBuilder, ArithChannel, Circuit, Error, LevelVec, ParametersError,
    PlainDomain, Refresher,
};
use aces_traits::{AcesDecrypter, AcesEncrypter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error as StdError;

#[test]
fn s1_add_and_mult() -> Result<(), Box<dyn StdError>> {
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(4)
        .set_cipher_modulus(47601551)
        .set_degree(5)
        .set_width(10)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(101);
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let sk = channel.secret_key();
    let algebra = AcesAlgebra::new(&pk);

    let (c1, _) = pk.try_encrypt(3, &mut rng)?;
    let (c2, _) = pk.try_encrypt(2, &mut rng)?;

    let sum = algebra.add(&c1, &c2);
    assert!(!sum.is_saturated());
    assert_eq!(sk.try_decrypt(&sum)?.value(), 1); // (3 + 2) mod 4

    let product = algebra.mult(&c1, &c2);
    assert!(!product.is_saturated());
    assert_eq!(sk.try_decrypt(&product)?.value(), 2); // (3 * 2) mod 4

    Ok(())
}

#[test]
fn s2_round_trip_below_saturation() -> Result<(), Box<dyn StdError>> {
    // q = 32^5 + 1, q / p = 1048576.03125.
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(32)
        .set_cipher_modulus(33554433)
        .set_degree(10)
        .set_width(2)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(102);
    let channel = ArithChannel::generate(&params, &mut rng)?;

    let (ct, levels) = channel.public_key().try_encrypt(3, &mut rng)?;
    assert!(ct.uplvl() < 1048576);
    assert!(!ct.is_saturated());
    assert_eq!(levels.len(), 2);

    let pt = channel.secret_key().try_decrypt(&ct)?;
    assert_eq!(pt.value(), 3);
    assert!(!pt.saturated());
    Ok(())
}

#[test]
fn s3_refresh_rescues_a_deep_circuit() -> Result<(), Box<dyn StdError>> {
    // q = 10 * 32^5 + 1, q / p = 10485760.03125. The vanishers are forced
    // noisy so every fresh ciphertext starts with the full bound N * p.
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(32)
        .set_cipher_modulus(335544321)
        .set_degree(10)
        .set_width(5)
        .set_zero_noise_probability(0.0)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(103);
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let sk = channel.secret_key();
    let algebra = AcesAlgebra::new(&pk);
    let refresher = Refresher::new(&pk);
    let plain = PlainDomain::new(32);

    let inputs: Vec<u64> = vec![2, 1, 3, 1, 2, 2, 1, 3];
    let mut send = Vec::new();
    let mut keep = Vec::new();
    for m in &inputs {
        let (ct, k) = pk.try_encrypt(*m, &mut rng)?;
        send.push(ct);
        keep.push(k);
    }

    // Evaluating the whole circuit in one go exceeds q / p.
    let full = Circuit::parse("(0*1+2*3+4*5)*6+7")?;
    let truth = full.evaluate(&plain, &inputs)?;
    let naive = full.evaluate(&algebra, &send)?;
    assert!(naive.is_saturated());
    assert!(sk.try_decrypt(&naive)?.saturated());

    // Splitting the circuit keeps the first stage below q / p.
    let stage1 = Circuit::parse("0*1+2*3+4*5")?;
    let partial = stage1.evaluate(&algebra, &send)?;
    assert!(!partial.is_saturated());
    assert_eq!(sk.try_decrypt(&partial)?.value(), stage1.evaluate(&plain, &inputs)?);

    // The refresher evaluated the same circuit over the level vectors; its
    // scalar output is what the refresh strips from the ciphertext.
    let tracked = stage1.evaluate(&refresher, &keep)?;
    let level = refresher.level(&tracked);
    let refreshed = algebra.refresh(&partial, level)?;
    assert!(refreshed.uplvl() < partial.uplvl());
    assert_eq!(sk.try_decrypt(&refreshed)?.value(), sk.try_decrypt(&partial)?.value());

    // Second stage over the refreshed ciphertext, whose residual noise is no
    // longer tracked.
    let stage2 = Circuit::parse("8*6+7")?;
    let mut send2 = send.clone();
    send2.push(refreshed);
    let mut keep2 = keep.clone();
    keep2.push(LevelVec::zero(params.width()));
    let tracked2 = stage2.evaluate(&refresher, &keep2)?;
    assert_eq!(tracked2.len(), params.width());

    let online = stage2.evaluate(&algebra, &send2)?;
    let mut plain_inputs = inputs.clone();
    plain_inputs.push(truth_of_stage1(&inputs));
    assert_eq!(stage2.evaluate(&plain, &plain_inputs)?, truth);
    assert_eq!(sk.try_decrypt(&online)?.value(), truth);

    Ok(())
}

fn truth_of_stage1(inputs: &[u64]) -> u64 {
    (inputs[0] * inputs[1] + inputs[2] * inputs[3] + inputs[4] * inputs[5]) % 32
}

#[test]
fn s4_small_channel() -> Result<(), Box<dyn StdError>> {
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(27)
        .set_cipher_modulus(1000001)
        .set_degree(10)
        .set_width(1)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(104);
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let sk = channel.secret_key();
    let algebra = AcesAlgebra::new(&pk);

    let (c1, _) = pk.try_encrypt(3, &mut rng)?;
    let (c2, _) = pk.try_encrypt(5, &mut rng)?;
    assert_eq!(sk.try_decrypt(&algebra.add(&c1, &c2))?.value(), 8);
    assert_eq!(sk.try_decrypt(&algebra.mult(&c1, &c2))?.value(), 15);
    Ok(())
}

#[test]
fn s5_saturated_decryption_warns() -> Result<(), Box<dyn StdError>> {
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(4)
        .set_cipher_modulus(47601551)
        .set_degree(5)
        .set_width(10)
        .set_zero_noise_probability(0.0)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(105);
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let algebra = AcesAlgebra::new(&pk);

    let (mut ct, _) = pk.try_encrypt(1, &mut rng)?;
    while !ct.is_saturated() {
        let (one, _) = pk.try_encrypt(1, &mut rng)?;
        ct = algebra.mult(&ct, &one);
    }

    // The value is still returned, but flagged as unreliable.
    let pt = channel.secret_key().try_decrypt(&ct)?;
    assert!(pt.saturated());
    assert!(pt.value() < 4);
    Ok(())
}

#[test]
fn s6_parameter_gating() {
    // p = 10, q = 50: p^2 = 100 > 50.
    let e = AcesParametersBuilder::new()
        .set_plaintext_modulus(10)
        .set_cipher_modulus(50)
        .set_degree(10)
        .set_width(1)
        .build()
        .unwrap_err();
    assert_eq!(
        e,
        Error::ParametersError(ParametersError::CipherModulusTooSmall(50, 100))
    );
}

#[test]
fn circuit_evaluations_agree_across_domains() -> Result<(), Box<dyn StdError>> {
    let params = AcesParametersBuilder::new()
        .set_plaintext_modulus(4)
        .set_cipher_modulus(47601551)
        .set_degree(5)
        .set_width(10)
        .build_arc()?;
    let mut rng = ChaCha8Rng::seed_from_u64(106);
    let channel = ArithChannel::generate(&params, &mut rng)?;
    let pk = channel.public_key();
    let sk = channel.secret_key();
    let algebra = AcesAlgebra::new(&pk);
    let plain = PlainDomain::new(4);

    let inputs: Vec<u64> = vec![3, 2, 1, 3];
    let mut encrypted = Vec::new();
    for m in &inputs {
        let (ct, _) = pk.try_encrypt(*m, &mut rng)?;
        encrypted.push(ct);
    }

    for src in ["0+1", "0*1", "0*1+2*3", "(0+1)*2+3"] {
        let circuit = Circuit::parse(src)?;
        let expected = circuit.evaluate(&plain, &inputs)?;
        let online = circuit.evaluate(&algebra, &encrypted)?;
        assert_eq!(sk.try_decrypt(&online)?.value(), expected, "{src}");
    }
    Ok(())
}
