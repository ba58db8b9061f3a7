use rand::{RngCore, SeedableRng};
use rand_chacha::ChaChaRng;

use verkle_ipa::{Fr, InnerProductProof, IpaConfig, Transcript, CRS_SEED};

fn random_scalar(rng: &mut ChaChaRng) -> Fr {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    Fr::from_bytes_le_reduced(&bytes)
}

fn random_poly(rng: &mut ChaChaRng, n: usize) -> Vec<Fr> {
    (0..n).map(|_| random_scalar(rng)).collect()
}

#[test]
fn prove_and_verify_over_production_domain() {
    let mut rng = ChaChaRng::seed_from_u64(100);
    let config = IpaConfig::verkle();
    let poly = random_poly(&mut rng, 256);
    let commitment = config.commit(&poly);
    let point = random_scalar(&mut rng);
    let value = config.evaluate(&poly, &point);

    let mut prover_transcript = Transcript::new(b"verkle");
    let proof = InnerProductProof::create(
        &mut prover_transcript,
        &config,
        commitment,
        poly,
        point,
    );
    assert_eq!(proof.serialized_size(), (2 * 8 + 1) * 32);

    let mut verifier_transcript = Transcript::new(b"verkle");
    assert!(proof
        .verify(&mut verifier_transcript, &config, commitment, point, value)
        .is_ok());
}

#[test]
fn opening_at_domain_index() {
    // Evaluations 1, 2, 3, 4 over a 4-point domain on the first four
    // production basis points: opening at index 2 must yield 3 and nothing
    // else.
    let config = IpaConfig::new(4, CRS_SEED);
    let poly = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64), Fr::from(4u64)];
    let commitment = config.commit(&poly);
    let point = Fr::from(2u64);

    let mut prover_transcript = Transcript::new(b"verkle");
    let proof =
        InnerProductProof::create(&mut prover_transcript, &config, commitment, poly, point);

    let mut verifier_transcript = Transcript::new(b"verkle");
    assert!(proof
        .verify(
            &mut verifier_transcript,
            &config,
            commitment,
            point,
            Fr::from(3u64),
        )
        .is_ok());

    let mut verifier_transcript = Transcript::new(b"verkle");
    assert!(proof
        .verify(
            &mut verifier_transcript,
            &config,
            commitment,
            point,
            Fr::from(4u64),
        )
        .is_err());
}

#[test]
fn tampered_proofs_are_rejected() {
    let mut rng = ChaChaRng::seed_from_u64(101);
    let config = IpaConfig::new(32, b"ipa test");
    let poly = random_poly(&mut rng, 32);
    let commitment = config.commit(&poly);
    let point = random_scalar(&mut rng);
    let value = config.evaluate(&poly, &point);

    let mut prover_transcript = Transcript::new(b"verkle");
    let proof =
        InnerProductProof::create(&mut prover_transcript, &config, commitment, poly, point);
    let bytes = proof.to_bytes();

    // Flip one byte in L_0, in R_0, and in the final scalar in turn; each
    // mutation must either fail to parse or fail to verify.
    let lg_n = (bytes.len() / 32 - 1) / 2;
    for &pos in &[0usize, lg_n * 32, 2 * lg_n * 32] {
        let mut tampered = bytes.clone();
        tampered[pos] ^= 0x01;
        match InnerProductProof::from_bytes(&tampered) {
            Ok(parsed) => {
                let mut verifier_transcript = Transcript::new(b"verkle");
                assert!(parsed
                    .verify(&mut verifier_transcript, &config, commitment, point, value)
                    .is_err());
            }
            Err(_) => {}
        }
    }
}

#[test]
fn bincode_round_trip() {
    let mut rng = ChaChaRng::seed_from_u64(102);
    let config = IpaConfig::new(16, b"ipa test");
    let poly = random_poly(&mut rng, 16);
    let commitment = config.commit(&poly);
    let point = random_scalar(&mut rng);
    let value = config.evaluate(&poly, &point);

    let mut prover_transcript = Transcript::new(b"verkle");
    let proof =
        InnerProductProof::create(&mut prover_transcript, &config, commitment, poly, point);

    let encoded = bincode::serialize(&proof).unwrap();
    let decoded: InnerProductProof = bincode::deserialize(&encoded).unwrap();

    let mut verifier_transcript = Transcript::new(b"verkle");
    assert!(decoded
        .verify(&mut verifier_transcript, &config, commitment, point, value)
        .is_ok());
}
