//! Integration test: the balance-proof contract across crates.
//!
//! The codec, hashing, and recovery layers must agree byte-for-byte with
//! what the ledger verifies at close time.

use streampay_core::balance_message::{balance_message, signing_envelope, SIGNED_MESSAGE_PREFIX};
use streampay_core::types::TokenAmount;
use streampay_crypto::hashing::derive_channel_key;
use streampay_crypto::signing::{recover_signer, sign_balance_proof, Signature};
use streampay_crypto::KeyPair;
use streampay_integration_tests::TwoParty;
use streampay_ledger::ChannelError;

#[tokio::test]
async fn test_proof_roundtrip_recovers_signer() {
    let fx = TwoParty::funded(0).await;

    for balance in [0u64, 1, 300, u64::MAX] {
        let proof = sign_balance_proof(
            fx.receiver.address(),
            10,
            TokenAmount::from(balance),
            &fx.sender,
        );
        let recovered = recover_signer(
            fx.receiver.address(),
            10,
            TokenAmount::from(balance),
            &proof,
        )
        .unwrap();
        assert_eq!(recovered, fx.sender.address());
    }
}

#[tokio::test]
async fn test_message_is_the_documented_contract() {
    let fx = TwoParty::funded(0).await;

    let message = balance_message(fx.receiver.address(), 10, TokenAmount::from(300u64));
    let expected = format!(
        "Receiver: 0x{}, Balance: 300, Channel ID: 10",
        hex::encode(fx.receiver.address())
    );
    assert_eq!(message, expected);

    let envelope = signing_envelope(fx.receiver.address(), 10, TokenAmount::from(300u64));
    let mut manual = SIGNED_MESSAGE_PREFIX.as_bytes().to_vec();
    manual.extend_from_slice(message.len().to_string().as_bytes());
    manual.extend_from_slice(message.as_bytes());
    assert_eq!(envelope, manual);
}

#[tokio::test]
async fn test_derive_matches_across_parties() {
    let fx = TwoParty::funded(0).await;

    // Both sides derive the same key for the same channel, and different
    // keys as soon as any coordinate changes.
    let key = derive_channel_key(fx.sender.address(), fx.receiver.address(), 10);
    assert_eq!(
        key,
        derive_channel_key(fx.sender.address(), fx.receiver.address(), 10)
    );
    assert_ne!(
        key,
        derive_channel_key(fx.sender.address(), fx.receiver.address(), 11)
    );
    assert_ne!(
        key,
        derive_channel_key(fx.receiver.address(), fx.sender.address(), 10)
    );
}

#[tokio::test]
async fn test_ledger_rejects_malformed_signature() {
    let fx = TwoParty::funded(100).await;
    fx.ledger
        .create(
            fx.sender.address(),
            fx.receiver.address(),
            10,
            TokenAmount::from(100u64),
        )
        .unwrap();

    // Corrupt the recovery id so the proof no longer parses.
    let proof = sign_balance_proof(
        fx.receiver.address(),
        10,
        TokenAmount::from(50u64),
        &fx.sender,
    );
    let mut bytes = *proof.as_bytes();
    bytes[64] = 0x7f;
    let corrupted = Signature::from_bytes(&bytes).unwrap();

    let result = fx.ledger.initiate_uncooperative_close(
        fx.sender.address(),
        fx.receiver.address(),
        10,
        TokenAmount::from(50u64),
        &corrupted,
    );
    assert!(matches!(result, Err(ChannelError::MalformedSignature(_))));
}

#[tokio::test]
async fn test_proof_binds_every_coordinate() {
    let fx = TwoParty::funded(0).await;
    let other = KeyPair::from_seed(&[0x77u8; 32]).unwrap();

    let proof = sign_balance_proof(
        fx.receiver.address(),
        10,
        TokenAmount::from(300u64),
        &fx.sender,
    );

    // Changing the balance, the sequence, or the receiver makes the proof
    // recover to something other than the sender (or fail outright).
    for (receiver, sequence, balance) in [
        (fx.receiver.address(), 10u32, TokenAmount::from(301u64)),
        (fx.receiver.address(), 11, TokenAmount::from(300u64)),
        (other.address(), 10, TokenAmount::from(300u64)),
    ] {
        match recover_signer(receiver, sequence, balance, &proof) {
            Ok(recovered) => assert_ne!(recovered, fx.sender.address()),
            Err(_) => {}
        }
    }
}
