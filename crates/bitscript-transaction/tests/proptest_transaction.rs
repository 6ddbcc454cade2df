use proptest::prelude::*;

use bitscript_script::Script;
use bitscript_transaction::sighash::{signature_hash, SIGHASH_ALL};
use bitscript_transaction::{Transaction, TxInput, TxOutput};

prop_compose! {
    fn arb_input()(
        txid in prop::array::uniform32(any::<u8>()),
        prev_index in any::<u32>(),
        script in prop::collection::vec(any::<u8>(), 0..64),
        sequence in any::<u32>(),
    ) -> TxInput {
        TxInput {
            prev_txid: txid,
            prev_index,
            script: Script::from_bytes(&script),
            sequence,
        }
    }
}

prop_compose! {
    fn arb_output()(
        satoshis in any::<u64>(),
        script in prop::collection::vec(any::<u8>(), 0..64),
    ) -> TxOutput {
        TxOutput {
            satoshis,
            script: Script::from_bytes(&script),
        }
    }
}

prop_compose! {
    fn arb_tx()(
        version in 1u32..=2,
        inputs in prop::collection::vec(arb_input(), 1..4),
        outputs in prop::collection::vec(arb_output(), 0..4),
        lock_time in any::<u32>(),
    ) -> Transaction {
        Transaction { version, inputs, outputs, lock_time }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn transaction_serialization_roundtrip(tx in arb_tx()) {
        let parsed = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        prop_assert_eq!(&parsed, &tx);
        prop_assert_eq!(parsed.tx_id(), tx.tx_id());
    }

    #[test]
    fn sighash_survives_reserialization(tx in arb_tx(), script in prop::collection::vec(any::<u8>(), 0..32)) {
        // The digest must not depend on the defensive clone the verifier
        // performs before evaluation.
        let sub_script = Script::from_bytes(&script);
        let direct = signature_hash(&tx, 0, &sub_script, SIGHASH_ALL, 1000).unwrap();
        let cloned = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        let after = signature_hash(&cloned, 0, &sub_script, SIGHASH_ALL, 1000).unwrap();
        prop_assert_eq!(direct, after);
    }
}
