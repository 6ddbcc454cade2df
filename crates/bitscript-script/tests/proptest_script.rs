use proptest::prelude::*;

use bitscript_script::chunk::decode_script;
use bitscript_script::interpreter::stack::as_bool;
use bitscript_script::interpreter::ScriptNum;
use bitscript_script::Script;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn script_number_encode_decode_roundtrip(val in -0x7FFFFFFFi64..=0x7FFFFFFF) {
        let bytes = ScriptNum::new(val).to_bytes();
        let decoded = ScriptNum::from_bytes(&bytes, 4, true).unwrap();
        prop_assert_eq!(decoded.to_i64(), val);
    }

    #[test]
    fn minimal_decode_then_encode_is_identity(data in prop::collection::vec(any::<u8>(), 0..4)) {
        // Whenever a strict decode succeeds, re-encoding reproduces the
        // input byte-for-byte.
        if let Ok(n) = ScriptNum::from_bytes(&data, 4, true) {
            prop_assert_eq!(n.to_bytes(), data);
        }
    }

    #[test]
    fn cast_to_bool_characterization(data in prop::collection::vec(any::<u8>(), 0..8)) {
        let all_zero = data.iter().all(|&b| b == 0);
        let negative_zero = !data.is_empty()
            && data[data.len() - 1] == 0x80
            && data[..data.len() - 1].iter().all(|&b| b == 0);
        prop_assert_eq!(as_bool(&data), !(all_zero || negative_zero));
    }

    #[test]
    fn push_only_script_roundtrip(parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..8)) {
        let mut script = Script::new();
        for part in &parts {
            script.append_push_data(part).unwrap();
        }
        let chunks = decode_script(script.to_bytes()).unwrap();
        prop_assert_eq!(chunks.len(), parts.len());
        for (chunk, part) in chunks.iter().zip(parts.iter()) {
            // append_push_data never emits the small-int opcodes, so those
            // payloads are the one case a built push is not shortest.
            let small_int = part.len() == 1 && ((1..=16).contains(&part[0]) || part[0] == 0x81);
            prop_assert!(small_int || chunk.is_shortest_push());
            prop_assert_eq!(chunk.data.as_ref().unwrap(), part);
        }
    }

    #[test]
    fn script_bytes_roundtrip(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let script = Script::from_bytes(&data);
        prop_assert_eq!(script.to_bytes(), &data[..]);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script, script2);
    }
}
