//! Property tests for descriptor round trips and decoding untrusted input.

#![expect(missing_docs, reason = "test repo")]
#![expect(unused_crate_dependencies, reason = "lib deps unused in tests")]

use proptest::collection::vec;
use proptest::prelude::*;
use psbt_desc_fmt::{
    BOD_FORMAT, DescFmtError, DescriptorFormat, ExtendedKey, KeyPlacement, OutputDescriptor,
    PSBT_FORMAT,
};
use psbt_map_fmt::{FileConfig, FileShape, MagicBytes, MapFmtError};

fn key_strategy() -> impl Strategy<Value = ExtendedKey> {
    (any::<u32>(), vec(any::<u32>(), 0..8), vec(any::<u8>(), 0..100))
        .prop_map(|(fp, path, key)| ExtendedKey::new(fp, path, key))
}

fn descriptor_strategy() -> impl Strategy<Value = OutputDescriptor> {
    (
        any::<String>(),
        any::<u64>(),
        vec(any::<u8>(), 0..200),
        vec(key_strategy(), 0..5),
    )
        .prop_map(|(name, birth_block, descriptor, keys)| {
            OutputDescriptor::new(name, birth_block, descriptor, keys)
        })
}

fn format_strategy() -> impl Strategy<Value = DescriptorFormat> {
    prop_oneof![
        Just(PSBT_FORMAT),
        Just(BOD_FORMAT),
        // Keys in the global map of a variable length file.
        Just(DescriptorFormat::new(
            FileConfig::new(MagicBytes::new(b"desc\xff"), FileShape::Variable),
            0xfc,
            0xfd,
            KeyPlacement::Global,
        )),
        // Keys in their own map of a fixed length file.
        Just(DescriptorFormat::new(
            FileConfig::new(MagicBytes::new(b"desc\xff"), FileShape::Fixed(4)),
            0x10000,
            0x01,
            KeyPlacement::KeyMap,
        )),
    ]
}

proptest! {
    #[test]
    fn test_descriptor_roundtrip(fmt in format_strategy(), desc in descriptor_strategy()) {
        let buf = fmt.encode(&desc).expect("test: encode");
        let decoded = fmt.decode(&buf).expect("test: decode");
        prop_assert_eq!(decoded, desc);
    }

    #[test]
    fn test_descriptor_deterministic(desc in descriptor_strategy()) {
        let a = BOD_FORMAT.encode(&desc).expect("test: encode");
        let b = BOD_FORMAT.encode(&desc).expect("test: encode");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_descriptor_truncation(fmt in format_strategy(), desc in descriptor_strategy()) {
        let buf = fmt.encode(&desc).expect("test: encode");
        for cut in 0..buf.len() {
            let truncated = matches!(
                fmt.decode(&buf[..cut]),
                Err(DescFmtError::Map(MapFmtError::UnexpectedEnd))
            );
            prop_assert!(truncated, "test: cut at {} of {}", cut, buf.len());
        }
    }

    #[test]
    fn test_arbitrary_bytes_dont_panic(fmt in format_strategy(), body in vec(any::<u8>(), 0..256)) {
        let mut buf = fmt.file().magic().as_bytes().to_vec();
        buf.extend_from_slice(&body);
        let _ = fmt.decode(&buf);
        let _ = fmt.decode(&body);
    }
}
