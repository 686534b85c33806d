//! Format variants for storing descriptors in map files.
//!
//! Two layouts exist.  They differ in magic, the descriptor field's type tag,
//! the number of maps, and where extended keys go:
//!
//! ```text
//! PSBT:  psbt\xff | global { descriptor, xpub* } | input {} | output {}
//! BOD:   bod\xff  | global { descriptor }        | keys { xpub* }
//! ```

use psbt_map_fmt::psbt::{PSBT_FILE, PSBT_GLOBAL_XPUB};
use psbt_map_fmt::{
    Entry, FileConfig, FileShape, MagicBytes, MapEntry, MapFmtError, MapFmtResult, TypeTag,
};
use tracing::*;

use crate::descriptor::{DescriptorEntry, OutputDescriptor};
use crate::errors::{DescFmtError, DescFmtResult};
use crate::xpub::ExtendedKey;

/// Global map field holding the output descriptor in PSBTs.
pub const PSBT_GLOBAL_OUTPUT_DESCRIPTOR: TypeTag = 0x07;

/// Magic bytes of a descriptor-only file.
pub const BOD_MAGIC: MagicBytes = MagicBytes::new(b"bod\xff");

/// Global map field holding the output descriptor in descriptor-only files.
pub const BOD_GLOBAL_OUTPUT_DESCRIPTOR: TypeTag = 0x00;

/// Key map field holding an extended public key in descriptor-only files.
pub const BOD_KEY_XPUB: TypeTag = 0x01;

/// Descriptors embedded in an otherwise empty PSBT.
pub const PSBT_FORMAT: DescriptorFormat = DescriptorFormat::new(
    PSBT_FILE,
    PSBT_GLOBAL_OUTPUT_DESCRIPTOR,
    PSBT_GLOBAL_XPUB,
    KeyPlacement::Global,
);

/// Descriptor-only files.
pub const BOD_FORMAT: DescriptorFormat = DescriptorFormat::new(
    FileConfig::new(BOD_MAGIC, FileShape::Variable),
    BOD_GLOBAL_OUTPUT_DESCRIPTOR,
    BOD_KEY_XPUB,
    KeyPlacement::KeyMap,
);

/// Index of the global map.
const GLOBAL_MAP: usize = 0;

/// Index of the key map, when keys have their own.
const KEY_MAP: usize = 1;

/// Which map extended key entries are stored in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyPlacement {
    /// Alongside the descriptor in the global map.
    Global,

    /// In a dedicated map following the global map.
    KeyMap,
}

impl KeyPlacement {
    /// Number of maps the layout needs at minimum.
    pub const fn required_maps(&self) -> usize {
        match self {
            KeyPlacement::Global => 1,
            KeyPlacement::KeyMap => 2,
        }
    }

    fn key_map_index(&self) -> usize {
        match self {
            KeyPlacement::Global => GLOBAL_MAP,
            KeyPlacement::KeyMap => KEY_MAP,
        }
    }
}

/// Config for encoding and decoding output descriptors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DescriptorFormat {
    file: FileConfig,
    descriptor_tag: TypeTag,
    xpub_tag: TypeTag,
    key_placement: KeyPlacement,
}

impl DescriptorFormat {
    /// Constructs a new instance.
    pub const fn new(
        file: FileConfig,
        descriptor_tag: TypeTag,
        xpub_tag: TypeTag,
        key_placement: KeyPlacement,
    ) -> Self {
        Self {
            file,
            descriptor_tag,
            xpub_tag,
            key_placement,
        }
    }

    /// Gets the file config.
    pub const fn file(&self) -> FileConfig {
        self.file
    }

    /// Gets the type tag of the descriptor entry.
    pub const fn descriptor_tag(&self) -> TypeTag {
        self.descriptor_tag
    }

    /// Gets the type tag of extended key entries.
    pub const fn xpub_tag(&self) -> TypeTag {
        self.xpub_tag
    }

    /// Gets where extended keys are placed.
    pub const fn key_placement(&self) -> KeyPlacement {
        self.key_placement
    }

    /// Number of maps written when encoding.
    fn map_count(&self) -> MapFmtResult<usize> {
        let required = self.key_placement.required_maps();
        match self.file.shape() {
            FileShape::Fixed(n) if n < required => Err(MapFmtError::MapCountMismatch {
                expected: n,
                found: required,
            }),
            FileShape::Fixed(n) => Ok(n),
            FileShape::Variable => Ok(required),
        }
    }

    /// Lays out a descriptor as maps, padding with empty maps up to the file
    /// shape.
    pub fn to_maps(&self, desc: &OutputDescriptor) -> DescFmtResult<Vec<Vec<Entry>>> {
        let mut maps = vec![Vec::new(); self.map_count()?];

        maps[GLOBAL_MAP].push(desc.to_descriptor_entry(self.descriptor_tag));

        let key_map = &mut maps[self.key_placement.key_map_index()];
        key_map.extend(desc.keys.iter().map(|k| k.to_entry(self.xpub_tag)));

        Ok(maps)
    }

    /// Reads a descriptor back out of decoded maps.
    ///
    /// Entries of unrecognized types are skipped.
    pub fn from_maps<E: MapEntry>(&self, maps: &[Vec<E>]) -> DescFmtResult<OutputDescriptor> {
        // A file cut off at a map boundary looks like it's just missing maps.
        if maps.len() < self.key_placement.required_maps() {
            return Err(MapFmtError::UnexpectedEnd.into());
        }

        let mut desc_entry = None;
        let mut keys = Vec::new();

        for e in &maps[GLOBAL_MAP] {
            match e.ty() {
                ty if ty == self.descriptor_tag => {
                    desc_entry = Some(DescriptorEntry::from_entry(e)?);
                }

                ty if ty == self.xpub_tag && self.key_placement == KeyPlacement::Global => {
                    keys.push(self.decode_key(e, keys.len())?);
                }

                ty => debug!(%ty, map = GLOBAL_MAP, "ignoring unrecognized entry"),
            }
        }

        if self.key_placement == KeyPlacement::KeyMap {
            for e in &maps[KEY_MAP] {
                match e.ty() {
                    ty if ty == self.xpub_tag => keys.push(self.decode_key(e, keys.len())?),
                    ty => debug!(%ty, map = KEY_MAP, "ignoring unrecognized entry"),
                }
            }
        }

        let DescriptorEntry {
            name,
            birth_block,
            descriptor,
        } = desc_entry.ok_or(DescFmtError::MissingDescriptor)?;

        Ok(OutputDescriptor {
            name,
            birth_block,
            descriptor,
            keys,
        })
    }

    fn decode_key(&self, entry: &impl MapEntry, index: usize) -> DescFmtResult<ExtendedKey> {
        ExtendedKey::from_entry(entry, self.xpub_tag)
            .map_err(|source| DescFmtError::InvalidKey { index, source })
    }

    /// Encodes a descriptor as a file.
    pub fn encode(&self, desc: &OutputDescriptor) -> DescFmtResult<Vec<u8>> {
        let maps = self.to_maps(desc)?;
        let slices: Vec<&[Entry]> = maps.iter().map(Vec::as_slice).collect();
        Ok(self.file.encode_file(&slices)?)
    }

    /// Decodes a descriptor from a file, throwing an error if there's leftover
    /// bytes.
    pub fn decode(&self, buf: &[u8]) -> DescFmtResult<OutputDescriptor> {
        let maps = self.file.decode_file_exact(buf)?;
        let desc = self.from_maps(&maps)?;
        trace!(name = %desc.name, keys = desc.keys.len(), "decoded output descriptor");
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use psbt_map_fmt::psbt::{PSBT_GLOBAL_UNSIGNED_TX, PSBT_MAGIC};
    use psbt_map_fmt::{EntryRef, encode_map_to_vec};

    use super::*;
    use crate::xpub::HARDENED_KEY_START;

    fn sample_keys() -> Vec<ExtendedKey> {
        let path = vec![0x48 + HARDENED_KEY_START, HARDENED_KEY_START];
        vec![
            ExtendedKey::new(0xdc567276, path.clone(), vec![0xaa; 78]),
            ExtendedKey::new(0xf245ae38, path, vec![0xbb; 78]),
        ]
    }

    fn sample_desc() -> OutputDescriptor {
        OutputDescriptor::new(
            "Test Wallet",
            840_000,
            "wsh(multi(1,@0/<0;1>/*,@1/<0;1>/*))",
            sample_keys(),
        )
    }

    #[test]
    fn test_psbt_layout() {
        let desc = sample_desc();
        let maps = PSBT_FORMAT.to_maps(&desc).expect("test: to maps");
        assert_eq!(maps.len(), 3);
        assert_eq!(maps[0].len(), 3);
        assert_eq!(maps[0][0].ty(), PSBT_GLOBAL_OUTPUT_DESCRIPTOR);
        assert!(maps[0][1..].iter().all(|e| e.ty() == PSBT_GLOBAL_XPUB));
        assert!(maps[1].is_empty());
        assert!(maps[2].is_empty());

        let buf = PSBT_FORMAT.encode(&desc).expect("test: encode");
        assert!(buf.starts_with(PSBT_MAGIC.as_bytes()));
        assert!(buf.ends_with(&[0, 0, 0]));
    }

    #[test]
    fn test_bod_layout() {
        let desc = sample_desc();
        let maps = BOD_FORMAT.to_maps(&desc).expect("test: to maps");
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].len(), 1);
        assert_eq!(maps[0][0].ty(), BOD_GLOBAL_OUTPUT_DESCRIPTOR);
        assert_eq!(maps[1].len(), 2);
        assert!(maps[1].iter().all(|e| e.ty() == BOD_KEY_XPUB));

        let buf = BOD_FORMAT.encode(&desc).expect("test: encode");
        assert!(buf.starts_with(b"bod\xff"));
    }

    #[test]
    fn test_roundtrip_both_formats() {
        let desc = sample_desc();
        for fmt in [PSBT_FORMAT, BOD_FORMAT] {
            let buf = fmt.encode(&desc).expect("test: encode");
            let back = fmt.decode(&buf).expect("test: decode");
            assert_eq!(back, desc);
        }
    }

    #[test]
    fn test_no_keys() {
        let desc = OutputDescriptor::new("", 0, "tr(@0)", Vec::new());
        for fmt in [PSBT_FORMAT, BOD_FORMAT] {
            let buf = fmt.encode(&desc).expect("test: encode");
            assert_eq!(fmt.decode(&buf).expect("test: decode"), desc);
        }

        // Empty key map is still written.
        let buf = BOD_FORMAT.encode(&desc).expect("test: encode");
        assert_eq!(buf.last(), Some(&0));
        assert_eq!(buf[buf.len() - 2], 0);
    }

    #[test]
    fn test_formats_not_interchangeable() {
        let buf = PSBT_FORMAT.encode(&sample_desc()).expect("test: encode");
        assert!(matches!(
            BOD_FORMAT.decode(&buf),
            Err(DescFmtError::Map(MapFmtError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_unknown_entries_ignored() {
        let desc = sample_desc();
        let mut maps = PSBT_FORMAT.to_maps(&desc).expect("test: to maps");
        maps[0].insert(0, Entry::new(PSBT_GLOBAL_UNSIGNED_TX, Vec::new(), b"tx".to_vec()));
        maps[0].push(Entry::new(0xfc, b"future".to_vec(), b"field".to_vec()));
        maps[1].push(Entry::new(PSBT_GLOBAL_XPUB, Vec::new(), Vec::new()));

        let back = PSBT_FORMAT.from_maps(&maps).expect("test: from maps");
        assert_eq!(back, desc);
    }

    #[test]
    fn test_xpub_in_global_map_ignored_by_bod() {
        let desc = sample_desc();
        let mut maps = BOD_FORMAT.to_maps(&desc).expect("test: to maps");
        maps[0].push(Entry::new(BOD_KEY_XPUB, vec![1], vec![0; 8]));
        maps.push(vec![Entry::new(9, Vec::new(), Vec::new())]);

        let back = BOD_FORMAT.from_maps(&maps).expect("test: from maps");
        assert_eq!(back, desc);
    }

    #[test]
    fn test_last_descriptor_wins() {
        let first = OutputDescriptor::new("first", 1, "pk(@0)", Vec::new());
        let second = OutputDescriptor::new("second", 2, "pkh(@0)", Vec::new());
        let maps = vec![
            vec![
                first.to_descriptor_entry(PSBT_GLOBAL_OUTPUT_DESCRIPTOR),
                second.to_descriptor_entry(PSBT_GLOBAL_OUTPUT_DESCRIPTOR),
            ],
            Vec::new(),
            Vec::new(),
        ];

        assert_eq!(PSBT_FORMAT.from_maps(&maps).expect("test: from maps"), second);
    }

    #[test]
    fn test_descriptor_text_kept_verbatim() {
        let global = vec![Entry::new(
            BOD_GLOBAL_OUTPUT_DESCRIPTOR,
            vec![0x05, b'n'],
            vec![0xff, 0xfe, b'w'],
        )];
        let keys: Vec<Entry> = Vec::new();
        let buf = BOD_FORMAT
            .file()
            .encode_file(&[global.as_slice(), keys.as_slice()])
            .expect("test: encode file");

        let desc = BOD_FORMAT.decode(&buf).expect("test: decode");
        assert_eq!(desc.name, "n");
        assert_eq!(desc.birth_block, 5);
        assert_eq!(desc.descriptor, [0xff, 0xfe, b'w']);
        assert!(desc.keys.is_empty());

        assert_eq!(BOD_FORMAT.encode(&desc).expect("test: encode"), buf);
    }

    #[test]
    fn test_missing_descriptor() {
        let maps: Vec<Vec<Entry>> = vec![Vec::new(), Vec::new(), Vec::new()];
        assert!(matches!(
            PSBT_FORMAT.from_maps(&maps),
            Err(DescFmtError::MissingDescriptor)
        ));
    }

    #[test]
    fn test_missing_key_map() {
        let desc = sample_desc();
        let maps = BOD_FORMAT.to_maps(&desc).expect("test: to maps");

        assert!(matches!(
            BOD_FORMAT.from_maps(&maps[..1]),
            Err(DescFmtError::Map(MapFmtError::UnexpectedEnd))
        ));

        // Same thing through the file codec, cut right after the global map.
        let global_len = BOD_MAGIC.len() + encode_map_to_vec(&maps[0]).len();
        let buf = BOD_FORMAT.encode(&desc).expect("test: encode");
        assert!(matches!(
            BOD_FORMAT.decode(&buf[..global_len]),
            Err(DescFmtError::Map(MapFmtError::UnexpectedEnd))
        ));
    }

    #[test]
    fn test_invalid_key_index() {
        let desc = sample_desc();
        let mut maps = BOD_FORMAT.to_maps(&desc).expect("test: to maps");
        maps[1].push(Entry::new(BOD_KEY_XPUB, vec![0xcc; 78], vec![1, 2, 3]));

        match BOD_FORMAT.from_maps(&maps) {
            Err(DescFmtError::InvalidKey { index, source }) => {
                assert_eq!(index, 2);
                assert_eq!(source, MapFmtError::UnexpectedEnd);
            }
            res => panic!("test: expected invalid key (got {res:?})"),
        }
    }

    #[test]
    fn test_invalid_key_message() {
        let maps = vec![
            vec![
                OutputDescriptor::new("x", 0, "", Vec::new())
                    .to_descriptor_entry(PSBT_GLOBAL_OUTPUT_DESCRIPTOR),
                Entry::new(PSBT_GLOBAL_XPUB, Vec::new(), vec![0; 5]),
            ],
            Vec::new(),
            Vec::new(),
        ];

        let err = PSBT_FORMAT.from_maps(&maps).expect_err("test: should fail");
        assert_eq!(
            err.to_string(),
            "invalid key at index 0: would overrun end of input"
        );
    }

    #[test]
    fn test_trailing_data_rejected() {
        let mut buf = PSBT_FORMAT.encode(&sample_desc()).expect("test: encode");
        buf.push(0xaa);
        assert!(matches!(
            PSBT_FORMAT.decode(&buf),
            Err(DescFmtError::Map(MapFmtError::ExtraInput(1)))
        ));
    }

    #[test]
    fn test_fixed_shape_too_small() {
        let fmt = DescriptorFormat::new(
            FileConfig::new(BOD_MAGIC, FileShape::Fixed(1)),
            BOD_GLOBAL_OUTPUT_DESCRIPTOR,
            BOD_KEY_XPUB,
            KeyPlacement::KeyMap,
        );
        assert!(matches!(
            fmt.encode(&sample_desc()),
            Err(DescFmtError::Map(MapFmtError::MapCountMismatch { .. }))
        ));
    }

    #[test]
    fn test_from_borrowed_maps() {
        let desc = sample_desc();
        let buf = BOD_FORMAT.encode(&desc).expect("test: encode");
        let maps: Vec<Vec<EntryRef<'_>>> = BOD_FORMAT
            .file()
            .decode_file_exact(&buf)
            .expect("test: decode file");
        assert_eq!(BOD_FORMAT.from_maps(&maps).expect("test: from maps"), desc);
    }
}
