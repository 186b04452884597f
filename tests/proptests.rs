use objinv::codec;
use objinv::data_object::{DataObjStr, LineMode};
use proptest::prelude::*;

fn ascii_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{1,24}"
}

const HEADER: &[u8] = b"# Sphinx inventory version 2\n\
# Project: p\n\
# Version: v\n\
# The remainder of this file is compressed using zlib.\n";

proptest! {
    /// Law 1: decompress(compress(x)) == x for any well-formed plaintext.
    #[test]
    fn codec_round_trips(body in prop::collection::vec(any::<u8>(), 0..4096)) {
        let mut plaintext = HEADER.to_vec();
        plaintext.extend_from_slice(&body);

        let compressed = codec::compress(&plaintext).unwrap();
        let restored = codec::decompress(&compressed).unwrap();
        prop_assert_eq!(restored, plaintext);
    }

    /// Law 4: expanding an already-expanded record is a no-op.
    #[test]
    fn expansion_is_idempotent(
        name in ascii_field(),
        domain in ascii_field(),
        role in ascii_field(),
        priority in "[0-9]{1,3}",
        uri in ascii_field(),
        dispname in ascii_field(),
    ) {
        let obj = DataObjStr::new(name, domain, role, priority, uri, dispname).unwrap();
        let once = obj.data_line(LineMode::Expand);

        let reparsed = obj.evolve(Default::default());
        let twice = reparsed.data_line(LineMode::Expand);

        prop_assert_eq!(once, twice);
    }
}
