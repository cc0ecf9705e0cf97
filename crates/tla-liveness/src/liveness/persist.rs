//! Binary codec for behavior graph nodes
//!
//! # Record format
//!
//! ```text
//! count:   nat           3 × succ_size()
//! ints:    count × i32   (fp_high, fp_low, tidx) per transition
//! checks:  bit vector    nat word count, then i64 words
//! ```
//!
//! Everything is big-endian (see [`crate::codec`]). The node's own key is not
//! part of the record; the enclosing store indexes records by key.
//!
//! Only committed transitions are written, so slots reserved by
//! [`BehaviorGraphNode::allocate`] never reach disk even if the node was not
//! realigned first.

use std::io::{Read, Write};

use crate::bitvec::BitVector;
use crate::codec;
use crate::error::{PersistError, PersistResult};
use crate::fingerprint::Fingerprint;

use super::checks::PredicateChecks;
use super::graph_node::{BehaviorGraphNode, NodeKey};
use super::transitions::{Transition, TransitionStore};

/// Number of i32 fields per stored transition
const INTS_PER_TRANSITION: usize = 3;

// Cap on records reserved up front, so a corrupt count fails on EOF
// instead of on allocation.
const PREALLOC_RECORDS_LIMIT: usize = 1 << 16;

impl TransitionStore {
    fn write_records<W: Write>(&self, w: &mut W) -> PersistResult<()> {
        let ints = self.len() * INTS_PER_TRANSITION;
        if ints > codec::MAX_NAT {
            return Err(PersistError::TooManyTransitions { ints });
        }
        codec::write_nat(w, ints)?;
        for t in self {
            codec::write_i32(w, t.fp.high())?;
            codec::write_i32(w, t.fp.low())?;
            codec::write_i32(w, t.tidx)?;
        }
        Ok(())
    }

    fn read_records<R: Read>(r: &mut R) -> PersistResult<Self> {
        let ints = codec::read_nat(r)?;
        if ints % INTS_PER_TRANSITION != 0 {
            return Err(PersistError::MisalignedTransitions { ints });
        }
        let count = ints / INTS_PER_TRANSITION;
        let mut records = Vec::with_capacity(count.min(PREALLOC_RECORDS_LIMIT));
        for _ in 0..count {
            let high = codec::read_i32(r)?;
            let low = codec::read_i32(r)?;
            let tidx = codec::read_i32(r)?;
            records.push(Transition::new(Fingerprint::from_halves(high, low), tidx));
        }
        records.shrink_to_fit();
        Ok(TransitionStore::from_records(records))
    }
}

impl BehaviorGraphNode {
    /// Write this node's transitions and predicate checks.
    pub fn write_to<W: Write>(&self, w: &mut W) -> PersistResult<()> {
        self.transitions().write_records(w)?;
        self.predicate_checks().bits().write(w)?;
        Ok(())
    }

    /// Replace this node's transitions and checks with a record from `r`.
    ///
    /// On error the node is left exactly as it was.
    pub fn read_from<R: Read>(&mut self, r: &mut R) -> PersistResult<()> {
        let transitions = TransitionStore::read_records(r)?;
        let checks = PredicateChecks::from_bits(BitVector::read(r)?);
        self.replace_contents(transitions, checks);
        Ok(())
    }

    /// Decode a record into a fresh node with the given key.
    pub fn read_new<R: Read>(key: NodeKey, r: &mut R) -> PersistResult<Self> {
        let mut node = BehaviorGraphNode::with_key(key);
        node.read_from(r)?;
        Ok(node)
    }

    /// Size in bytes of the record [`write_to`](Self::write_to) produces
    pub fn encoded_len(&self) -> usize {
        let ints = self.succ_size() * INTS_PER_TRANSITION;
        codec::nat_len(ints) + ints * 4 + self.predicate_checks().bits().encoded_len()
    }

    /// Encode into a new buffer.
    pub fn to_bytes(&self) -> PersistResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liveness::{CheckLayout, NO_TABLEAU};
    use std::io::{self, Cursor};

    fn fp(v: u64) -> Fingerprint {
        Fingerprint(v)
    }

    fn sample_node() -> BehaviorGraphNode {
        let mut node = BehaviorGraphNode::new(fp(12345), 0);
        node.set_check_state(&[true, false]);
        node.add_transition(fp(999), 1, 2, 1, Some(&[true]));
        node.add_transition(fp(888), 2, 2, 1, Some(&[false]));
        node
    }

    #[test]
    fn test_record_layout() {
        let mut node = BehaviorGraphNode::new(fp(1), 0);
        node.add_transition(fp(0x0000_0002_8000_0001), -1, 0, 0, None);
        node.set_check_state(&[true]);
        let bytes = node.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x03, // nat: 3 ints
                0x00, 0x00, 0x00, 0x02, // fp high
                0x80, 0x00, 0x00, 0x01, // fp low
                0xFF, 0xFF, 0xFF, 0xFF, // tidx -1
                0x00, 0x01, // nat: 1 word
                0, 0, 0, 0, 0, 0, 0, 1, // bit 0
            ]
        );
        assert_eq!(bytes.len(), node.encoded_len());
    }

    #[test]
    fn test_roundtrip_preserves_queries() {
        let node = sample_node();
        let bytes = node.to_bytes().unwrap();
        let back = BehaviorGraphNode::read_new(node.key(), &mut Cursor::new(&bytes)).unwrap();

        assert_eq!(back.key(), node.key());
        assert_eq!(back.succ_size(), 2);
        assert_eq!(back.transitions(), node.transitions());
        assert!(back.get_check_state(0));
        assert!(!back.get_check_state(1));
        let layout = CheckLayout::new(2, 1);
        assert!(back.checks(layout).action(0, 0));
        assert!(!back.checks(layout).action(1, 0));

        // write -> read -> write is byte-identical
        assert_eq!(back.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_pending_slots_never_written() {
        let mut node = BehaviorGraphNode::new(fp(1), 0);
        node.allocate(5);
        node.add_transition(fp(2), 0, 0, 0, None);
        node.add_transition(fp(3), 0, 0, 0, None);

        let unrealigned = node.to_bytes().unwrap();
        node.realign();
        let realigned = node.to_bytes().unwrap();
        assert_eq!(unrealigned, realigned);
        assert_eq!(&realigned[..2], &[0x00, 0x06]);

        let back = BehaviorGraphNode::read_new(node.key(), &mut Cursor::new(realigned)).unwrap();
        assert_eq!(back.succ_size(), 2);
        assert_eq!(back.reserved_slots(), 0);
    }

    #[test]
    fn test_empty_node() {
        let node = BehaviorGraphNode::new(fp(1), NO_TABLEAU);
        let bytes = node.to_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        let back = BehaviorGraphNode::read_new(node.key(), &mut Cursor::new(bytes)).unwrap();
        assert_eq!(back.succ_size(), 0);
    }

    #[test]
    fn test_long_count_prefix() {
        // 11_000 transitions -> 33_000 ints, beyond the short nat range
        let mut node = BehaviorGraphNode::new(fp(1), 0);
        node.allocate(11_000);
        for i in 0..11_000u64 {
            node.add_transition(fp(i << 20), i as i32, 0, 0, None);
        }
        let bytes = node.to_bytes().unwrap();
        assert_eq!(bytes.len(), node.encoded_len());
        let back = BehaviorGraphNode::read_new(node.key(), &mut Cursor::new(bytes)).unwrap();
        assert_eq!(back.succ_size(), 11_000);
        assert_eq!(back.get_state_fp(10_999), fp(10_999 << 20));
        assert_eq!(back.get_tidx(10_999), 10_999);
    }

    #[test]
    fn test_misaligned_count_rejected() {
        let mut node = sample_node();
        let before = node.to_bytes().unwrap();
        let corrupt = vec![0x00, 0x04, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = node.read_from(&mut Cursor::new(corrupt)).unwrap_err();
        assert!(matches!(err, PersistError::MisalignedTransitions { ints: 4 }));
        assert_eq!(node.to_bytes().unwrap(), before);
    }

    #[test]
    fn test_truncated_record_leaves_node_unchanged() {
        let mut node = sample_node();
        let before = node.to_bytes().unwrap();
        let other = {
            let mut n = BehaviorGraphNode::new(fp(5), 0);
            n.add_transition(fp(6), 0, 0, 0, None);
            n.to_bytes().unwrap()
        };
        let truncated = &other[..other.len() - 3];
        let err = node.read_from(&mut Cursor::new(truncated)).unwrap_err();
        match err {
            PersistError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(node.to_bytes().unwrap(), before);
        assert_eq!(node.succ_size(), 2);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_propagates() {
        let node = sample_node();
        let err = node.write_to(&mut FailingWriter).unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("disk full"));
    }
}
