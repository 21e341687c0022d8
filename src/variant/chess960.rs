//! Chess960 starting positions by Scharnagl numbering.

use rand::Rng;

/// Number of distinct Chess960 starting positions.
pub const POSITION_COUNT: u32 = 960;

/// Queen, knight and rook order over the six files the bishops leave free,
/// indexed by `idn / 16`. The king always sits between the rooks.
const KRN_TABLE: [&str; 60] = [
    "QNNRKR", "NQNRKR", "NNQRKR", "NNRQKR", "NNRKQR", "NNRKRQ", "QNRNKR", "NQRNKR", "NRQNKR",
    "NRNQKR", "NRNKQR", "NRNKRQ", "QNRKNR", "NQRKNR", "NRQKNR", "NRKQNR", "NRKNQR", "NRKNRQ",
    "QNRKRN", "NQRKRN", "NRQKRN", "NRKQRN", "NRKRQN", "NRKRNQ", "QRNNKR", "RQNNKR", "RNQNKR",
    "RNNQKR", "RNNKQR", "RNNKRQ", "QRNKNR", "RQNKNR", "RNQKNR", "RNKQNR", "RNKNQR", "RNKNRQ",
    "QRNKRN", "RQNKRN", "RNQKRN", "RNKQRN", "RNKRQN", "RNKRNQ", "QRKNNR", "RQKNNR", "RKQNNR",
    "RKNQNR", "RKNNQR", "RKNNRQ", "QRKNRN", "RQKNRN", "RKQNRN", "RKNQRN", "RKNRQN", "RKNRNQ",
    "QRKRNN", "RQKRNN", "RKQRNN", "RKRQNN", "RKRNQN", "RKRNNQ",
];

/// Bishop files (0 = a) indexed by `idn % 16`; one bishop per square color.
const BISHOP_TABLE: [(usize, usize); 16] = [
    (0, 1),
    (0, 3),
    (0, 5),
    (0, 7),
    (1, 2),
    (2, 3),
    (2, 5),
    (2, 7),
    (1, 4),
    (3, 4),
    (4, 5),
    (4, 7),
    (1, 6),
    (3, 6),
    (5, 6),
    (6, 7),
];

/// A generated start position and its identification number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chess960Start {
    pub idn: u32,
    pub fen: String,
}

/// Position `idn`, or a random one when `idn` is absent or out of range.
pub fn generate(idn: Option<u32>) -> Chess960Start {
    generate_with_rng(idn, &mut rand::thread_rng())
}

pub fn generate_with_rng<R: Rng + ?Sized>(idn: Option<u32>, rng: &mut R) -> Chess960Start {
    let idn = match idn {
        Some(n) if n < POSITION_COUNT => n,
        _ => rng.gen_range(0..POSITION_COUNT),
    };
    let white = back_rank(idn);
    let fen = format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{white} w KQkq - 0 1",
        white.to_ascii_lowercase()
    );
    Chess960Start { idn, fen }
}

/// White's back rank for `idn` (taken modulo 960), a-file first.
pub fn back_rank(idn: u32) -> String {
    let idn = (idn % POSITION_COUNT) as usize;
    let (b1, b2) = BISHOP_TABLE[idn % 16];
    let mut rest = KRN_TABLE[idn / 16].chars();
    (0..8)
        .map(|file| {
            if file == b1 || file == b2 {
                'B'
            } else {
                rest.next().unwrap_or('?')
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn orthodox_layout_is_518() {
        assert_eq!(back_rank(518), "RNBQKBNR");
        assert_eq!(
            generate(Some(518)).fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn known_positions() {
        assert_eq!(back_rank(0), "BBQNNRKR");
        assert_eq!(back_rank(959), "RKRNNQBB");
        assert_eq!(back_rank(1), "BQNBNRKR");
    }

    #[test]
    fn every_rank_is_well_formed() {
        for idn in 0..POSITION_COUNT {
            let rank = back_rank(idn);
            let files: Vec<char> = rank.chars().collect();
            assert_eq!(files.len(), 8);
            let bishops: Vec<usize> = (0..8).filter(|&f| files[f] == 'B').collect();
            assert_eq!(bishops.len(), 2, "{rank}");
            assert_ne!(bishops[0] % 2, bishops[1] % 2, "{rank}");
            let king = rank.find('K').unwrap();
            let first_rook = rank.find('R').unwrap();
            let last_rook = rank.rfind('R').unwrap();
            assert!(first_rook < king && king < last_rook, "{rank}");
            assert_eq!(rank.matches('N').count(), 2);
            assert_eq!(rank.matches('Q').count(), 1);
        }
    }

    #[test]
    fn all_ranks_distinct() {
        let mut ranks: Vec<String> = (0..POSITION_COUNT).map(back_rank).collect();
        ranks.sort();
        ranks.dedup();
        assert_eq!(ranks.len(), POSITION_COUNT as usize);
    }

    #[test]
    fn out_of_range_is_random() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = generate_with_rng(Some(5000), &mut rng);
        assert!(start.idn < POSITION_COUNT);
        assert_eq!(start.fen, generate(Some(start.idn)).fen);
    }
}
