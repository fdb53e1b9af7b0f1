use std::fmt;
use std::str::FromStr;

use super::error::ThinningError;
use super::neighborhood::Neighborhood;

/// Which of the two complementary sub-iterations of a round is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubIteration {
    /// Peels south-east boundary points and north-west corner points.
    First,
    /// Peels north-west boundary points and south-east corner points.
    Second,
}

impl SubIteration {
    /// Both sub-iterations in the order a round runs them.
    pub const ROUND: [SubIteration; 2] = [SubIteration::First, SubIteration::Second];
}

/// Decides whether a foreground pixel may be deleted in a sub-iteration.
///
/// Implementations must be pure functions of the neighborhood so that a
/// whole pass can be classified against one frozen raster.
pub trait RemovalRule: Send + Sync {
    /// Whether the pixel with neighborhood `n` is a removal candidate.
    fn is_removable(&self, n: &Neighborhood, step: SubIteration) -> bool;
}

/// Zhang-Suen parallel thinning, CACM 27(3), 1984.
///
/// As published, the rule deletes a 2x2 block entirely: every pixel of the
/// block satisfies both sub-iterations against the same snapshot, so the
/// component disappears. [`GuoHall`] keeps one pixel of such a block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZhangSuen;

impl RemovalRule for ZhangSuen {
    fn is_removable(&self, n: &Neighborhood, step: SubIteration) -> bool {
        let b = n.neighbor_count();
        if !(2..=6).contains(&b) || n.transitions() != 1 {
            return false;
        }

        let [p2, _, p4, _, p6, _, p8, _] = n.ring();
        match step {
            SubIteration::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
            SubIteration::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
        }
    }
}

/// Guo-Hall parallel thinning, CACM 32(3), 1989 (algorithm A1).
///
/// Symmetric blobs do not always collapse to a single pixel. A filled disk
/// of radius 10 to 16 thins to a horizontal segment of 3 pixels centred on
/// the disk, where [`ZhangSuen`] keeps only the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuoHall;

impl GuoHall {
    /// Connectivity number `C(P1)`: count of side neighbors that are
    /// background and followed by foreground on the next side or corner.
    pub fn connectivity(n: &Neighborhood) -> u8 {
        let [p2, p3, p4, p5, p6, p7, p8, p9] = n.ring();
        [
            !p2 && (p3 || p4),
            !p4 && (p5 || p6),
            !p6 && (p7 || p8),
            !p8 && (p9 || p2),
        ]
        .iter()
        .filter(|&&c| c)
        .count() as u8
    }

    /// `min(N1, N2)`, the number of occupied neighbor pairs for the two
    /// pairings of the ring.
    pub fn pair_count(n: &Neighborhood) -> u8 {
        let [p2, p3, p4, p5, p6, p7, p8, p9] = n.ring();
        let n1 = [p9 || p2, p3 || p4, p5 || p6, p7 || p8];
        let n2 = [p2 || p3, p4 || p5, p6 || p7, p8 || p9];
        let count = |pairs: [bool; 4]| pairs.iter().filter(|&&p| p).count() as u8;
        count(n1).min(count(n2))
    }
}

impl RemovalRule for GuoHall {
    fn is_removable(&self, n: &Neighborhood, step: SubIteration) -> bool {
        if Self::connectivity(n) != 1 || !(2..=3).contains(&Self::pair_count(n)) {
            return false;
        }

        let [p2, p3, p4, p5, p6, p7, p8, p9] = n.ring();
        let m = match step {
            SubIteration::First => (p6 || p7 || !p9) && p8,
            SubIteration::Second => (p2 || p3 || !p5) && p4,
        };
        !m
    }
}

/// Runtime selection of the removal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThinningVariant {
    /// [`ZhangSuen`] rule set.
    #[default]
    ZhangSuen,
    /// [`GuoHall`] rule set.
    GuoHall,
}

impl ThinningVariant {
    /// The rule implementing this variant.
    pub fn rule(&self) -> &'static dyn RemovalRule {
        match self {
            ThinningVariant::ZhangSuen => &ZhangSuen,
            ThinningVariant::GuoHall => &GuoHall,
        }
    }
}

impl fmt::Display for ThinningVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThinningVariant::ZhangSuen => write!(f, "zhang-suen"),
            ThinningVariant::GuoHall => write!(f, "guo-hall"),
        }
    }
}

impl FromStr for ThinningVariant {
    type Err = ThinningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zhang-suen" | "zhangsuen" | "zs" => Ok(ThinningVariant::ZhangSuen),
            "guo-hall" | "guohall" | "gh" => Ok(ThinningVariant::GuoHall),
            _ => Err(ThinningError::UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thinning::Direction;

    fn window(rows: [&str; 3]) -> Neighborhood {
        let mut ring = [false; 8];
        for d in Direction::CLOCKWISE {
            let (dx, dy) = d.offset();
            ring[d as usize] = rows[(dy + 1) as usize].as_bytes()[(dx + 1) as usize] == b'#';
        }
        Neighborhood::from_ring(ring)
    }

    #[test]
    fn test_zhang_suen_interior_kept() {
        let n = window(["###", "###", "###"]);
        for step in SubIteration::ROUND {
            assert!(!ZhangSuen.is_removable(&n, step));
        }
    }

    #[test]
    fn test_zhang_suen_endpoint_kept() {
        // B = 1
        let n = window(["...", "##.", "..."]);
        for step in SubIteration::ROUND {
            assert!(!ZhangSuen.is_removable(&n, step));
        }
    }

    #[test]
    fn test_zhang_suen_bridge_kept() {
        // A = 2, removing it would split the line
        let n = window(["...", "###", "..."]);
        for step in SubIteration::ROUND {
            assert!(!ZhangSuen.is_removable(&n, step));
        }
    }

    #[test]
    fn test_zhang_suen_south_east_corner() {
        // bottom-right corner of a blob: E and S are background
        let n = window(["##.", "##.", "..."]);
        assert!(ZhangSuen.is_removable(&n, SubIteration::First));
        assert!(ZhangSuen.is_removable(&n, SubIteration::Second));
    }

    #[test]
    fn test_zhang_suen_boundary_subsets() {
        // top edge of a blob: only N is background
        let n = window(["...", "###", "###"]);
        // first step needs N*E*S == 0 and E*S*W == 0; E*S*W are all set
        assert!(!ZhangSuen.is_removable(&n, SubIteration::First));
        // second step needs N*E*W == 0 and N*S*W == 0; N is background
        assert!(ZhangSuen.is_removable(&n, SubIteration::Second));

        // bottom edge of a blob mirrors it
        let n = window(["###", "###", "..."]);
        assert!(ZhangSuen.is_removable(&n, SubIteration::First));
        assert!(!ZhangSuen.is_removable(&n, SubIteration::Second));
    }

    #[test]
    fn test_guo_hall_measures() {
        let n = window(["...", "###", "###"]);
        assert_eq!(GuoHall::connectivity(&n), 1);
        assert_eq!(GuoHall::pair_count(&n), 3);

        let n = window(["...", "###", "..."]);
        assert_eq!(GuoHall::connectivity(&n), 2);
    }

    #[test]
    fn test_guo_hall_edges() {
        // top edge: m for the first step is (S | SW | !NW) & W = 1
        let n = window(["...", "###", "###"]);
        assert!(!GuoHall.is_removable(&n, SubIteration::First));
        // m for the second step is (N | NE | !SE) & E = 0
        assert!(GuoHall.is_removable(&n, SubIteration::Second));

        // bottom edge: first step m = (S | SW | !NW) & W = 0
        let n = window(["###", "###", "..."]);
        assert!(GuoHall.is_removable(&n, SubIteration::First));
    }

    #[test]
    fn test_guo_hall_endpoint_kept() {
        // N = min(N1, N2) = 1
        let n = window(["...", "##.", "..."]);
        for step in SubIteration::ROUND {
            assert!(!GuoHall.is_removable(&n, step));
        }
    }

    #[test]
    fn test_variant_parse_and_display() -> Result<(), ThinningError> {
        assert_eq!("zs".parse::<ThinningVariant>()?, ThinningVariant::ZhangSuen);
        assert_eq!("Guo-Hall".parse::<ThinningVariant>()?, ThinningVariant::GuoHall);
        assert_eq!(ThinningVariant::GuoHall.to_string(), "guo-hall");
        assert_eq!(
            "medial".parse::<ThinningVariant>(),
            Err(ThinningError::UnknownVariant("medial".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_variant_rule_dispatch() {
        // a pixel Zhang-Suen removes on the second step but Guo-Hall keeps on the first
        let n = window(["...", "###", "###"]);
        assert!(ThinningVariant::ZhangSuen
            .rule()
            .is_removable(&n, SubIteration::Second));
        assert!(!ThinningVariant::GuoHall
            .rule()
            .is_removable(&n, SubIteration::First));
    }
}
