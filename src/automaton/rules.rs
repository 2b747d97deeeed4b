//! Local 2×2×2 block transition rules for the Margolus step.
//!
//! A block is the eight cells of a 2×2×2 sub-cube in dz, dy, dx order
//! (position `dx + 2*dy + 4*dz`). Each rule maps one block to another.
//! Rules look at whether a cell is active, so non-binary intensities are
//! carried along by the permuting rules but collision outputs are always 0/1.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Eight cell values of a 2×2×2 sub-cube.
pub type Block = [u8; 8];

/// Selects which block transition the engine applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RuleKind {
    /// Billiard-ball model: head-on pairs scatter, everything else swaps neighbours.
    Bbm,
    /// Hardy–de Pazzis–Pomeau lattice gas.
    Hpp,
    /// Density-parity rotation with empty and full blocks held fixed.
    Custom,
    /// Cyclic shift of all eight cells by one position.
    #[default]
    Rotate,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Bbm,
        RuleKind::Hpp,
        RuleKind::Custom,
        RuleKind::Rotate,
    ];

    /// Transform one block under this rule.
    pub fn transform_block(self, block: Block) -> Block {
        match self {
            RuleKind::Bbm => billiard_ball(block),
            RuleKind::Hpp => hpp_gas(block),
            RuleKind::Custom => density_parity(block),
            RuleKind::Rotate => rotate(block),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Bbm => "bbm",
            RuleKind::Hpp => "hpp",
            RuleKind::Custom => "custom",
            RuleKind::Rotate => "rotate",
        }
    }

    /// Numeric code used across the C boundary.
    pub fn code(self) -> u8 {
        match self {
            RuleKind::Rotate => 0,
            RuleKind::Bbm => 1,
            RuleKind::Hpp => 2,
            RuleKind::Custom => 3,
        }
    }

    /// Inverse of [`RuleKind::code`]. Unknown codes select [`RuleKind::Rotate`].
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => RuleKind::Bbm,
            2 => RuleKind::Hpp,
            3 => RuleKind::Custom,
            _ => RuleKind::Rotate,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `rule` to a single block.
#[inline]
pub fn apply_rule(block: Block, rule: RuleKind) -> Block {
    rule.transform_block(block)
}

/// Number of active cells in a block.
#[inline]
fn population(block: &Block) -> u32 {
    block.iter().filter(|&&c| c > 0).count() as u32
}

/// The two head-on configurations: a+c alone scatter to b+d, b+d alone scatter to a+c.
fn head_on_collision(block: &Block) -> Option<Block> {
    match block.map(|c| c > 0) {
        [true, false, true, false, false, false, false, false] => Some([0, 1, 0, 1, 0, 0, 0, 0]),
        [false, true, false, true, false, false, false, false] => Some([1, 0, 1, 0, 0, 0, 0, 0]),
        _ => None,
    }
}

fn billiard_ball(block: Block) -> Block {
    head_on_collision(&block).unwrap_or_else(|| {
        let [a, b, c, d, e, f, g, h] = block;
        [b, a, d, c, f, e, h, g]
    })
}

fn hpp_gas(block: Block) -> Block {
    if population(&block) == 2 {
        head_on_collision(&block).unwrap_or(block)
    } else {
        rotate_quads_clockwise(block)
    }
}

fn density_parity(block: Block) -> Block {
    match population(&block) {
        0 | 8 => block,
        n if n % 2 == 0 => rotate_quads_clockwise(block),
        _ => rotate_quads_counter_clockwise(block),
    }
}

/// 4-cycle of the lower and upper face independently.
fn rotate_quads_clockwise(block: Block) -> Block {
    let [a, b, c, d, e, f, g, h] = block;
    [b, c, d, a, f, g, h, e]
}

fn rotate_quads_counter_clockwise(block: Block) -> Block {
    let [a, b, c, d, e, f, g, h] = block;
    [d, a, b, c, h, e, f, g]
}

fn rotate(mut block: Block) -> Block {
    block.rotate_right(1);
    block
}

/// Binary block whose position `i` holds bit `i` of `bits`.
#[inline]
pub fn block_from_bits(bits: u8) -> Block {
    std::array::from_fn(|i| (bits >> i) & 1)
}

/// Pack the active/inactive pattern of a block into a byte.
#[inline]
pub fn block_to_bits(block: &Block) -> u8 {
    block
        .iter()
        .enumerate()
        .fold(0u8, |acc, (i, &c)| acc | (u8::from(c > 0) << i))
}

/// Search the 256 binary blocks for one that `rule` maps onto `block`.
///
/// Returns the first pre-image in bit order. When none exists the input is
/// returned unchanged, which callers cannot tell apart from a fixed point.
pub fn reverse_rule(block: Block, rule: RuleKind) -> Block {
    (0..=u8::MAX)
        .map(block_from_bits)
        .find(|&candidate| rule.transform_block(candidate) == block)
        .unwrap_or(block)
}

/// Bijectivity report for one rule over all 256 binary blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleAudit {
    pub rule: RuleKind,
    /// Distinct outputs produced from the 256 inputs.
    pub distinct_images: usize,
    /// Inputs recovered exactly by `reverse_rule(apply_rule(b))`.
    pub round_trips: usize,
    pub bijective: bool,
}

/// Exhaustively check whether `rule` permutes the 256 binary blocks.
pub fn audit_rule(rule: RuleKind) -> RuleAudit {
    let mut seen = [false; 256];
    let mut round_trips = 0;

    for bits in 0..=u8::MAX {
        let block = block_from_bits(bits);
        let image = rule.transform_block(block);
        seen[block_to_bits(&image) as usize] = true;
        if reverse_rule(image, rule) == block {
            round_trips += 1;
        }
    }

    let distinct_images = seen.iter().filter(|&&s| s).count();
    RuleAudit {
        rule,
        distinct_images,
        round_trips,
        bijective: distinct_images == 256 && round_trips == 256,
    }
}

/// Audit every rule kind, in [`RuleKind::ALL`] order.
pub fn audit_all_rules() -> Vec<RuleAudit> {
    RuleKind::ALL.iter().map(|&rule| audit_rule(rule)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_shifts_right() {
        let block = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(apply_rule(block, RuleKind::Rotate), [8, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_bbm_head_on_collisions() {
        assert_eq!(
            apply_rule([1, 0, 1, 0, 0, 0, 0, 0], RuleKind::Bbm),
            [0, 1, 0, 1, 0, 0, 0, 0]
        );
        assert_eq!(
            apply_rule([0, 1, 0, 1, 0, 0, 0, 0], RuleKind::Bbm),
            [1, 0, 1, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_bbm_pass_through() {
        let block = [1, 0, 0, 0, 0, 1, 1, 0];
        assert_eq!(apply_rule(block, RuleKind::Bbm), [0, 1, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_hpp_two_particles_without_collision_stay_put() {
        let block = [1, 1, 0, 0, 0, 0, 0, 0];
        assert_eq!(apply_rule(block, RuleKind::Hpp), block);
    }

    #[test]
    fn test_hpp_collision_and_rotation() {
        assert_eq!(
            apply_rule([1, 0, 1, 0, 0, 0, 0, 0], RuleKind::Hpp),
            [0, 1, 0, 1, 0, 0, 0, 0]
        );
        // Three particles: both faces rotate
        assert_eq!(
            apply_rule([1, 0, 0, 0, 1, 1, 0, 0], RuleKind::Hpp),
            [0, 0, 0, 1, 1, 0, 0, 1]
        );
    }

    #[test]
    fn test_custom_fixed_points_and_parity() {
        let empty = [0; 8];
        let full = [1; 8];
        assert_eq!(apply_rule(empty, RuleKind::Custom), empty);
        assert_eq!(apply_rule(full, RuleKind::Custom), full);

        // Even population rotates clockwise
        assert_eq!(
            apply_rule([1, 1, 0, 0, 0, 0, 0, 0], RuleKind::Custom),
            [1, 0, 0, 1, 0, 0, 0, 0]
        );
        // Odd population rotates counter-clockwise
        assert_eq!(
            apply_rule([1, 0, 0, 0, 0, 0, 0, 0], RuleKind::Custom),
            [0, 1, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_rule_codes() {
        for rule in RuleKind::ALL {
            assert_eq!(RuleKind::from_code(rule.code()), rule);
        }
        assert_eq!(RuleKind::from_code(200), RuleKind::Rotate);
        assert_eq!(RuleKind::Hpp.to_string(), "hpp");
        assert_eq!(RuleKind::default(), RuleKind::Rotate);
    }

    #[test]
    fn test_block_bits() {
        assert_eq!(block_from_bits(0b0000_0101), [1, 0, 1, 0, 0, 0, 0, 0]);
        for bits in 0..=u8::MAX {
            assert_eq!(block_to_bits(&block_from_bits(bits)), bits);
        }
    }

    #[test]
    fn test_reverse_rule_without_preimage_returns_input() {
        // Binary candidates can never produce a cell value of 2
        let block = [2, 0, 0, 0, 0, 0, 0, 0];
        for rule in RuleKind::ALL {
            assert_eq!(reverse_rule(block, rule), block);
        }
    }

    #[test]
    fn test_reverse_rule_inverts_every_block() {
        for rule in RuleKind::ALL {
            let failures: Vec<u8> = (0..=u8::MAX)
                .filter(|&bits| {
                    let block = block_from_bits(bits);
                    reverse_rule(apply_rule(block, rule), rule) != block
                })
                .collect();
            assert!(
                failures.is_empty(),
                "{} failed to round-trip {} blocks",
                rule,
                failures.len()
            );
        }
    }

    #[test]
    fn test_bijectivity_table() {
        let table = audit_all_rules();
        for audit in &table {
            eprintln!(
                "{:>7}: images={:3} round_trips={:3} bijective={}",
                audit.rule, audit.distinct_images, audit.round_trips, audit.bijective
            );
        }

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.iter().map(|a| a.rule).collect::<Vec<_>>(),
            RuleKind::ALL.to_vec()
        );
        assert!(table.iter().all(|a| a.bijective));
        assert!(table.iter().all(|a| a.distinct_images == 256));
    }
}
