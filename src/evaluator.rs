use crate::{Color, Hand, Meld, MeldType, Tile};

/// Minimum meld value a player must exceed before laying tiles down.
pub const INITIAL_MELD_THRESHOLD: u32 = 30;

/// Minimum length of a run started from a tile other than 1
const MIN_RUN_LENGTH: usize = 3;

/// Minimum number of neighbours a 1 must find (in either direction) to score
const MIN_NEIGHBOURS_OF_ONE: usize = 3;

/// Minimum number of distinct colors sharing a number to form a set
const MIN_SET_COLORS: usize = 3;

/// A same-color chain consumed from a working hand by the run detector.
///
/// Every tile the detector looks at ends up in exactly one chain, whether or
/// not that chain is long enough to score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Tiles in run order (for a chain through 1: the wrapped tail, then 1, then the head)
    pub tiles: Vec<Tile>,
    pub scoring: bool,
}

impl Chain {
    pub fn value(&self) -> u32 {
        self.tiles.iter().map(Tile::value).sum()
    }
}

// ============================================================================
// Run Detector
// ============================================================================

/// Drain `working` into chains.
///
/// Greedy: the lowest remaining tile seeds a chain, the chain takes every
/// successor it can find, and consumed tiles are never reconsidered. A 1 probes
/// both forward and backward, where backward from 1 continues at 13.
///
/// `working` must be a disposable copy; it is empty afterwards.
pub fn extract_runs(working: &mut Hand) -> Vec<Chain> {
    let mut chains = Vec::new();

    while let Some(seed) = working.pop_first() {
        let chain = if seed.number() == Tile::MIN_NUMBER {
            probe_both_directions(working, seed)
        } else {
            walk_forward(working, seed)
        };
        chains.push(chain);
    }

    chains
}

/// Sum of all scoring runs in `working`, consuming it.
///
/// A second call on the same working copy returns 0.
pub fn run_value(working: &mut Hand) -> u32 {
    extract_runs(working)
        .iter()
        .filter(|chain| chain.scoring)
        .map(Chain::value)
        .sum()
}

fn walk_forward(working: &mut Hand, seed: Tile) -> Chain {
    let mut tiles = vec![seed];
    take_successors(working, seed, &mut tiles);

    let scoring = tiles.len() >= MIN_RUN_LENGTH;
    Chain { tiles, scoring }
}

fn probe_both_directions(working: &mut Hand, seed: Tile) -> Chain {
    let mut head = Vec::new();
    take_successors(working, seed, &mut head);

    let mut tail = Vec::new();
    let mut cursor = seed.prev();
    while working.remove(&cursor) {
        tail.push(cursor);
        cursor = cursor.prev();
    }

    // The seed itself is not counted here
    let neighbours = head.len() + tail.len();

    let mut tiles: Vec<Tile> = tail.into_iter().rev().collect();
    tiles.push(seed);
    tiles.extend(head);

    Chain {
        tiles,
        scoring: neighbours >= MIN_NEIGHBOURS_OF_ONE,
    }
}

fn take_successors(working: &mut Hand, from: Tile, into: &mut Vec<Tile>) {
    let mut cursor = from.next();
    while let Some(tile) = cursor {
        if !working.remove(&tile) {
            break;
        }
        into.push(tile);
        cursor = tile.next();
    }
}

// ============================================================================
// Set Detector
// ============================================================================

/// Every number held in at least three distinct colors, as a set meld.
/// Duplicates of one color are counted once.
pub fn extract_sets(hand: &Hand) -> Vec<Meld> {
    let mut melds = Vec::new();

    for number in Tile::MIN_NUMBER..=Tile::MAX_NUMBER {
        let tiles: Vec<Tile> = Color::ALL
            .iter()
            .map(|&color| Tile::new(color, number))
            .filter(|tile| hand.contains(tile))
            .collect();

        if tiles.len() >= MIN_SET_COLORS {
            melds.push(Meld::new(MeldType::Set, tiles));
        }
    }

    melds
}

/// Sum of `number * distinct colors` over every set in the hand. Does not
/// modify the hand.
pub fn set_value(hand: &Hand) -> u32 {
    extract_sets(hand).iter().map(Meld::value).sum()
}

// ============================================================================
// Hand Evaluator
// ============================================================================

/// Total value obtainable from runs and sets.
///
/// The set detector is pure, so evaluating sets before or after runs gives
/// the same total; a single pass over one working copy is enough.
pub fn meld_value(hand: &Hand) -> u32 {
    let mut working = hand.clone();
    set_value(hand) + run_value(&mut working)
}

/// True when the hand cannot beat the initial meld threshold and the player
/// must draw.
pub fn has_to_draw(hand: &Hand) -> bool {
    meld_value(hand) <= INITIAL_MELD_THRESHOLD
}

/// Points left in hand, as a penalty
pub fn score(hand: &Hand) -> i32 {
    -hand.tiles().map(|t| t.number() as i32).sum::<i32>()
}

/// The scoring runs and sets of a hand, runs first.
///
/// A tile may appear in both a run and a set, matching how `meld_value`
/// counts it.
pub fn classify(hand: &Hand) -> Vec<Meld> {
    let mut working = hand.clone();
    let mut melds: Vec<Meld> = extract_runs(&mut working)
        .into_iter()
        .filter(|chain| chain.scoring)
        .map(|chain| Meld::new(MeldType::Run, chain.tiles))
        .collect();

    melds.extend(extract_sets(hand));
    melds
}
