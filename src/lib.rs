use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod evaluator;
pub mod protocol;
pub mod report;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

/// Tile color. Declaration order is the display order of a sorted hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Orange,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Orange];

    /// Parse the single-letter wire code ("R", "B", "G", "O")
    pub fn from_char(c: char) -> Result<Self, String> {
        match c {
            'R' => Ok(Color::Red),
            'B' => Ok(Color::Blue),
            'G' => Ok(Color::Green),
            'O' => Ok(Color::Orange),
            _ => Err(format!("Invalid color: {}", c)),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Orange => 'O',
        }
    }
}

/// A numbered tile. Two tiles are equal iff color and number match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    color: Color,
    number: u8,
}

impl Tile {
    pub const MIN_NUMBER: u8 = 1;
    pub const MAX_NUMBER: u8 = 13;

    /// Create a new tile from color and number (1-13)
    pub fn new(color: Color, number: u8) -> Self {
        assert!(
            (Self::MIN_NUMBER..=Self::MAX_NUMBER).contains(&number),
            "Number must be 1-13"
        );
        Tile { color, number }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Face value used by every scoring rule
    pub fn value(&self) -> u32 {
        self.number as u32
    }

    /// Parse a tile from its wire form
    /// Format: "R1" (red 1), "B13" (blue 13), "G7" (green 7), "O9" (orange 9)
    pub fn from_string(s: &str) -> Result<Self, String> {
        let mut chars = s.chars();
        let color = match chars.next() {
            Some(c) => Color::from_char(c)?,
            None => return Err("Empty tile string".to_string()),
        };

        let digits = chars.as_str();
        let number: u8 = digits
            .parse()
            .map_err(|_| format!("Invalid number in tile {:?}: {:?}", s, digits))?;

        if !(Self::MIN_NUMBER..=Self::MAX_NUMBER).contains(&number) {
            return Err(format!("Number must be 1-13, got {}", number));
        }

        Ok(Tile::new(color, number))
    }

    /// The tile one higher in the same color, or None past 13
    pub fn next(&self) -> Option<Tile> {
        if self.number < Self::MAX_NUMBER {
            Some(Tile::new(self.color, self.number + 1))
        } else {
            None
        }
    }

    /// The tile one lower in the same color. Backward probing from a 1 wraps
    /// around to 13.
    pub fn prev(&self) -> Tile {
        if self.number == Self::MIN_NUMBER {
            Tile::new(self.color, Self::MAX_NUMBER)
        } else {
            Tile::new(self.color, self.number - 1)
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.as_char(), self.number)
    }
}

impl FromStr for Tile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tile::from_string(s)
    }
}

/// Type of scoring group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldType {
    /// Consecutive numbers, same color
    Run,
    /// Same number, distinct colors
    Set,
}

/// A scoring group found in a hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,
}

impl Meld {
    /// Create a new meld
    pub fn new(meld_type: MeldType, tiles: Vec<Tile>) -> Self {
        Meld { meld_type, tiles }
    }

    /// Sum of face values
    pub fn value(&self) -> u32 {
        self.tiles.iter().map(Tile::value).sum()
    }
}

/// A player's hand of tiles.
///
/// Stored as a multiset keyed by tile, so iteration is always in display order
/// (color, then number) no matter how the hand was mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand(BTreeMap<Tile, u8>);

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand(BTreeMap::new())
    }

    /// Parse a hand from either its display form ("{R1 R2}") or bare
    /// space-delimited tokens ("R1 R2")
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        let body = match trimmed.strip_prefix('{') {
            Some(rest) => rest
                .strip_suffix('}')
                .ok_or_else(|| format!("Unterminated hand: {}", trimmed))?,
            None => trimmed,
        };

        let mut hand = Hand::new();
        for token in body.split_whitespace() {
            hand.add_tile(Tile::from_string(token)?);
        }
        Ok(hand)
    }

    /// Replace the hand contents
    pub fn set_tiles<I: IntoIterator<Item = Tile>>(&mut self, tiles: I) {
        self.0.clear();
        for tile in tiles {
            self.add_tile(tile);
        }
    }

    /// Add a tile to the hand
    pub fn add_tile(&mut self, tile: Tile) {
        *self.0.entry(tile).or_insert(0) += 1;
    }

    /// Remove one copy of a tile from the hand
    pub fn remove(&mut self, tile: &Tile) -> bool {
        if let Some(count) = self.0.get_mut(tile) {
            if *count > 0 {
                *count -= 1;
                if *count == 0 {
                    self.0.remove(tile);
                }
                return true;
            }
        }
        false
    }

    /// Take the first tile in display order
    pub fn pop_first(&mut self) -> Option<Tile> {
        let tile = *self.0.keys().next()?;
        self.remove(&tile);
        Some(tile)
    }

    /// Empty the hand for a new round
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Get the count of a specific tile
    pub fn count(&self, tile: &Tile) -> u8 {
        self.0.get(tile).copied().unwrap_or(0)
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.count(tile) > 0
    }

    /// Get an iterator over all tile types and their counts
    pub fn iter(&self) -> impl Iterator<Item = (&Tile, &u8)> {
        self.0.iter()
    }

    /// Every tile in display order, duplicates repeated
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0
            .iter()
            .flat_map(|(&tile, &count)| std::iter::repeat(tile).take(count as usize))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display form: "{R1 R2 B5}", or "{}" when empty
    pub fn render(&self) -> String {
        format!("{{{}}}", self.to_wire())
    }

    /// Protocol submission form: "R1 R2 B5"
    pub fn to_wire(&self) -> String {
        self.tiles()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Tile> for Hand {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut hand = Hand::new();
        hand.set_tiles(iter);
        hand
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_of(tiles: &[&str]) -> Hand {
        tiles.iter().map(|s| Tile::from_string(s).unwrap()).collect()
    }

    #[test]
    fn test_tile_from_string() {
        assert_eq!(Tile::from_string("R13").unwrap(), Tile::new(Color::Red, 13));
        assert_eq!(Tile::from_string("B1").unwrap(), Tile::new(Color::Blue, 1));
        assert_eq!(Tile::from_string("G7").unwrap(), Tile::new(Color::Green, 7));
        assert_eq!(Tile::from_string("O9").unwrap(), Tile::new(Color::Orange, 9));

        // Test invalid inputs
        assert!(Tile::from_string("X5").is_err());
        assert!(Tile::from_string("r5").is_err());
        assert!(Tile::from_string("R14").is_err());
        assert!(Tile::from_string("R0").is_err());
        assert!(Tile::from_string("Rx").is_err());
        assert!(Tile::from_string("R").is_err());
        assert!(Tile::from_string("").is_err());
    }

    #[test]
    fn test_tile_to_string() {
        assert_eq!(Tile::new(Color::Red, 13).to_string(), "R13");
        assert_eq!(Tile::new(Color::Blue, 1).to_string(), "B1");
        assert_eq!(Tile::new(Color::Orange, 10).to_string(), "O10");
    }

    #[test]
    fn test_tile_roundtrip() {
        for color in Color::ALL {
            for number in 1..=13 {
                let text = format!("{}{}", color.as_char(), number);
                let tile: Tile = text.parse().unwrap();
                assert_eq!(tile.to_string(), text);
            }
        }
    }

    #[test]
    fn test_next_and_prev() {
        let r1 = Tile::from_string("R1").unwrap();
        assert_eq!(r1.next().unwrap().to_string(), "R2");
        assert_eq!(r1.prev().to_string(), "R13");

        let g7 = Tile::from_string("G7").unwrap();
        assert_eq!(g7.prev().to_string(), "G6");
        assert_eq!(g7.next().unwrap().to_string(), "G8");

        assert_eq!(Tile::from_string("B13").unwrap().next(), None);
        assert_eq!(Tile::from_string("B13").unwrap().prev().to_string(), "B12");
    }

    #[test]
    fn test_hand_sorted_by_color_then_number() {
        let mut hand = hand_of(&["O2", "R5", "B1", "R1"]);
        assert_eq!(hand.render(), "{R1 R5 B1 O2}");

        hand.add_tile(Tile::from_string("G3").unwrap());
        assert_eq!(hand.render(), "{R1 R5 B1 G3 O2}");
    }

    #[test]
    fn test_hand_keeps_duplicates() {
        let hand = hand_of(&["R4", "R4", "B4"]);
        assert_eq!(hand.len(), 3);
        assert_eq!(hand.count(&Tile::new(Color::Red, 4)), 2);
        assert_eq!(hand.render(), "{R4 R4 B4}");
    }

    #[test]
    fn test_hand_set_tiles_replaces() {
        let mut hand = hand_of(&["R1", "R2"]);
        hand.set_tiles(vec![Tile::new(Color::Green, 9)]);
        assert_eq!(hand.render(), "{G9}");
    }

    #[test]
    fn test_empty_hand_render_and_reset() {
        assert_eq!(Hand::new().render(), "{}");

        let mut hand = hand_of(&["R1", "B2"]);
        hand.reset();
        assert!(hand.is_empty());
        assert_eq!(hand.render(), "{}");
    }

    #[test]
    fn test_hand_parse_both_forms() {
        let braced = Hand::parse("{R1 B2 O13}").unwrap();
        let bare = Hand::parse("O13 R1 B2").unwrap();
        assert_eq!(braced, bare);
        assert_eq!(Hand::parse(&braced.render()).unwrap(), braced);
        assert_eq!(bare.to_wire(), "R1 B2 O13");

        assert!(Hand::parse("{}").unwrap().is_empty());
        assert!(Hand::parse("{R1 R2").is_err());
        assert!(Hand::parse("R1 Q2").is_err());
    }

    #[test]
    fn test_pop_first_takes_lowest() {
        let mut hand = hand_of(&["B3", "R9", "R9"]);
        assert_eq!(hand.pop_first(), Some(Tile::new(Color::Red, 9)));
        assert_eq!(hand.pop_first(), Some(Tile::new(Color::Red, 9)));
        assert_eq!(hand.pop_first(), Some(Tile::new(Color::Blue, 3)));
        assert_eq!(hand.pop_first(), None);
    }
}
