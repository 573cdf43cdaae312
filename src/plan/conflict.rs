use serde::{Deserialize, Serialize};

use super::color::RoomColor;

/// Policy used to pick one color when several rooms compete for a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// The most recently drawn or placed room wins.
    #[default]
    Chronological,
    /// The first color of the priority list present among the competitors wins.
    Priority,
    /// An explicit pair rule wins; otherwise falls back to priority.
    Matrix,
    /// No policy: the owning room's plain color is shown.
    #[serde(other)]
    Unset,
}

/// Where the owning room's override is looked up when resolving a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideScope {
    /// Only the segment being resolved.
    EdgeOnly,
    /// The segment first, then any other segment on the same room side.
    #[default]
    Wall,
}

/// Ordered colors, highest precedence first.
///
/// Kept equal to the set of colors in use by the plan: see [`ColorPriority::sync`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPriority(Vec<RoomColor>);

impl ColorPriority {
    /// Creates a priority list from colors, dropping duplicates.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = RoomColor>) -> Self {
        let mut out = Vec::new();
        for c in colors {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        Self(out)
    }

    /// Colors in precedence order.
    #[must_use]
    pub fn colors(&self) -> &[RoomColor] {
        &self.0
    }

    /// Precedence of `color`, 0 being the highest.
    #[must_use]
    pub fn rank(&self, color: RoomColor) -> Option<usize> {
        self.0.iter().position(|&c| c == color)
    }

    /// Returns the highest-precedence color that appears in `candidates`.
    #[must_use]
    pub fn first_among(&self, candidates: &[RoomColor]) -> Option<RoomColor> {
        self.0.iter().copied().find(|c| candidates.contains(c))
    }

    /// Drops colors no longer in use and appends newly used ones at the end,
    /// in the order they appear in `in_use`.
    ///
    /// Returns `true` if the list changed.
    pub fn sync(&mut self, in_use: impl IntoIterator<Item = RoomColor>) -> bool {
        let in_use = Self::new(in_use).0;
        let before = self.0.clone();
        self.0.retain(|c| in_use.contains(c));
        for c in in_use {
            if !self.0.contains(&c) {
                self.0.push(c);
            }
        }
        before != self.0
    }
}

/// An explicit override: when `underneath` and `on_top` compete, `result` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRule {
    pub underneath: RoomColor,
    pub on_top: RoomColor,
    pub result: RoomColor,
}

impl ConflictRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(underneath: RoomColor, on_top: RoomColor, result: RoomColor) -> Self {
        Self {
            underneath,
            on_top,
            result,
        }
    }
}

/// The list of pair rules consulted in matrix mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictMatrix(Vec<ConflictRule>);

impl ConflictMatrix {
    /// Creates a matrix from rules.
    #[must_use]
    pub fn new(rules: Vec<ConflictRule>) -> Self {
        Self(rules)
    }

    /// All rules in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[ConflictRule] {
        &self.0
    }

    /// Adds a rule, replacing any rule for the same ordered pair.
    pub fn insert(&mut self, rule: ConflictRule) {
        if let Some(existing) = self
            .0
            .iter_mut()
            .find(|r| r.underneath == rule.underneath && r.on_top == rule.on_top)
        {
            *existing = rule;
        } else {
            self.0.push(rule);
        }
    }

    /// Removes the rule for the ordered pair. Returns `true` if one was removed.
    pub fn remove(&mut self, underneath: RoomColor, on_top: RoomColor) -> bool {
        let before = self.0.len();
        self.0
            .retain(|r| !(r.underneath == underneath && r.on_top == on_top));
        before != self.0.len()
    }

    /// Looks up `(a, b)`, then `(b, a)`; the first match's result wins.
    #[must_use]
    pub fn lookup(&self, a: RoomColor, b: RoomColor) -> Option<RoomColor> {
        let find = |under: RoomColor, top: RoomColor| {
            self.0
                .iter()
                .find(|r| r.underneath == under && r.on_top == top)
                .map(|r| r.result)
        };
        find(a, b).or_else(|| find(b, a))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use RoomColor::{Blue, Green, Red, Yellow};

    #[test]
    fn sync_drops_unused_and_appends_new() {
        let mut p = ColorPriority::new([Green, Red, Blue]);
        let changed = p.sync([Blue, Yellow, Red, Yellow]);
        assert!(changed);
        assert_eq!(p.colors(), &[Red, Blue, Yellow]);
    }

    #[test]
    fn sync_is_stable_when_nothing_changes() {
        let mut p = ColorPriority::new([Blue, Red]);
        assert!(!p.sync([Red, Blue]));
        assert_eq!(p.colors(), &[Blue, Red]);
    }

    #[test]
    fn first_among_skips_absent_colors() {
        let p = ColorPriority::new([Green, Red, Blue]);
        assert_eq!(p.first_among(&[Blue, Red]), Some(Red));
        assert_eq!(p.first_among(&[Yellow]), None);
    }

    #[test]
    fn lookup_is_symmetric() {
        let m = ConflictMatrix::new(vec![ConflictRule::new(Red, Blue, Green)]);
        assert_eq!(m.lookup(Red, Blue), Some(Green));
        assert_eq!(m.lookup(Blue, Red), Some(Green));
        assert_eq!(m.lookup(Red, Yellow), None);
    }

    #[test]
    fn lookup_prefers_exact_order() {
        let m = ConflictMatrix::new(vec![
            ConflictRule::new(Blue, Red, Yellow),
            ConflictRule::new(Red, Blue, Green),
        ]);
        assert_eq!(m.lookup(Red, Blue), Some(Green));
        assert_eq!(m.lookup(Blue, Red), Some(Yellow));
    }

    #[test]
    fn insert_replaces_same_pair() {
        let mut m = ConflictMatrix::default();
        m.insert(ConflictRule::new(Red, Blue, Green));
        m.insert(ConflictRule::new(Red, Blue, Yellow));
        assert_eq!(m.rules().len(), 1);
        assert_eq!(m.lookup(Red, Blue), Some(Yellow));
        assert!(m.remove(Red, Blue));
        assert!(!m.remove(Red, Blue));
    }

    #[test]
    fn unknown_mode_deserializes_as_unset() {
        let m: ResolutionMode = serde_json::from_str("\"layered\"").unwrap();
        assert_eq!(m, ResolutionMode::Unset);
        let m: ResolutionMode = serde_json::from_str("\"matrix\"").unwrap();
        assert_eq!(m, ResolutionMode::Matrix);
    }

    #[test]
    fn rule_uses_camel_case() {
        let json = serde_json::to_string(&ConflictRule::new(Red, Blue, Green)).unwrap();
        assert_eq!(json, r#"{"underneath":"red","onTop":"blue","result":"green"}"#);
    }
}
