//! The set of snakes that survive a pattern node.

use crate::snake::Snake;

/// Zero, one or many surviving continuations.
///
/// Every interpreter step returns this; `None` means the branch failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Branches {
    #[default]
    None,
    Single(Snake),
    Many(Vec<Snake>),
}

impl Branches {
    /// Collapse a list of snakes into the narrowest variant.
    pub fn from_vec(mut snakes: Vec<Snake>) -> Self {
        match snakes.len() {
            0 => Branches::None,
            1 => snakes.pop().map_or(Branches::None, Branches::Single),
            _ => Branches::Many(snakes),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Branches::None => true,
            Branches::Single(_) => false,
            Branches::Many(snakes) => snakes.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Branches::None => 0,
            Branches::Single(_) => 1,
            Branches::Many(snakes) => snakes.len(),
        }
    }

    pub fn into_vec(self) -> Vec<Snake> {
        match self {
            Branches::None => Vec::new(),
            Branches::Single(snake) => vec![snake],
            Branches::Many(snakes) => snakes,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snake> {
        match self {
            Branches::None => [].iter(),
            Branches::Single(snake) => std::slice::from_ref(snake).iter(),
            Branches::Many(snakes) => snakes.iter(),
        }
    }

    /// Append every snake of `other`.
    pub fn extend(&mut self, other: Branches) {
        if other.is_empty() {
            return;
        }
        let mut snakes = std::mem::take(self).into_vec();
        snakes.extend(other);
        *self = Branches::from_vec(snakes);
    }

    /// Transform every snake, dropping those for which `f` returns `None`.
    pub fn filter_map(self, f: impl FnMut(Snake) -> Option<Snake>) -> Branches {
        Branches::from_vec(self.into_iter().filter_map(f).collect())
    }

    /// Apply `f` to every snake and gather all results. Stops at the first
    /// error.
    pub fn try_flat_map<E>(
        self,
        mut f: impl FnMut(Snake) -> Result<Branches, E>,
    ) -> Result<Branches, E> {
        let mut out = Vec::new();
        for snake in self {
            out.extend(f(snake)?);
        }
        Ok(Branches::from_vec(out))
    }
}

impl IntoIterator for Branches {
    type Item = Snake;
    type IntoIter = std::vec::IntoIter<Snake>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl FromIterator<Snake> for Branches {
    fn from_iter<I: IntoIterator<Item = Snake>>(iter: I) -> Self {
        Branches::from_vec(iter.into_iter().collect())
    }
}

impl From<Snake> for Branches {
    fn from(snake: Snake) -> Self {
        Branches::Single(snake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snakes(n: i32) -> Vec<Snake> {
        (0..n).map(|x| Snake::new(x, 0)).collect()
    }

    #[test]
    fn collapses_to_narrowest_shape() {
        assert_eq!(Branches::from_vec(vec![]), Branches::None);
        assert!(matches!(Branches::from_vec(snakes(1)), Branches::Single(_)));
        assert!(matches!(Branches::from_vec(snakes(3)), Branches::Many(ref v) if v.len() == 3));
    }

    #[test]
    fn extend_grows_shape() {
        let mut branches = Branches::None;
        branches.extend(Branches::Single(Snake::new(0, 0)));
        assert_eq!(branches.len(), 1);
        branches.extend(Branches::from_vec(snakes(2)));
        assert_eq!(branches.len(), 3);
        let xs: Vec<_> = branches.iter().map(|s| s.x).collect();
        assert_eq!(xs, [0, 0, 1]);
    }

    #[test]
    fn filter_map_drops_failures() {
        let kept = Branches::from_vec(snakes(4)).filter_map(|s| (s.x % 2 == 0).then_some(s));
        let xs: Vec<_> = kept.iter().map(|s| s.x).collect();
        assert_eq!(xs, [0, 2]);
    }

    #[test]
    fn try_flat_map_stops_on_error() {
        let result: Result<Branches, &str> = Branches::from_vec(snakes(3)).try_flat_map(|s| {
            if s.x == 1 { Err("boom") } else { Ok(s.into()) }
        });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn try_flat_map_flattens() {
        let result: Result<Branches, ()> =
            Branches::from_vec(snakes(2)).try_flat_map(|s| Ok(Branches::from_vec(vec![s.clone(), s])));
        assert_eq!(result.unwrap().len(), 4);
    }
}
