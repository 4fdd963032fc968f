//! List diffing.
//!
//! [`calculate_diff`] turns an old and a new item sequence into an edit
//! script of [`ListUpdate`]s. Replaying the script in order onto a widget
//! showing the old sequence makes it show the new one.
//!
//! The longest common subsequence of items with the same identity is found
//! with the linear-space variant of Myers' O(ND) algorithm. Items outside it
//! that still appear in both sequences are reported as moves rather than a
//! remove/insert pair.
//!
//! The script is ordered removals (back to front), moves, insertions (front
//! to back), then content changes at their final positions. Consecutive
//! removals, insertions and changes are coalesced into ranges.

use recyclical_core::PerfSpan;
use recyclical_core::logging::targets;

use super::ListUpdate;
use crate::surface::AdapterSurface;

/// The edit script produced by [`calculate_diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    updates: Vec<ListUpdate>,
}

impl DiffResult {
    /// The updates, in dispatch order.
    pub fn updates(&self) -> &[ListUpdate] {
        &self.updates
    }

    /// Consume the result, returning the updates.
    pub fn into_updates(self) -> Vec<ListUpdate> {
        self.updates
    }

    /// Whether the two sequences were equivalent.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Replay every update onto `surface`, in order.
    pub fn dispatch_updates_to(&self, surface: &dyn AdapterSurface) {
        for update in &self.updates {
            update.apply_to(surface);
        }
    }
}

/// Compute the edit script transforming `old` into `new`.
///
/// `same_identity` decides whether an old and a new item are the same
/// logical item. For such pairs, `same_content` decides whether the item
/// needs to be rebound.
pub fn calculate_diff<T>(
    old: &[T],
    new: &[T],
    same_identity: &dyn Fn(&T, &T) -> bool,
    same_content: &dyn Fn(&T, &T) -> bool,
) -> DiffResult {
    let _perf = PerfSpan::new("calculate_diff");

    let common = longest_common_subsequence(old, new, same_identity);

    // Target new index for every old item, `None` when the item is removed.
    let mut target: Vec<Option<usize>> = vec![None; old.len()];
    let mut new_taken = vec![false; new.len()];
    let mut fixed = vec![false; old.len()];
    for &(old_index, new_index) in &common {
        target[old_index] = Some(new_index);
        new_taken[new_index] = true;
        fixed[old_index] = true;
    }

    // Pair leftover items that exist on both sides; they become moves.
    for old_index in 0..old.len() {
        if fixed[old_index] {
            continue;
        }
        let partner = (0..new.len())
            .find(|&new_index| !new_taken[new_index] && same_identity(&old[old_index], &new[new_index]));
        if let Some(new_index) = partner {
            target[old_index] = Some(new_index);
            new_taken[new_index] = true;
        }
    }

    let mut updates = Vec::new();

    // Removals, back to front so lower positions stay valid.
    let removed: Vec<usize> = (0..old.len()).rev().filter(|&i| target[i].is_none()).collect();
    for run in runs_descending(&removed) {
        updates.push(ListUpdate::Removed {
            position: run.0,
            count: run.1,
        });
    }

    // What remains, as (target index, placed) in current order.
    let mut current: Vec<(usize, bool)> = (0..old.len())
        .filter_map(|i| target[i].map(|new_index| (new_index, fixed[i])))
        .collect();

    let mut moving: Vec<usize> = current
        .iter()
        .filter(|(_, placed)| !placed)
        .map(|(new_index, _)| *new_index)
        .collect();
    moving.sort_unstable();

    for new_index in moving {
        let Some(from) = current.iter().position(|&(n, _)| n == new_index) else {
            continue;
        };
        current.remove(from);
        let to = current
            .iter()
            .position(|&(n, placed)| placed && n > new_index)
            .unwrap_or(current.len());
        current.insert(to, (new_index, true));
        if from != to {
            updates.push(ListUpdate::Moved { from, to });
        }
    }

    // Insertions, front to back at their final positions.
    let inserted: Vec<usize> = (0..new.len()).filter(|&j| !new_taken[j]).collect();
    for (position, count) in runs_ascending(&inserted) {
        updates.push(ListUpdate::Inserted { position, count });
    }

    // Content changes at final positions.
    let mut changed: Vec<usize> = (0..old.len())
        .filter_map(|i| target[i].filter(|&j| !same_content(&old[i], &new[j])))
        .collect();
    changed.sort_unstable();
    for (position, count) in runs_ascending(&changed) {
        updates.push(ListUpdate::Changed { position, count });
    }

    tracing::trace!(
        target: targets::DIFF,
        old_len = old.len(),
        new_len = new.len(),
        common = common.len(),
        updates = updates.len(),
        "diff calculated"
    );

    DiffResult { updates }
}

/// Index pairs `(old, new)` of a longest common subsequence, ascending.
///
/// Common prefixes and suffixes are matched directly. What remains is split
/// where the forward and backward searches first meet, and both halves are
/// solved the same way. Memory stays linear in the input length.
fn longest_common_subsequence<T>(
    old: &[T],
    new: &[T],
    same_identity: &dyn Fn(&T, &T) -> bool,
) -> Vec<(usize, usize)> {
    let mut matches = Vec::new();
    let mut pending = vec![(0..old.len(), 0..new.len())];

    while let Some((mut old_range, mut new_range)) = pending.pop() {
        while !old_range.is_empty()
            && !new_range.is_empty()
            && same_identity(&old[old_range.start], &new[new_range.start])
        {
            matches.push((old_range.start, new_range.start));
            old_range.start += 1;
            new_range.start += 1;
        }
        while !old_range.is_empty()
            && !new_range.is_empty()
            && same_identity(&old[old_range.end - 1], &new[new_range.end - 1])
        {
            old_range.end -= 1;
            new_range.end -= 1;
            matches.push((old_range.end, new_range.end));
        }
        if old_range.is_empty() || new_range.is_empty() {
            continue;
        }

        let total = old_range.len() + new_range.len();
        if let Some((x, y)) = split_point(
            &old[old_range.clone()],
            &new[new_range.clone()],
            same_identity,
        ) && x + y > 0
            && x + y < total
        {
            let old_split = old_range.start + x;
            let new_split = new_range.start + y;
            pending.push((old_range.start..old_split, new_range.start..new_split));
            pending.push((old_split..old_range.end, new_split..new_range.end));
        }
    }

    matches.sort_unstable();
    matches
}

/// The point at which Myers' forward and backward searches first overlap,
/// or `None` if the sequences have nothing in common.
///
/// Only the furthest-reaching x per diagonal is kept for each direction.
/// Diagonals whose paths leave the grid are dropped from later rounds.
fn split_point<T>(
    old: &[T],
    new: &[T],
    same_identity: &dyn Fn(&T, &T) -> bool,
) -> Option<(usize, usize)> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d + 1;
    let len = 2 * max_d + 3;
    let at = |k: isize| (offset + k) as usize;

    let mut forward = vec![-1isize; len as usize];
    let mut backward = vec![-1isize; len as usize];
    forward[at(1)] = 0;
    backward[at(1)] = 0;

    let delta = n - m;
    let odd = delta % 2 != 0;
    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0, 0, 0, 0);

    for d in 0..max_d {
        for k1 in (-d + k1_start..=d - k1_end).step_by(2) {
            let mut x1 = if k1 == -d || (k1 != d && forward[at(k1 - 1)] < forward[at(k1 + 1)]) {
                forward[at(k1 + 1)]
            } else {
                forward[at(k1 - 1)] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && same_identity(&old[x1 as usize], &new[y1 as usize]) {
                x1 += 1;
                y1 += 1;
            }
            forward[at(k1)] = x1;

            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if odd {
                let k2 = offset + delta - k1;
                if (0..len).contains(&k2) {
                    let x2 = backward[k2 as usize];
                    let y2 = x2 - (delta - k1);
                    if x2 != -1 && x2 <= n && y2 <= m && x1 >= n - x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
        }

        for k2 in (-d + k2_start..=d - k2_end).step_by(2) {
            let mut x2 = if k2 == -d || (k2 != d && backward[at(k2 - 1)] < backward[at(k2 + 1)]) {
                backward[at(k2 + 1)]
            } else {
                backward[at(k2 - 1)] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n
                && y2 < m
                && same_identity(&old[(n - x2 - 1) as usize], &new[(m - y2 - 1) as usize])
            {
                x2 += 1;
                y2 += 1;
            }
            backward[at(k2)] = x2;

            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !odd {
                let k1 = offset + delta - k2;
                if (0..len).contains(&k1) {
                    let x1 = forward[k1 as usize];
                    let y1 = offset + x1 - k1;
                    if x1 != -1 && x1 <= n && (0..=m).contains(&y1) && x1 >= n - x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
        }
    }

    None
}

/// Group ascending indices into `(start, len)` runs of consecutive values.
fn runs_ascending(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &index in indices {
        match runs.last_mut() {
            Some((start, len)) if *start + *len == index => *len += 1,
            _ => runs.push((index, 1)),
        }
    }
    runs
}

/// Group descending indices into `(start, len)` runs, highest run first.
fn runs_descending(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &index in indices {
        match runs.last_mut() {
            Some((start, len)) if index + 1 == *start => {
                *start = index;
                *len += 1;
            }
            _ => runs.push((index, 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(a: &char, b: &char) -> bool {
        a == b
    }

    fn diff(old: &str, new: &str) -> Vec<ListUpdate> {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        calculate_diff(&old, &new, &eq, &eq).into_updates()
    }

    /// Replays `updates` onto `old` and checks the result matches `new`.
    fn assert_replays(old: &str, new: &str) {
        let old_items: Vec<char> = old.chars().collect();
        let new_items: Vec<char> = new.chars().collect();
        let mut rows = old_items.clone();
        for update in diff(old, new) {
            assert!(!update.is_reset());
            update.replay(&mut rows, |position| new_items[position]);
        }
        assert_eq!(rows, new_items, "{old} -> {new}");
    }

    #[test]
    fn test_identical_is_empty() {
        assert!(diff("abcd", "abcd").is_empty());
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn test_remove_and_insert() {
        assert_eq!(
            diff("abc", "ac"),
            vec![ListUpdate::Removed { position: 1, count: 1 }]
        );
        assert_eq!(
            diff("ac", "abc"),
            vec![ListUpdate::Inserted { position: 1, count: 1 }]
        );
        assert_eq!(
            diff("abcdef", "af"),
            vec![ListUpdate::Removed { position: 1, count: 4 }]
        );
        assert_eq!(
            diff("a", "axyz"),
            vec![ListUpdate::Inserted { position: 1, count: 3 }]
        );
    }

    #[test]
    fn test_separate_runs_removed_back_to_front() {
        assert_eq!(
            diff("abcde", "bd"),
            vec![
                ListUpdate::Removed { position: 4, count: 1 },
                ListUpdate::Removed { position: 2, count: 1 },
                ListUpdate::Removed { position: 0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_move_detected() {
        assert_eq!(diff("abc", "cab"), vec![ListUpdate::Moved { from: 2, to: 0 }]);
        assert_eq!(diff("abcd", "bcda"), vec![ListUpdate::Moved { from: 0, to: 3 }]);
    }

    #[test]
    fn test_content_change() {
        #[derive(Clone, Debug)]
        struct Item {
            id: u32,
            label: &'static str,
        }
        let old = vec![Item { id: 1, label: "a" }, Item { id: 2, label: "b" }];
        let new = vec![Item { id: 1, label: "a" }, Item { id: 2, label: "B" }];

        let result = calculate_diff(
            &old,
            &new,
            &|a: &Item, b: &Item| a.id == b.id,
            &|a: &Item, b: &Item| a.label == b.label,
        );
        assert_eq!(
            result.updates(),
            &[ListUpdate::Changed { position: 1, count: 1 }]
        );
    }

    #[test]
    fn test_changed_positions_are_final() {
        #[derive(Clone, Debug)]
        struct Item(u32, u32);
        let old = vec![Item(1, 0), Item(2, 0), Item(3, 0)];
        let new = vec![Item(0, 0), Item(3, 1), Item(1, 1)];

        let updates = calculate_diff(
            &old,
            &new,
            &|a: &Item, b: &Item| a.0 == b.0,
            &|a: &Item, b: &Item| a.1 == b.1,
        )
        .into_updates();

        let changed: Vec<_> = updates
            .iter()
            .filter(|u| matches!(u, ListUpdate::Changed { .. }))
            .copied()
            .collect();
        assert_eq!(changed, vec![ListUpdate::Changed { position: 1, count: 2 }]);
    }

    #[test]
    fn test_replay_reaches_new_sequence() {
        for (old, new) in [
            ("abc", "cba"),
            ("abcdef", "fedcba"),
            ("abcdef", "badcfe"),
            ("abc", "xyz"),
            ("aabbcc", "abcabc"),
            ("abcdefgh", "hgaxbcy"),
            ("a", ""),
            ("", "abc"),
            ("kitten", "sitting"),
        ] {
            assert_replays(old, new);
        }
    }

    #[test]
    fn test_replay_pseudo_random() {
        let mut seed = 0x2545_f491_u64;
        let mut next = move |bound: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % bound
        };

        for _ in 0..200 {
            let old: String = (0..next(12))
                .map(|_| (b'a' + next(8) as u8) as char)
                .collect();
            let new: String = (0..next(12))
                .map(|_| (b'a' + next(8) as u8) as char)
                .collect();
            assert_replays(&old, &new);
        }
    }

    #[test]
    fn test_dispatch_updates_to() {
        use crate::surface::RecordingSurface;

        let old = vec!['a', 'b'];
        let new = vec!['b'];
        let result = calculate_diff(&old, &new, &eq, &eq);
        let surface = RecordingSurface::new();
        result.dispatch_updates_to(&surface);
        assert_eq!(surface.updates(), result.updates());
    }

    #[test]
    fn test_common_subsequence_is_longest() {
        let old: Vec<char> = "abcabba".chars().collect();
        let new: Vec<char> = "cbabac".chars().collect();
        let common = longest_common_subsequence(&old, &new, &eq);
        assert_eq!(common.len(), 4);
        for pair in common.windows(2) {
            assert!(pair[0].0 < pair[1].0 && pair[0].1 < pair[1].1);
        }
        for &(i, j) in &common {
            assert_eq!(old[i], new[j]);
        }

        let old: Vec<char> = "xabcdy".chars().collect();
        let new: Vec<char> = "zabcdw".chars().collect();
        assert_eq!(
            longest_common_subsequence(&old, &new, &eq),
            vec![(1, 1), (2, 2), (3, 3), (4, 4)]
        );
        assert!(longest_common_subsequence(&['a', 'b'], &['c'], &eq).is_empty());
    }

    #[test]
    fn test_reversed_long_list() {
        let old: Vec<u32> = (0..20_000).collect();
        let new: Vec<u32> = old.iter().rev().copied().collect();
        let same = |a: &u32, b: &u32| a == b;

        let updates = calculate_diff(&old, &new, &same, &same).into_updates();
        assert!(
            updates
                .iter()
                .all(|update| matches!(update, ListUpdate::Moved { .. }))
        );

        let mut rows = old.clone();
        for update in &updates {
            update.replay(&mut rows, |position| new[position]);
        }
        assert_eq!(rows, new);
    }

    #[test]
    fn test_runs() {
        assert_eq!(runs_ascending(&[1, 2, 3, 7, 9, 10]), vec![(1, 3), (7, 1), (9, 2)]);
        assert_eq!(runs_descending(&[9, 8, 5, 4, 3, 0]), vec![(8, 2), (3, 3), (0, 1)]);
    }
}
