//! The mutable option bag produced by the parser and consumed by every
//! planner stage.
//!
//! Every query that a planner uses to *commit* to an option's presence
//! (`get_last`, `get_last_argument`, `has_argument`, `has_flag`,
//! `get_last_in_group`) marks the underlying entry consumed. The final
//! unused-option sweep (§4.10) reports every entry nobody ever consumed.

use crate::option_table::{find_by_id, OptionGroup, OptionId};
use std::cell::RefCell;

/// An option's argument payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Argument {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Argument::Single(s) => Some(s),
            _ => None,
        }
    }
}

/// A snapshot of one parsed option, detached from the bag's internal
/// consumption bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub id: OptionId,
    pub argument: Argument,
    pub index: usize,
}

#[derive(Debug)]
struct Entry {
    option: ParsedOption,
    consumed: bool,
}

/// An ordered multiset of parsed options, queryable by id or by group, with
/// per-entry consumption tracking.
#[derive(Debug)]
pub struct ParsedOptions {
    entries: RefCell<Vec<Entry>>,
}

impl ParsedOptions {
    pub fn new(options: Vec<ParsedOption>) -> Self {
        Self {
            entries: RefCell::new(
                options
                    .into_iter()
                    .map(|option| Entry { option, consumed: false })
                    .collect(),
            ),
        }
    }

    /// The last (highest-index) occurrence of `id`, marking it consumed.
    pub fn get_last(&self, id: OptionId) -> Option<ParsedOption> {
        let mut entries = self.entries.borrow_mut();
        let found = entries
            .iter_mut()
            .filter(|e| e.option.id == id)
            .max_by_key(|e| e.option.index)?;
        found.consumed = true;
        Some(found.option.clone())
    }

    /// The last occurrence's single-string argument, marking it consumed.
    pub fn get_last_argument(&self, id: OptionId) -> Option<String> {
        self.get_last(id)
            .and_then(|o| o.argument.as_single().map(str::to_owned))
    }

    /// Whether `id` is present at all, marking every occurrence consumed.
    pub fn has_argument(&self, id: OptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let mut found = false;
        for e in entries.iter_mut().filter(|e| e.option.id == id) {
            e.consumed = true;
            found = true;
        }
        found
    }

    /// Every occurrence of `id`, in original order, marking them consumed.
    pub fn all_with_id(&self, id: OptionId) -> Vec<ParsedOption> {
        let mut entries = self.entries.borrow_mut();
        let mut out = Vec::new();
        for e in entries.iter_mut().filter(|e| e.option.id == id) {
            e.consumed = true;
            out.push(e.option.clone());
        }
        out.sort_by_key(|o| o.index);
        out
    }

    /// Classic `hasFlag`: whichever of `positive`/`negative` appeared last
    /// wins; absent either, `default` wins. Both ids' occurrences are
    /// consumed regardless of which wins.
    pub fn has_flag(&self, positive: OptionId, negative: OptionId, default: bool) -> bool {
        let pos = self.get_last(positive).map(|o| o.index);
        let neg = self.get_last(negative).map(|o| o.index);
        match (pos, neg) {
            (Some(p), Some(n)) => p > n,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => default,
        }
    }

    /// The id of the last-occurring option among a mutually-exclusive
    /// group (e.g. the `-g`/`-gline-tables-only`/.../`-gnone` family),
    /// consuming every member seen.
    pub fn get_last_in_group(&self, group: OptionGroup) -> Option<OptionId> {
        let mut entries = self.entries.borrow_mut();
        let mut winner: Option<(usize, OptionId)> = None;
        for e in entries.iter_mut() {
            if find_by_id(e.option.id).group == Some(group) {
                e.consumed = true;
                let is_new_winner = match winner {
                    Some((idx, _)) => e.option.index > idx,
                    None => true,
                };
                if is_new_winner {
                    winner = Some((e.option.index, e.option.id));
                }
            }
        }
        winner.map(|(_, id)| id)
    }

    /// Remove every occurrence of `id` from the bag entirely (e.g. when a
    /// higher-priority mode flag overrides and erases a lower one).
    pub fn erase(&self, id: OptionId) {
        self.entries.borrow_mut().retain(|e| e.option.id != id);
    }

    pub fn erase_group(&self, group: OptionGroup) {
        self.entries
            .borrow_mut()
            .retain(|e| find_by_id(e.option.id).group != Some(group));
    }

    /// Every option nobody ever consumed, in original order — the input to
    /// `-driver-warn-unused-options`.
    pub fn unconsumed(&self) -> Vec<ParsedOption> {
        let entries = self.entries.borrow();
        let mut out: Vec<_> = entries
            .iter()
            .filter(|e| !e.consumed)
            .map(|e| e.option.clone())
            .collect();
        out.sort_by_key(|o| o.index);
        out
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
