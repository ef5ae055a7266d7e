// Element groups
//
// A group is either position-addressed or name-addressed. Group operations
// flatten either shape through `entries()` and rebuild the same shape for
// their results.

use crate::locator::CompositeLocator;
use std::collections::BTreeMap;

/// One member of a named group: a single element, or a label/value pair
/// such as a balance caption and the amount next to it.
#[derive(Debug, Clone)]
pub enum GroupMember {
    Single(CompositeLocator),
    Labeled {
        label: CompositeLocator,
        value: CompositeLocator,
    },
}

impl From<CompositeLocator> for GroupMember {
    fn from(locator: CompositeLocator) -> Self {
        GroupMember::Single(locator)
    }
}

/// A collection of elements that share one validation.
///
/// # Example
///
/// ```ignore
/// let icons = ElementGroup::ordered(vec![menu.home(), menu.casino(), menu.live()]);
///
/// let balances = ElementGroup::named([
///     ("cash", GroupMember::Labeled { label: cash_label, value: cash_amount }),
///     ("bonus", bonus_amount.into()),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub enum ElementGroup {
    Ordered(Vec<CompositeLocator>),
    Named(BTreeMap<String, GroupMember>),
}

impl ElementGroup {
    pub fn ordered(locators: Vec<CompositeLocator>) -> Self {
        ElementGroup::Ordered(locators)
    }

    pub fn named<K, M>(members: impl IntoIterator<Item = (K, M)>) -> Self
    where
        K: Into<String>,
        M: Into<GroupMember>,
    {
        ElementGroup::Named(
            members
                .into_iter()
                .map(|(k, m)| (k.into(), m.into()))
                .collect(),
        )
    }

    /// Every locator in the group, in order, with labeled members flattened
    /// into their label then their value.
    pub fn entries(&self) -> Vec<(String, &CompositeLocator)> {
        match self {
            ElementGroup::Ordered(locators) => locators
                .iter()
                .enumerate()
                .map(|(i, l)| (i.to_string(), l))
                .collect(),
            ElementGroup::Named(members) => members
                .iter()
                .flat_map(|(key, member)| match member {
                    GroupMember::Single(l) => vec![(key.clone(), l)],
                    GroupMember::Labeled { label, value } => vec![
                        (format!("{key}.label"), label),
                        (format!("{key}.value"), value),
                    ],
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ElementGroup::Ordered(locators) => locators.len(),
            ElementGroup::Named(members) => members.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<CompositeLocator>> for ElementGroup {
    fn from(locators: Vec<CompositeLocator>) -> Self {
        ElementGroup::Ordered(locators)
    }
}

/// Text of a named group member, same shape as [`GroupMember`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberText {
    Single(String),
    Labeled { label: String, value: String },
}

/// Texts read from an [`ElementGroup`], in the group's own shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTexts {
    Ordered(Vec<String>),
    Named(BTreeMap<String, MemberText>),
}

impl GroupTexts {
    /// All texts in entry order, labeled members as label then value
    pub fn flatten(&self) -> Vec<&str> {
        match self {
            GroupTexts::Ordered(texts) => texts.iter().map(String::as_str).collect(),
            GroupTexts::Named(members) => members
                .values()
                .flat_map(|m| match m {
                    MemberText::Single(t) => vec![t.as_str()],
                    MemberText::Labeled { label, value } => vec![label.as_str(), value.as_str()],
                })
                .collect(),
        }
    }

    /// Text of a named single member, or the value of a labeled one
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            GroupTexts::Ordered(texts) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| texts.get(i))
                .map(String::as_str),
            GroupTexts::Named(members) => members.get(key).map(|m| match m {
                MemberText::Single(t) => t.as_str(),
                MemberText::Labeled { value, .. } => value.as_str(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeElement;
    use std::sync::Arc;

    fn loc(name: &str) -> CompositeLocator {
        CompositeLocator::from_element(name, Arc::new(FakeElement::new(name)))
    }

    #[test]
    fn test_ordered_entries_are_indexed() {
        let group = ElementGroup::from(vec![loc("a"), loc("b")]);
        let keys: Vec<_> = group.entries().into_iter().map(|(k, l)| (k, l.name().to_string())).collect();
        assert_eq!(
            keys,
            vec![("0".to_string(), "a".to_string()), ("1".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn test_named_entries_flatten_labeled_pairs() {
        let group = ElementGroup::named([
            (
                "cash",
                GroupMember::Labeled {
                    label: loc("cash label"),
                    value: loc("cash amount"),
                },
            ),
            ("bonus", GroupMember::Single(loc("bonus amount"))),
        ]);
        assert_eq!(group.len(), 2);
        let names: Vec<_> = group
            .entries()
            .into_iter()
            .map(|(k, l)| format!("{k}={}", l.name()))
            .collect();
        assert_eq!(
            names,
            vec!["bonus=bonus amount", "cash.label=cash label", "cash.value=cash amount"]
        );
    }

    #[test]
    fn test_empty_group() {
        assert!(ElementGroup::ordered(Vec::new()).is_empty());
        assert!(ElementGroup::named(Vec::<(String, GroupMember)>::new()).entries().is_empty());
    }

    #[test]
    fn test_group_texts_lookup() {
        let texts = GroupTexts::Named(BTreeMap::from([
            (
                "cash".to_string(),
                MemberText::Labeled {
                    label: "Cash".into(),
                    value: "€10.00".into(),
                },
            ),
            ("bonus".to_string(), MemberText::Single("€0.00".into())),
        ]));
        assert_eq!(texts.get("cash"), Some("€10.00"));
        assert_eq!(texts.flatten(), vec!["€0.00", "Cash", "€10.00"]);
        assert_eq!(GroupTexts::Ordered(vec!["x".into()]).get("0"), Some("x"));
    }
}
