// Text extraction

use crate::context::TestContext;
use crate::error::Result;
use crate::group::{ElementGroup, GroupMember, GroupTexts, MemberText};
use crate::locator::CompositeLocator;
use futures_util::future::try_join_all;
use std::collections::BTreeMap;

impl TestContext {
    /// Asserts `element` is visible, then returns its trimmed text content
    /// (empty when the node has no text).
    pub async fn get_text(&self, element: &CompositeLocator) -> Result<String> {
        self.step(format!("Get text of {}", element.name()), async {
            self.hard().assert_visible(element).await?;
            self.read_text(element).await
        })
        .await
    }

    /// Trimmed text content without the visibility assertion.
    pub async fn get_element_text(&self, element: &CompositeLocator) -> Result<String> {
        self.read_text(element).await
    }

    /// Texts of every member of `group`, in the group's shape. Hidden or
    /// blank members are read as they are.
    pub async fn get_group_texts(&self, group: &ElementGroup) -> Result<GroupTexts> {
        match group {
            ElementGroup::Ordered(locators) => {
                let texts = try_join_all(locators.iter().map(|l| self.read_text(l))).await?;
                Ok(GroupTexts::Ordered(texts))
            }
            ElementGroup::Named(members) => {
                let reads = members.iter().map(|(key, member)| async move {
                    let text = match member {
                        GroupMember::Single(l) => MemberText::Single(self.read_text(l).await?),
                        GroupMember::Labeled { label, value } => MemberText::Labeled {
                            label: self.read_text(label).await?,
                            value: self.read_text(value).await?,
                        },
                    };
                    Ok::<_, crate::error::Error>((key.clone(), text))
                });
                let texts = try_join_all(reads).await?;
                Ok(GroupTexts::Named(texts.into_iter().collect()))
            }
        }
    }

    /// [`TestContext::get_group_texts`] for every group of a map.
    pub async fn get_all_group_texts(
        &self,
        groups: &BTreeMap<String, ElementGroup>,
    ) -> Result<BTreeMap<String, GroupTexts>> {
        let mut texts = BTreeMap::new();
        for (key, group) in groups {
            texts.insert(key.clone(), self.get_group_texts(group).await?);
        }
        Ok(texts)
    }

    async fn read_text(&self, element: &CompositeLocator) -> Result<String> {
        let text = element.resolve().await?.text_content().await?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }
}
