//! Collection operations over the ordered resume sections.
//!
//! Every operation returns a new `Arc<Vec<_>>` for the touched section and
//! shares all other concerns. Entries are identified by position only. An
//! out-of-range index leaves the document exactly as it was (same references),
//! which callers can detect with `ResumeDocument::ptr_eq`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::{
    decode_aliased, decode_aliased_list, CertificateEntry, EducationEntry, ExperienceEntry,
    LanguageEntry, Label, ProjectEntry, ReferenceEntry, ResumeDocument, Section,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

// ────────────────────────────────────────────────────────────────────────────
// Generic reducers
// ────────────────────────────────────────────────────────────────────────────

pub fn append<T: Clone>(items: &Arc<Vec<T>>, item: T) -> Arc<Vec<T>> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend(items.iter().cloned());
    next.push(item);
    Arc::new(next)
}

pub fn remove_at<T: Clone>(items: &Arc<Vec<T>>, index: usize) -> Arc<Vec<T>> {
    if index >= items.len() {
        return Arc::clone(items);
    }
    Arc::new(
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect(),
    )
}

pub fn replace_at<T: Clone>(items: &Arc<Vec<T>>, index: usize, item: T) -> Arc<Vec<T>> {
    if index >= items.len() {
        return Arc::clone(items);
    }
    let mut next = (**items).clone();
    next[index] = item;
    Arc::new(next)
}

/// Moves the entry at `index` one slot up or down, swapping it with its
/// neighbour. Returns `None` when the move would leave the bounds.
pub fn move_adjacent<T: Clone>(items: &[T], index: usize, direction: Direction) -> Option<Vec<T>> {
    let target = match direction {
        Direction::Up if index > 0 && index < items.len() => index - 1,
        Direction::Down if index < items.len().saturating_sub(1) => index + 1,
        _ => return None,
    };
    let mut next = items.to_vec();
    let item = next.remove(index);
    next.insert(target, item);
    Some(next)
}

// ────────────────────────────────────────────────────────────────────────────
// Typed section payloads and document operations
// ────────────────────────────────────────────────────────────────────────────

macro_rules! sections {
    ($($variant:ident => $field:ident: $entry:ty),* $(,)?) => {
        /// One entry, tagged with the section it belongs to.
        #[derive(Debug, Clone, PartialEq)]
        pub enum SectionItem {
            $($variant($entry)),*
        }

        /// A whole section's entries, in order.
        #[derive(Debug, Clone, PartialEq)]
        pub enum SectionItems {
            $($variant(Vec<$entry>)),*
        }

        impl SectionItem {
            pub fn from_json(section: Section, value: Value) -> Result<Self, serde_json::Error> {
                Ok(match section {
                    $(Section::$variant => SectionItem::$variant(decode_aliased(value)?)),*
                })
            }

            pub fn section(&self) -> Section {
                match self {
                    $(SectionItem::$variant(_) => Section::$variant),*
                }
            }
        }

        impl SectionItems {
            pub fn from_json(section: Section, value: Value) -> Result<Self, serde_json::Error> {
                Ok(match section {
                    $(Section::$variant => SectionItems::$variant(decode_aliased_list(value)?)),*
                })
            }

            pub fn section(&self) -> Section {
                match self {
                    $(SectionItems::$variant(_) => Section::$variant),*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(SectionItems::$variant(items) => items.len()),*
                }
            }
        }

        impl ResumeDocument {
            pub fn section_len(&self, section: Section) -> usize {
                match section {
                    $(Section::$variant => self.$field.len()),*
                }
            }

            /// Appends `item` to the end of its section. Duplicates are allowed.
            pub fn add_item(&self, item: SectionItem) -> ResumeDocument {
                let mut next = self.clone();
                match item {
                    $(SectionItem::$variant(item) => next.$field = append(&self.$field, item)),*
                }
                next
            }

            pub fn remove_item(&self, section: Section, index: usize) -> ResumeDocument {
                let mut next = self.clone();
                match section {
                    $(Section::$variant => next.$field = remove_at(&self.$field, index)),*
                }
                next
            }

            pub fn edit_item(&self, index: usize, item: SectionItem) -> ResumeDocument {
                let mut next = self.clone();
                match item {
                    $(SectionItem::$variant(item) => {
                        next.$field = replace_at(&self.$field, index, item)
                    }),*
                }
                next
            }

            /// Replaces a whole section with a caller-ordered sequence.
            pub fn reorder(&self, items: SectionItems) -> ResumeDocument {
                let mut next = self.clone();
                match items {
                    $(SectionItems::$variant(items) => next.$field = Arc::new(items)),*
                }
                next
            }

            pub fn move_item(
                &self,
                section: Section,
                index: usize,
                direction: Direction,
            ) -> ResumeDocument {
                let mut next = self.clone();
                match section {
                    $(Section::$variant => {
                        if let Some(items) = move_adjacent(self.$field.as_slice(), index, direction) {
                            next.$field = Arc::new(items);
                        }
                    }),*
                }
                next
            }
        }
    };
}

sections! {
    Experience => experience: ExperienceEntry,
    Education => education: EducationEntry,
    Certificates => certificates: CertificateEntry,
    Projects => projects: ProjectEntry,
    Interests => interests: Label,
    References => references: ReferenceEntry,
    Languages => languages: LanguageEntry,
    Skills => skills: Label,
}
