//! Transforms applied to the merged collection before it is compiled.
//!
//! Every processor receives three collections:
//! - `draft`: the result of the previous processor (initially extracted merged with existing)
//! - `extracted`: keys found in the sources during this run
//! - `existing`: what the output file contained before this run

use anyhow::{Result, bail};

use super::collection::TranslationCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessor {
    /// Drop keys that were not extracted in this run.
    PurgeObsoleteKeys,
    /// Use the key itself as the value of untranslated keys.
    KeyAsDefaultValue,
    /// Keep untranslated keys unset, restoring values only from the existing output.
    NullAsDefaultValue,
    /// Order keys byte-wise.
    SortByKey,
}

impl PostProcessor {
    pub fn name(&self) -> &'static str {
        match self {
            PostProcessor::PurgeObsoleteKeys => "purge-obsolete-keys",
            PostProcessor::KeyAsDefaultValue => "key-as-default-value",
            PostProcessor::NullAsDefaultValue => "null-as-default-value",
            PostProcessor::SortByKey => "sort-by-key",
        }
    }

    pub fn process(
        &self,
        draft: &TranslationCollection,
        extracted: &TranslationCollection,
        existing: &TranslationCollection,
    ) -> TranslationCollection {
        match self {
            PostProcessor::PurgeObsoleteKeys => draft.intersect(extracted),
            PostProcessor::KeyAsDefaultValue => draft.map_values(|key, value| {
                value.clone().or_else(|| Some(key.to_string()))
            }),
            PostProcessor::NullAsDefaultValue => draft.map_values(|key, _| {
                existing.get(key).cloned().flatten()
            }),
            PostProcessor::SortByKey => draft.sorted(),
        }
    }
}

/// Reject processor lists that can't be applied together.
pub fn validate(post_processors: &[PostProcessor]) -> Result<()> {
    let has = |p: PostProcessor| post_processors.contains(&p);
    if has(PostProcessor::KeyAsDefaultValue) && has(PostProcessor::NullAsDefaultValue) {
        bail!(
            "'{}' and '{}' cannot be used together",
            PostProcessor::KeyAsDefaultValue.name(),
            PostProcessor::NullAsDefaultValue.name()
        );
    }
    Ok(())
}

/// Run the processors in registration order.
pub fn apply(
    post_processors: &[PostProcessor],
    draft: TranslationCollection,
    extracted: &TranslationCollection,
    existing: &TranslationCollection,
) -> TranslationCollection {
    post_processors.iter().fold(draft, |draft, processor| {
        processor.process(&draft, extracted, existing)
    })
}
