//! A validated group of content types.
//!
//! Descriptors are validated one at a time by the builder; references
//! between them (block lists naming element types) can only be checked once
//! the whole group is known.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{SetValidationError, SetViolation};
use crate::types::{ContentTypeDescriptor, ValueShape};

/// Content types whose aliases are unique and whose block references resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypeSet {
    descriptors: Vec<ContentTypeDescriptor>,
    alias_index: HashMap<String, usize>,
}

impl ContentTypeSet {
    /// Check the group and keep it in the given order.
    pub fn assemble(
        descriptors: Vec<ContentTypeDescriptor>,
    ) -> Result<Self, SetValidationError> {
        let mut violations = Vec::new();
        let mut alias_index: HashMap<String, usize> = HashMap::new();

        for (idx, descriptor) in descriptors.iter().enumerate() {
            let key = descriptor.alias.to_ascii_lowercase();
            if alias_index.contains_key(&key) {
                violations.push(SetViolation::DuplicateContentType {
                    alias: descriptor.alias.clone(),
                });
            } else {
                alias_index.insert(key, idx);
            }
        }

        for descriptor in &descriptors {
            let block_fields = descriptor
                .fields
                .iter()
                .filter(|f| f.field_type.shape == ValueShape::Blocks);

            for field in block_fields {
                for block in &field.declaration.blocks {
                    match alias_index.get(&block.to_ascii_lowercase()) {
                        None => violations.push(SetViolation::UnknownBlockElement {
                            content_type: descriptor.alias.clone(),
                            field: field.name().to_string(),
                            block: block.clone(),
                        }),
                        Some(&i) if !descriptors[i].is_element => {
                            violations.push(SetViolation::BlockNotElement {
                                content_type: descriptor.alias.clone(),
                                field: field.name().to_string(),
                                block: block.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        if !violations.is_empty() {
            return Err(SetValidationError { violations });
        }

        debug!(content_types = descriptors.len(), "assembled content type set");
        Ok(Self {
            descriptors,
            alias_index,
        })
    }

    pub fn get(&self, alias: &str) -> Option<&ContentTypeDescriptor> {
        self.alias_index
            .get(&alias.to_ascii_lowercase())
            .map(|&i| &self.descriptors[i])
    }

    pub fn all(&self) -> &[ContentTypeDescriptor] {
        &self.descriptors
    }

    /// Document types, i.e. everything that is not an element type.
    pub fn documents(&self) -> impl Iterator<Item = &ContentTypeDescriptor> {
        self.descriptors.iter().filter(|d| !d.is_element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &ContentTypeDescriptor> {
        self.descriptors.iter().filter(|d| d.is_element)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn into_descriptors(self) -> Vec<ContentTypeDescriptor> {
        self.descriptors
    }
}
