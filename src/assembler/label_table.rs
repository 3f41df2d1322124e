//! Label table for the assembler pre-pass

use std::collections::HashMap;

/// A label definition: name, address and the source line it appeared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label name (case-sensitive)
    pub name: String,

    /// Address of the write cursor when the label was defined
    pub address: u16,

    /// Source line where the label was defined (1-indexed)
    pub defined_at: usize,
}

/// Name to address map, rebuilt on every compile.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: HashMap<String, Label>,
}

impl LabelTable {
    /// Create a new empty label table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label to the table
    ///
    /// Returns Ok(()) on success, Err with the existing label if the name is
    /// already defined. The existing entry is kept.
    pub fn add_label(&mut self, name: &str, address: u16, defined_at: usize) -> Result<(), Label> {
        if let Some(existing) = self.labels.get(name) {
            return Err(existing.clone());
        }

        self.labels.insert(
            name.to_string(),
            Label {
                name: name.to_string(),
                address,
                defined_at,
            },
        );
        Ok(())
    }

    /// Look up the address of a label
    pub fn address_of(&self, name: &str) -> Option<u16> {
        self.labels.get(name).map(|label| label.address)
    }

    /// Look up a label by name
    pub fn get(&self, name: &str) -> Option<&Label> {
        self.labels.get(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// All labels ordered by address, then name.
    pub fn sorted(&self) -> Vec<&Label> {
        let mut labels: Vec<&Label> = self.labels.values().collect();
        labels.sort_by(|a, b| a.address.cmp(&b.address).then_with(|| a.name.cmp(&b.name)));
        labels
    }
}
