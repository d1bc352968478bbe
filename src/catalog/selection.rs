use tracing::debug;

/// Ordered set of product names picked for the current enquiry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSession {
    names: Vec<String>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the trimmed name. Returns `false` for blanks and names already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        debug!("Selected: {:?}", self.names);
        true
    }

    /// Removes by exact match. Returns `false` when absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        let removed = self.names.len() != before;
        if removed {
            debug!("Selected: {:?}", self.names);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names joined with `", "` in insertion order.
    pub fn serialize(&self) -> String {
        self.names.join(", ")
    }
}
