//! Constraint conflicts encountered while building a solution.

use std::fmt;

/// Every conflict found during one solve attempt.
#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A requirement that the selected version (or no version at all) satisfies.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub root: String,
    /// The project or package that imposed the constraint.
    pub required_by: String,
    pub constraint: String,
    /// The version already selected, if any.
    pub selected: Option<String>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for c in &self.conflicts {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.selected {
            Some(ref v) => write!(
                f,
                "{} requires {} {} but {} was selected",
                self.required_by, self.root, self.constraint, v
            ),
            None => write!(
                f,
                "{} requires {} {} but no version matches",
                self.required_by, self.root, self.constraint
            ),
        }
    }
}
