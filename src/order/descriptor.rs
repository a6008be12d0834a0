/// One property source as seen by the pipeline when reordering runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertySourceDescriptor {
    pub name: String,
    pub priority: Option<i32>,
    pub original_index: usize,
}

impl PropertySourceDescriptor {
    pub fn new(name: impl Into<String>, original_index: usize) -> Self {
        Self {
            name: name.into(),
            priority: None,
            original_index,
        }
    }

    /// Sets the priority this source declares for itself.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Builds descriptors for `names`, numbering them by position.
pub fn describe<I, S>(names: I) -> Vec<PropertySourceDescriptor>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| PropertySourceDescriptor::new(name, index))
        .collect()
}
