// One node of a detail-view property tree: either a leaf with a value, or a group whose
// children carry the values.  Higher priority sorts first among siblings.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Option<String>,
    pub priority: i32,
    pub children: Vec<Property>,
}

impl Property {
    pub fn new(name: &str, value: impl Into<String>) -> Property {
        Property {
            name: name.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn group(name: &str, children: Vec<Property>) -> Property {
        Property { name: name.into(), children, ..Default::default() }
    }

    pub fn with_priority(mut self, priority: i32) -> Property {
        self.priority = priority;
        self
    }
}
