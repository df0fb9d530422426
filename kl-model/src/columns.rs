use std::fmt;

use kl_core::prelude::*;

pub type CellRenderer = Box<dyn Fn(&KubeObject) -> String + Send + Sync>;

// One list-view column.  Higher priority sorts further left; ties keep the order the
// contributing extensions were registered in.
pub struct Column {
    pub title: String,
    pub priority: i32,
    render: CellRenderer,
}

impl Column {
    pub fn new<F>(title: &str, priority: i32, render: F) -> Column
    where
        F: Fn(&KubeObject) -> String + Send + Sync + 'static,
    {
        Column { title: title.into(), priority, render: Box::new(render) }
    }

    pub fn render(&self, obj: &KubeObject) -> String {
        (self.render)(obj)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
