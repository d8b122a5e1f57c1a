use std::{path::Path, sync::Arc};

/// Immutable, cheaply clonable string shared between actors.
pub type ArcStr = Arc<str>;

/// Immutable, cheaply clonable path shared between actors.
pub type ArcPath = Arc<Path>;
