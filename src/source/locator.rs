//! Locating the entry container inside an opened file.
//!
//! [`locate`] descends from a node along a list of path segments. Lazy keys on the way are
//! materialised inside their parent directory, so every node stays owned by the tree it came
//! from and the caller's root is never consumed. The returned borrow ends when the caller is
//! done with the located container; dropping the root then releases everything that was
//! read on the way.

use crate::core::PlotError;
use crate::data::Object;

/// Descend from `root` along `segments` and return the container found there.
///
/// An empty segment list returns `root` itself, provided it is a container.
///
/// # Errors
///
/// - [`PlotError::SubPathNotFound`] if a segment names no child of the current node
/// - [`PlotError::UnsupportedContainer`] if the final node is not traversable
pub fn locate<'a>(root: &'a mut Object, segments: &[String]) -> Result<&'a mut Object, PlotError> {
    let file = root.name().to_string();
    descend(root, segments).map_err(|miss| match miss {
        Miss::Segment => PlotError::SubPathNotFound {
            sub_path: segments.join("/"),
            file,
        },
        Miss::NotContainer(name) => PlotError::UnsupportedContainer {
            name,
        },
        Miss::Read(error) => error,
    })
}

enum Miss {
    Segment,
    NotContainer(String),
    Read(PlotError),
}

fn descend<'a>(node: &'a mut Object, segments: &[String]) -> Result<&'a mut Object, Miss> {
    let Some((first, rest)) = segments.split_first() else {
        if node.is_traversable() {
            return Ok(node);
        }
        return Err(Miss::NotContainer(node.name().to_string()));
    };

    let Some(container) = node.as_container_mut() else {
        return Err(Miss::Segment);
    };
    let child = container.child_mut(first).map_err(Miss::Read)?.ok_or(Miss::Segment)?;
    tracing::trace!("Descending into '{}'", first);
    descend(child, rest)
}
