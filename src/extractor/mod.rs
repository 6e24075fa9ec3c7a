//! Recursive extraction of requested datasets from container trees.
//!
//! The extractor walks a container depth-first and moves every leaf that matches a pending
//! request into the [`DataRegistry`] under the request's unique name. Matched leaves are
//! detached from their parent, so a second pass over the same tree cannot find them again.
//! Leaves that match nothing are left where they are; they belong to the tree and are
//! released together with it.
//!
//! # Lazy Keys
//!
//! Directory children that are still lazy keys are only read when they are containers
//! (to descend into them) or when their bare name matches a pending request. Everything
//! else stays unread.
//!
//! # Path Prefix
//!
//! A request name may carry a path, e.g. `sub/hist2`. When entering a container, the
//! directory part of the *first* pending request is taken as the prefix of every leaf in
//! that subtree, so a leaf `hist2` anywhere below matches `sub/hist2`. The prefix is only
//! exact if all pending requests share the same directory part; [`resolve`] takes care of
//! that by grouping requests before calling [`extract`].

pub mod resolve;

pub use resolve::{ResolveOutcome, resolve_source};

use crate::constants::PATH_SEPARATOR;
use crate::data::Object;
use crate::registry::{DataKey, DataRegistry};

/// One dataset that still has to be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Requested name, possibly with a `/`-separated path
    pub name: String,
    /// Unique name the dataset is registered under
    pub target: String,
    /// Interned `(name, source)` ids of the request
    pub key: DataKey,
}

impl PendingRequest {
    /// Directory part of the requested name, empty for top-level names.
    #[must_use]
    pub fn sub_spec(&self) -> &str {
        sub_spec(&self.name)
    }
}

/// Directory part of a `/`-separated name.
#[must_use]
pub fn sub_spec(name: &str) -> &str {
    name.rfind(PATH_SEPARATOR).map_or("", |pos| &name[..pos])
}

/// Move all leaves of `node` that match `pending` into `registry`.
///
/// Matched requests are removed from `pending`. Returns the number of matches. Stops as
/// soon as `pending` is empty. Keys that fail to materialise are logged and skipped.
pub fn extract(node: &mut Object, pending: &mut Vec<PendingRequest>, registry: &mut DataRegistry) -> usize {
    let Some(first) = pending.first() else {
        return 0;
    };
    let prefix = match first.sub_spec() {
        "" => String::new(),
        spec => format!("{spec}{PATH_SEPARATOR}"),
    };

    let Some(container) = node.as_container_mut() else {
        tracing::error!("Object '{}' is not a container, cannot extract from it", node.name());
        return 0;
    };

    let parent = container.name().to_string();
    let mut matched = 0;
    for (entry, class) in container.entries() {
        if pending.is_empty() {
            break;
        }

        if class.is_traversable() {
            match container.child_mut(&entry) {
                Ok(Some(child)) => matched += extract(child, pending, registry),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping '{}' in '{}': {}", entry, parent, e),
            }
            continue;
        }

        let qualified = format!("{prefix}{entry}");
        let Some(position) = pending.iter().position(|request| request.name == qualified) else {
            continue;
        };

        let dataset = match container.detach(&entry) {
            Ok(Some(object)) => object.into_dataset(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Skipping '{}' in '{}': {}", entry, parent, e);
                continue;
            }
        };
        let Some(dataset) = dataset else {
            continue;
        };

        let request = pending.remove(position);
        tracing::debug!("Found {} as {}", request.name, request.target);
        registry.insert(request.key, &request.target, dataset);
        matched += 1;
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Container, Dataset, Directory, Key, ObjectList};
    use crate::registry::NameRegistry;

    fn request(names: &mut NameRegistry, name: &str, source: &str) -> PendingRequest {
        PendingRequest {
            name: name.to_string(),
            target: format!("{name}_@_{source}"),
            key: DataKey::new(names.get_or_create_id(name), names.get_or_create_id(source)),
        }
    }

    fn lazy(object: Object) -> Key {
        Key::from_object(&object).unwrap()
    }

    fn graph(name: &str) -> Object {
        Dataset::graph(name, vec![]).into()
    }

    fn file_a() -> Object {
        let mut root = Directory::new("fileA.json");
        root.push_key(lazy(graph("hist1")));
        root.push_key(lazy(graph("other")));
        root.into()
    }

    #[test]
    fn test_sub_spec() {
        assert_eq!(sub_spec("hist1"), "");
        assert_eq!(sub_spec("sub/hist2"), "sub");
        assert_eq!(sub_spec("a/b/c"), "a/b");
    }

    #[test]
    fn test_extract_top_level_and_deplete() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();
        let mut root = file_a();

        let mut pending = vec![request(&mut names, "hist1", "A")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 1);
        assert!(pending.is_empty());
        assert!(registry.contains("hist1_@_A"));
        assert_eq!(registry.len(), 1);

        let container = root.as_container_mut().unwrap();
        assert!(!container.contains("hist1"));
        assert!(container.contains("other"));

        // the depleted tree yields nothing on a second pass
        let mut again = vec![request(&mut names, "hist1", "A")];
        assert_eq!(extract(&mut root, &mut again, &mut registry), 0);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_unmatched_keys_stay_lazy() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();
        let mut root = file_a();

        let mut pending = vec![request(&mut names, "missing", "A")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 0);

        let Object::Directory(dir) = &root else { panic!() };
        assert_eq!(dir.keys().len(), 2);
        assert!(dir.objects().is_empty());
    }

    #[test]
    fn test_extract_nested_with_prefix() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();

        let mut sub = Directory::new("sub");
        sub.push_key(lazy(graph("hist2")));
        let mut root = Directory::new("fileB.json");
        root.push_key(lazy(graph("other")));
        root.push_key(lazy(sub.into()));
        let mut root: Object = root.into();

        let mut pending = vec![request(&mut names, "sub/hist2", "B")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 1);
        assert!(registry.contains("sub/hist2_@_B"));

        let Object::Directory(dir) = &mut root else { panic!() };
        assert_eq!(dir.keys().len(), 1);
        let Some(Object::Directory(sub)) = dir.child_mut("sub").unwrap() else { panic!() };
        assert!(sub.child_names().is_empty());
    }

    #[test]
    fn test_prefix_applies_to_every_level() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();

        let mut sub = Directory::new("sub");
        sub.push_key(lazy(graph("hist2")));
        let mut root = Directory::new("fileB.json");
        root.push_key(lazy(graph("hist2")));
        root.push_key(lazy(sub.into()));
        let mut root: Object = root.into();

        // called on the file root, the bare leaf above `sub` is taken for `sub/hist2`
        let mut pending = vec![request(&mut names, "sub/hist2", "B")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 1);

        let Object::Directory(dir) = &root else { panic!() };
        assert_eq!(dir.keys().len(), 1);
        assert_eq!(dir.keys()[0].name(), "sub");
    }

    #[test]
    fn test_extract_from_lists_and_stop_early() {
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();

        let list = ObjectList::from_items("list", vec![graph("g1"), graph("g2"), graph("g3")]);
        let mut root = Directory::new("file.json");
        root.push_object(list.into());
        let mut root: Object = root.into();

        let mut pending = vec![request(&mut names, "g2", "C"), request(&mut names, "g1", "C")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 2);
        assert!(pending.is_empty());
        assert!(registry.contains("g1_@_C"));
        assert!(registry.contains("g2_@_C"));

        let container = root.as_container_mut().unwrap();
        let Some(Object::List(list)) = container.child_mut("list").unwrap() else { panic!() };
        assert_eq!(list.child_names(), vec!["g3"]);
    }

    #[test]
    fn test_corrupt_key_is_skipped() {
        let json = r#"{"keys":[
            {"name":"bad","class":"histogram","object":{"edges":[0],"contents":[1,2]}},
            {"name":"good","class":"graph","object":{"points":[]}}
        ]}"#;
        let mut root: Object = Directory::from_json("file.json", json).unwrap().into();
        let mut names = NameRegistry::new();
        let mut registry = DataRegistry::new();

        let mut pending = vec![request(&mut names, "bad", "D"), request(&mut names, "good", "D")];
        assert_eq!(extract(&mut root, &mut pending, &mut registry), 1);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "bad");
    }
}
