//! Directories, lazy keys and object lists.
//!
//! A [`Directory`] holds two kinds of children: lazy [`Key`]s that still carry their raw
//! payload, and in-memory [`Object`]s. Reading a key materialises the payload and moves the
//! resulting object into the directory's in-memory list, so the directory stays the owner.
//! An [`ObjectList`] only holds in-memory objects.
//!
//! Children leave a container only through [`Container::detach`], which removes the child
//! and hands it to the caller by value.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::{Dataset, Graph, Histogram, Object, ObjectClass};
use crate::core::PlotError;

/// Common interface of traversable containers.
pub trait Container {
    /// Name of the container.
    fn name(&self) -> &str;

    /// Names of all children, lazy or in memory.
    fn child_names(&self) -> Vec<&str>;

    /// Name and class of every child, without materialising lazy keys.
    fn entries(&self) -> Vec<(String, ObjectClass)>;

    /// Whether a child called `name` exists.
    fn contains(&self, name: &str) -> bool {
        self.child_names().contains(&name)
    }

    /// Borrow the child called `name`, materialising it first if it is still a lazy key.
    fn child_mut(&mut self, name: &str) -> Result<Option<&mut Object>, PlotError>;

    /// Remove the child called `name` and return it.
    fn detach(&mut self, name: &str) -> Result<Option<Object>, PlotError>;
}

/// A not yet materialised child of a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    name: String,
    class: ObjectClass,
    #[serde(rename = "object")]
    payload: Box<RawValue>,
}

#[derive(Serialize, Deserialize)]
struct DirectoryPayload {
    #[serde(default)]
    keys: Vec<Key>,
}

#[derive(Serialize, Deserialize)]
struct ListPayload {
    #[serde(default)]
    items: Vec<Key>,
}

impl Key {
    /// Name of the object behind the key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the object behind the key.
    #[must_use]
    pub const fn class(&self) -> ObjectClass {
        self.class
    }

    /// Serialise an in-memory object into a key.
    pub fn from_object(object: &Object) -> Result<Self, PlotError> {
        let payload = match object {
            Object::Directory(dir) => {
                let mut keys = dir.keys.clone();
                for child in &dir.objects {
                    keys.push(Self::from_object(child)?);
                }
                serde_json::value::to_raw_value(&DirectoryPayload {
                    keys,
                })
            }
            Object::List(list) => {
                let items = list.items.iter().map(Self::from_object).collect::<Result<Vec<_>, _>>()?;
                serde_json::value::to_raw_value(&ListPayload {
                    items,
                })
            }
            Object::Data(dataset) => match dataset.kind() {
                super::DatasetKind::Histogram(h) => serde_json::value::to_raw_value(h),
                super::DatasetKind::Graph(g) => serde_json::value::to_raw_value(g),
            },
        }
        .map_err(|e| PlotError::json(format!("object '{}'", object.name()), &e))?;

        Ok(Self {
            name: object.name().to_string(),
            class: object.class(),
            payload,
        })
    }

    /// Materialise the object behind the key.
    pub fn read_object(&self) -> Result<Object, PlotError> {
        let context = || format!("key '{}'", self.name);
        let raw = self.payload.get();
        match self.class {
            ObjectClass::Directory => {
                let payload: DirectoryPayload =
                    serde_json::from_str(raw).map_err(|e| PlotError::json(context(), &e))?;
                Ok(Object::Directory(Directory::from_keys(self.name.clone(), payload.keys)))
            }
            ObjectClass::List => {
                let payload: ListPayload =
                    serde_json::from_str(raw).map_err(|e| PlotError::json(context(), &e))?;
                let items = payload.items.iter().map(Self::read_object).collect::<Result<Vec<_>, _>>()?;
                Ok(Object::List(ObjectList::from_items(self.name.clone(), items)))
            }
            ObjectClass::Histogram => {
                let histogram: Histogram =
                    serde_json::from_str(raw).map_err(|e| PlotError::json(context(), &e))?;
                histogram.validate().map_err(|reason| PlotError::JsonError {
                    context: context(),
                    reason,
                })?;
                Ok(Object::Data(Dataset::histogram(self.name.clone(), histogram)))
            }
            ObjectClass::Graph => {
                let graph: Graph = serde_json::from_str(raw).map_err(|e| PlotError::json(context(), &e))?;
                Ok(Object::Data(Dataset::graph(self.name.clone(), graph.points)))
            }
        }
    }
}

/// Directory-like container with lazy keys and in-memory objects.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    name: String,
    keys: Vec<Key>,
    objects: Vec<Object>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Create a directory whose children are all lazy keys.
    pub fn from_keys(name: impl Into<String>, keys: Vec<Key>) -> Self {
        Self {
            name: name.into(),
            keys,
            objects: Vec::new(),
        }
    }

    /// Parse a directory document (`{"keys": [...]}`).
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, PlotError> {
        let name = name.into();
        let payload: DirectoryPayload =
            serde_json::from_str(json).map_err(|e| PlotError::json(name.clone(), &e))?;
        Ok(Self::from_keys(name, payload.keys))
    }

    /// Serialise the directory, in-memory objects included, into a directory document.
    pub fn to_json(&self) -> Result<String, PlotError> {
        let mut keys = self.keys.clone();
        for object in &self.objects {
            keys.push(Key::from_object(object)?);
        }
        serde_json::to_string_pretty(&DirectoryPayload {
            keys,
        })
        .map_err(|e| PlotError::json(self.name.clone(), &e))
    }

    /// Add a lazy key.
    pub fn push_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Add an in-memory object.
    pub fn push_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Lazy keys that were not read yet.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Objects already held in memory.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Index of the lazy key called `name`.
    #[must_use]
    pub fn find_key(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.name == name)
    }

    /// Materialise the key at `index` and move it into the in-memory objects.
    ///
    /// Returns the index of the new object. On error the key stays where it was.
    pub fn read_key(&mut self, index: usize) -> Result<usize, PlotError> {
        let object = self.keys[index].read_object()?;
        self.keys.remove(index);
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }
}

impl Container for Directory {
    fn name(&self) -> &str {
        &self.name
    }

    fn child_names(&self) -> Vec<&str> {
        self.keys
            .iter()
            .map(Key::name)
            .chain(self.objects.iter().map(Object::name))
            .collect()
    }

    fn entries(&self) -> Vec<(String, ObjectClass)> {
        // in-memory objects first, they need no reading
        self.objects
            .iter()
            .map(|object| (object.name().to_string(), object.class()))
            .chain(self.keys.iter().map(|key| (key.name.clone(), key.class)))
            .collect()
    }

    fn child_mut(&mut self, name: &str) -> Result<Option<&mut Object>, PlotError> {
        // keyed lookup first, then the objects already in memory
        if let Some(index) = self.find_key(name) {
            let index = self.read_key(index)?;
            return Ok(Some(&mut self.objects[index]));
        }
        Ok(self.objects.iter_mut().find(|object| object.name() == name))
    }

    fn detach(&mut self, name: &str) -> Result<Option<Object>, PlotError> {
        if let Some(index) = self.objects.iter().position(|object| object.name() == name) {
            return Ok(Some(self.objects.remove(index)));
        }
        match self.find_key(name) {
            Some(index) => {
                let index = self.read_key(index)?;
                Ok(Some(self.objects.remove(index)))
            }
            None => Ok(None),
        }
    }
}

/// Flat, ordered collection of in-memory objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectList {
    name: String,
    items: Vec<Object>,
}

impl ObjectList {
    /// Create an empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Create a list from existing objects.
    pub fn from_items(name: impl Into<String>, items: Vec<Object>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Append an object.
    pub fn push(&mut self, object: Object) {
        self.items.push(object);
    }

    /// Objects in list order.
    #[must_use]
    pub fn items(&self) -> &[Object] {
        &self.items
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Container for ObjectList {
    fn name(&self) -> &str {
        &self.name
    }

    fn child_names(&self) -> Vec<&str> {
        self.items.iter().map(Object::name).collect()
    }

    fn entries(&self) -> Vec<(String, ObjectClass)> {
        self.items.iter().map(|object| (object.name().to_string(), object.class())).collect()
    }

    fn child_mut(&mut self, name: &str) -> Result<Option<&mut Object>, PlotError> {
        Ok(self.items.iter_mut().find(|object| object.name() == name))
    }

    fn detach(&mut self, name: &str) -> Result<Option<Object>, PlotError> {
        Ok(self.items.iter().position(|object| object.name() == name).map(|i| self.items.remove(i)))
    }
}
